use std::io::{self, Write};

/// Block until the user presses enter.
pub fn wait_for_enter(message: &str) -> io::Result<()> {
    let mut input = String::new();
    print!("{}", message);
    io::stdout().flush()?;
    io::stdin().read_line(&mut input)?;
    Ok(())
}
