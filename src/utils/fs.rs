use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

/// Rename that refuses to replace an existing file.
pub fn rename_no_clobber(from: &Path, to: &Path) -> io::Result<()> {
    if to.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("rename target already exists: {}", to.display()),
        ));
    }
    fs::rename(from, to)?;
    trace!("Renamed {} -> {}", from.display(), to.display());
    Ok(())
}

/// Copy `from` to `to` keeping permissions and the modification time.
pub fn copy_preserving_times(from: &Path, to: &Path) -> io::Result<()> {
    let modified = fs::metadata(from)?.modified()?;
    fs::copy(from, to)?;
    let copy = fs::File::options().write(true).open(to)?;
    copy.set_modified(modified)?;
    Ok(())
}

/// Last-modified time of a file in local time, truncated to whole seconds.
pub fn modified_date(path: &Path) -> io::Result<NaiveDateTime> {
    let modified = fs::metadata(path)?.modified()?;
    let local: DateTime<Local> = modified.into();
    let naive = local.naive_local();
    Ok(naive.with_nanosecond(0).unwrap_or(naive))
}
