use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "din-keeper")]
#[command(
    about = "Keep media file dates safe: reconcile date-in-name conventions, metadata dates and folder date bounds",
    long_about = None
)]
pub struct Cli {
    /// Root folder to analyse
    pub root: PathBuf,

    /// Only descend into top-level folders whose name matches this glob (repeatable)
    #[arg(short, long = "pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// Earliest plausible year
    #[arg(long, default_value_t = 1800)]
    pub min_year: i32,

    /// Latest plausible year
    #[arg(long, default_value_t = 2300)]
    pub max_year: i32,

    /// Do not wait for enter once the run is finished
    #[arg(long)]
    pub embedded: bool,
}
