use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Metadata error for {}: {message}", path.display())]
    Metadata { path: PathBuf, message: String },

    #[error("No valid metadata original date recorded for {}", .0.display())]
    MissingMetadataDate(PathBuf),

    #[error("Metadata of {} is not editable", .0.display())]
    NotEditable(PathBuf),

    #[error("Metadata of {} is not readable", .0.display())]
    NotReadable(PathBuf),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Contract violations are programming errors and must abort the run.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::MissingMetadataDate(_) | Error::NotEditable(_))
    }
}
