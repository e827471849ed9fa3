pub mod config;
pub mod din;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod scanner;
pub mod utils;

pub use config::{AppConfig, YearBounds};
pub use error::Error;
pub use metadata::{DateField, MetaManager, MetadataBackend};
pub use pipeline::{Analyzer, PassReport, RunReport, Tag};
pub use progress::{PassReporter, SilentReporter};
pub use record::{FileRecord, RecordId, RecordStore};
