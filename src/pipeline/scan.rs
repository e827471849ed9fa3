use std::fs;
use tracing::{info, trace, warn};

use super::Analyzer;
use crate::error::Error;
use crate::record::{FileRecord, RecordStore};
use crate::scanner::{is_skipped_extension, list_files};

impl Analyzer {
    /// Build one record per scannable file under the root.
    ///
    /// A file whose metadata cannot be loaded is kept, classified as having
    /// unreadable metadata.
    pub fn load_files(&self) -> Result<RecordStore, Error> {
        info!("Scanning files in path...");
        let excluded: Vec<_> = fs::canonicalize(&self.config.review_root)
            .into_iter()
            .collect();
        let files = list_files(&self.root, &self.config.folder_patterns, &excluded)?;

        let mut store = RecordStore::new();
        for path in files {
            if is_skipped_extension(&path) {
                trace!("Skipping {}", path.display());
                continue;
            }

            let mut readable = self.meta.is_readable(&path);
            let mut editable = self.meta.is_editable(&path);
            let mut metadata_date = None;
            if readable {
                match self.meta.load(&path) {
                    Ok(file) => metadata_date = file.original_date(),
                    Err(err) => {
                        warn!("Metadata of {} could not be read: {}", path.display(), err);
                        readable = false;
                        editable = false;
                    }
                }
            }

            store.push(FileRecord::new(
                path,
                self.year_bounds(),
                readable,
                editable,
                metadata_date,
            ));
        }

        info!("Files found to be analysed = {}", store.len());
        Ok(store)
    }
}
