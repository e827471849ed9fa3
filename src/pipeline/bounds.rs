use tracing::info;

use super::{Analyzer, PassReport, Tag};
use crate::din::folder::get_folder_bounds;
use crate::error::Error;
use crate::record::RecordStore;

impl Analyzer {
    /// Report files whose best date falls outside the bounds encoded in their
    /// folder name. The best date is the KDIN, else the EKDIN, else the
    /// metadata date. Files with none of them are skipped silently.
    pub fn detect_out_of_folder_bounds(&self, store: &RecordStore) -> Result<PassReport, Error> {
        info!("Checking file-dates out of folder-bounds...");
        let mut report = PassReport::new();
        let year_bounds = self.year_bounds();

        for (_, record) in store.iter() {
            let Some(folder) = record.path().parent() else {
                continue;
            };
            let Some(folder_bounds) = get_folder_bounds(folder, year_bounds) else {
                continue;
            };

            let best = if let Some(date) = record.kdin_date(year_bounds) {
                date
            } else if let Some(date) = record.ekdin_date(year_bounds) {
                date
            } else if record.metadata_readable() && record.has_valid_metadata_date() {
                record.metadata_original_date()?
            } else {
                continue;
            };

            if !folder_bounds.contains(&best) {
                report.push(Tag::OutOfBounds, record.path(), Some(best.to_string()));
            }
        }

        report.log(&self.root);
        Ok(report)
    }
}
