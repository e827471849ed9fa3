use tracing::{debug, info};

use super::{Analyzer, PassReport, Tag};
use crate::din::kdin::file_clean_to_trkdin;
use crate::error::Error;
use crate::record::RecordStore;
use crate::utils::fs::modified_date;
use crate::utils::path::unique_path;

impl Analyzer {
    /// Deal with files that carry no trustworthy date at all.
    ///
    /// A damaged metadata date is reported and left alone. Otherwise the file
    /// is renamed with a to-review KDIN built from its modification time.
    pub fn analyse_date_integrity(&self, store: &mut RecordStore) -> Result<PassReport, Error> {
        info!("Checking file-dates integrity...");
        let mut report = PassReport::new();

        for id in store.ids() {
            let record = store.get(id);
            if record.has_date_evidence() {
                continue;
            }
            let path = record.path().to_path_buf();

            if record.metadata_readable() {
                match self.meta.is_date_damaged(&path) {
                    Ok(true) => {
                        let raw = self.meta.damaged_date_string(&path).ok().flatten();
                        report.push(Tag::DateDamaged, path, raw);
                        continue;
                    }
                    Ok(false) => {}
                    Err(err) => debug!("No damage check for {}: {}", path.display(), err),
                }
            }

            let date = match modified_date(&path) {
                Ok(date) => date,
                Err(err) => {
                    report.fail(path, err);
                    continue;
                }
            };
            let target = unique_path(&file_clean_to_trkdin(&path, &date));
            match self.rename_record(store, id, &target) {
                Ok(()) => report.push(Tag::Date2Review, target, None),
                Err(err) => report.fail(path, err),
            }
        }

        report.log(&self.root);
        Ok(report)
    }
}
