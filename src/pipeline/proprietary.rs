use std::io;
use tracing::{debug, info};

use super::{Analyzer, PassReport, Tag};
use crate::din::proprietary::{convention_name, kdin_from_proprietary_din};
use crate::error::Error;
use crate::record::RecordStore;

impl Analyzer {
    /// Rename files following a vendor date-in-name convention to KDIN. A file
    /// whose KDIN name is already taken stays where it is and is reported as
    /// duplicated.
    pub fn rename_proprietary_files(&self, store: &mut RecordStore) -> Result<PassReport, Error> {
        info!("Scanning proprietary date-in-name files to rename...");
        let mut report = PassReport::new();

        for id in store.ids() {
            let record = store.get(id);
            if !record.has_proprietary_din() {
                continue;
            }
            let original = record.path().to_path_buf();
            let Some(target) = kdin_from_proprietary_din(&original, self.year_bounds()) else {
                continue;
            };
            if let Some(convention) = convention_name(&original, self.year_bounds()) {
                debug!("{} follows the {} convention", original.display(), convention);
            }
            let target_name = target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());

            if target.exists() {
                report.push(Tag::Duplicated, original, target_name);
                continue;
            }
            match self.rename_record(store, id, &target) {
                Ok(()) => report.push(Tag::PropRenamed, target, None),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    report.push(Tag::Duplicated, original, target_name)
                }
                Err(err) => report.fail(original, err),
            }
        }

        report.log(&self.root);
        Ok(report)
    }
}
