use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{Analyzer, PassReport, Tag};
use crate::din::ekdin;
use crate::error::Error;
use crate::record::{FileRecord, RecordStore};
use crate::utils::fs::{copy_preserving_times, rename_no_clobber};
use crate::utils::path::unique_path;

pub const TO_REVIEW_FOLDER: &str = "Files to review";
pub const ORIGINALS_FOLDER: &str = "originals";
pub const EDITED_FOLDER: &str = "edited";

pub struct EditDateOutcome {
    pub report: PassReport,
    /// Set when at least one metadata edit needed before/after copies.
    pub review_folder: Option<PathBuf>,
}

/// Review folder of a run. Its name is fixed when the pass starts, the
/// folders themselves only appear with the first metadata edit.
struct ReviewFolders {
    root: PathBuf,
    created: bool,
}

impl ReviewFolders {
    fn new(review_root: &Path) -> Self {
        Self {
            root: unique_path(&review_root.join(TO_REVIEW_FOLDER)),
            created: false,
        }
    }

    fn originals(&self) -> PathBuf {
        self.root.join(ORIGINALS_FOLDER)
    }

    fn edited(&self) -> PathBuf {
        self.root.join(EDITED_FOLDER)
    }

    fn ensure(&mut self) -> io::Result<()> {
        if !self.created {
            fs::create_dir_all(self.originals())?;
            fs::create_dir_all(self.edited())?;
            self.created = true;
        }
        Ok(())
    }
}

fn copy_into(file: &Path, folder: &Path) -> io::Result<PathBuf> {
    let name = file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no file name in {}", file.display()),
        )
    })?;
    let target = unique_path(&folder.join(name));
    copy_preserving_times(file, &target)?;
    Ok(target)
}

impl Analyzer {
    /// Apply the dates requested through EKDIN names.
    ///
    /// Editable files get the date written into their metadata and lose the
    /// EKDIN; a copy from before and after the edit is kept in the review
    /// folder. Other files have their EKDIN turned into a plain KDIN.
    pub fn write_edit_dates(&self, store: &mut RecordStore) -> Result<EditDateOutcome, Error> {
        info!("Scanning edition-date-in-name files to store...");
        let mut review = ReviewFolders::new(&self.config.review_root);
        let mut report = PassReport::new();

        for id in store.ids() {
            if !store.get(id).has_ekdin() {
                continue;
            }
            // Steps that succeeded before a failure stay reflected in the record.
            let mut updated = store.get(id).clone();
            let outcome = if updated.metadata_editable() {
                self.move_edit_date_to_metadata(&mut updated, &mut review)
                    .map(|()| Tag::Edin2Metadt)
            } else {
                self.move_edit_date_to_kdin(&mut updated)
                    .map(|()| Tag::EdinRenamed)
            };
            let current = updated.path().to_path_buf();
            store.replace(id, updated);

            match outcome {
                Ok(tag) => report.push(tag, current, None),
                Err(err) if err.is_contract_violation() => return Err(err),
                Err(err) => report.fail(current, err),
            }
        }

        report.log(&self.root);
        if review.created {
            warn!(
                "For reviewing the metadata edits see folders <{}> and <{}> in <{}>",
                ORIGINALS_FOLDER,
                EDITED_FOLDER,
                review.root.display()
            );
        }
        Ok(EditDateOutcome {
            report,
            review_folder: review.created.then_some(review.root),
        })
    }

    /// Copy, edit, copy, rename. The original copy exists before anything in
    /// the live file changes.
    fn move_edit_date_to_metadata(
        &self,
        record: &mut FileRecord,
        review: &mut ReviewFolders,
    ) -> Result<(), Error> {
        let path = record.path();
        let year_bounds = self.year_bounds();
        let date = record
            .ekdin_date(year_bounds)
            .ok_or_else(|| Error::Other(format!("No EKDIN date in {}", path.display())))?;
        let clean = ekdin::file_ekdin_to_clean(path, year_bounds)
            .ok_or_else(|| Error::Other(format!("No EKDIN in {}", path.display())))?;

        review.ensure()?;
        copy_into(path, &review.originals())?;

        let mut file = self.meta.load(path)?;
        file.set_original_date(date)?;
        file.save()?;
        record.set_metadata_original_date(date);
        let path = record.path();

        copy_into(path, &review.edited())?;

        let target = unique_path(&clean);
        rename_no_clobber(path, &target)?;
        record.apply_rename(target, year_bounds);
        Ok(())
    }

    fn move_edit_date_to_kdin(&self, record: &mut FileRecord) -> Result<(), Error> {
        let path = record.path();
        let year_bounds = self.year_bounds();
        let kdin = ekdin::file_ekdin_to_kdin(path, year_bounds)
            .ok_or_else(|| Error::Other(format!("No EKDIN in {}", path.display())))?;

        let target = unique_path(&kdin);
        rename_no_clobber(path, &target)?;
        record.apply_rename(target, year_bounds);
        Ok(())
    }
}
