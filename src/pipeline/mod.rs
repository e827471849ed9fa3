//! Reconciliation pipeline.
//!
//! Passes run strictly in order over one `RecordStore`, each seeing the
//! renames and metadata edits of the previous ones:
//! 1. scan: classify every file's date evidence
//! 2. proprietary: rename vendor date-in-name files to KDIN
//! 3. integrity: flag damaged metadata dates, stamp evidence-less files with a to-review KDIN
//! 4. edit date: move EKDIN dates into metadata (or into a plain KDIN)
//! 5. consistency: compare KDIN dates against metadata dates
//! 6. folder bounds: check file dates against the bounds in their folder name

mod bounds;
mod consistency;
mod edit_date;
mod integrity;
mod proprietary;
pub mod report;
mod scan;

pub use edit_date::{EditDateOutcome, EDITED_FOLDER, ORIGINALS_FOLDER, TO_REVIEW_FOLDER};
pub use report::{PassReport, ReportEntry, RunReport, Tag};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::config::{AppConfig, YearBounds};
use crate::error::Error;
use crate::metadata::{MetaManager, MetadataBackend};
use crate::progress::PassReporter;
use crate::record::{RecordId, RecordStore};
use crate::scanner::SKIP_EXTENSIONS;
use crate::utils::fs::rename_no_clobber;

pub struct Analyzer {
    config: AppConfig,
    root: PathBuf,
    meta: MetaManager,
}

impl Analyzer {
    /// The metadata backends are consulted in the given order.
    pub fn new(config: AppConfig, backends: Vec<Box<dyn MetadataBackend>>) -> Result<Self, Error> {
        let meta = MetaManager::new(backends, config.year_bounds);
        Self::with_meta_manager(config, meta)
    }

    pub fn with_default_backends(config: AppConfig) -> Result<Self, Error> {
        let meta = MetaManager::with_default_backends(config.year_bounds);
        Self::with_meta_manager(config, meta)
    }

    fn with_meta_manager(config: AppConfig, meta: MetaManager) -> Result<Self, Error> {
        let root = fs::canonicalize(&config.root_path).map_err(|e| {
            Error::Other(format!(
                "Cannot open scan root {}: {}",
                config.root_path.display(),
                e
            ))
        })?;
        Ok(Self { config, root, meta })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Canonical scan root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta(&self) -> &MetaManager {
        &self.meta
    }

    fn year_bounds(&self) -> &YearBounds {
        &self.config.year_bounds
    }

    /// Rename the file behind `id` and move its record along.
    fn rename_record(&self, store: &mut RecordStore, id: RecordId, target: &Path) -> io::Result<()> {
        let mut record = store.get(id).clone();
        rename_no_clobber(record.path(), target)?;
        record.apply_rename(target.to_path_buf(), self.year_bounds());
        store.replace(id, record);
        Ok(())
    }

    fn log_configuration(&self) {
        info!("Analyzer initialized");
        info!("root = {}", self.root.display());
        info!("folder_patterns = {:?}", self.config.folder_patterns);
        info!("skip_extensions = {:?}", SKIP_EXTENSIONS);
        info!(
            "review_folder = {}",
            self.config.review_root.join(TO_REVIEW_FOLDER).display()
        );
        info!("year_bounds = {}", self.config.year_bounds);
        info!("margin_secs = {}", self.config.margin_secs);
        let tags: Vec<&str> = Tag::ALL.iter().map(|t| t.label()).collect();
        info!("tags = {}", tags.join(" "));
    }

    /// Run every pass in order. Warnings found are in the returned report.
    pub fn run(&self, reporter: &dyn PassReporter) -> Result<RunReport, Error> {
        self.log_configuration();

        reporter.on_pass_start("scan");
        let start = Instant::now();
        let mut store = self.load_files()?;
        reporter.on_pass_complete("scan", store.len(), start.elapsed().as_secs_f64());

        let mut run = RunReport {
            files_scanned: store.len(),
            ..RunReport::default()
        };

        run.proprietary = timed(reporter, "proprietary", || {
            self.rename_proprietary_files(&mut store)
        })?;
        run.integrity = timed(reporter, "integrity", || {
            self.analyse_date_integrity(&mut store)
        })?;

        reporter.on_pass_start("edit-date");
        let start = Instant::now();
        let outcome = self.write_edit_dates(&mut store)?;
        reporter.on_pass_complete(
            "edit-date",
            outcome.report.len(),
            start.elapsed().as_secs_f64(),
        );
        run.edit_migration = outcome.report;
        run.review_folder = outcome.review_folder;

        run.consistency = timed(reporter, "consistency", || {
            self.analyse_date_consistency(&store)
        })?;
        run.bounds = timed(reporter, "folder-bounds", || {
            self.detect_out_of_folder_bounds(&store)
        })?;

        info!(
            "Run finished: {} files scanned, {} items to review",
            run.files_scanned,
            run.warning_count()
        );
        Ok(run)
    }
}

fn timed<F>(reporter: &dyn PassReporter, pass: &str, f: F) -> Result<PassReport, Error>
where
    F: FnOnce() -> Result<PassReport, Error>,
{
    reporter.on_pass_start(pass);
    let start = Instant::now();
    let report = f()?;
    reporter.on_pass_complete(pass, report.len(), start.elapsed().as_secs_f64());
    Ok(report)
}
