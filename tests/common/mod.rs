#![allow(dead_code)]

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

use din_keeper::metadata::METADATA_DATE_FORMAT;
use din_keeper::{Analyzer, AppConfig, Error, MetadataBackend};

const DATE_LINE_PREFIX: &str = "DATE=";

/// Body that `TextBackend` refuses to read.
pub const CORRUPT_BODY: &str = "CORRUPT";

/// Keeps the original date on a `DATE=...` first line of the file body.
/// JPG is readable and editable, PNG is read-only. A file holding
/// `CORRUPT_BODY` fails to load.
pub struct TextBackend;

impl MetadataBackend for TextBackend {
    fn name(&self) -> &'static str {
        "text"
    }

    fn readable_extensions(&self) -> &[&'static str] {
        &["JPG", "PNG"]
    }

    fn editable_extensions(&self) -> &[&'static str] {
        &["JPG"]
    }

    fn read_original_date(&self, path: &Path) -> Result<Option<String>, Error> {
        let body = fs::read_to_string(path)?;
        if body.starts_with(CORRUPT_BODY) {
            return Err(Error::Metadata {
                path: path.to_path_buf(),
                message: "corrupt metadata block".to_string(),
            });
        }
        Ok(body
            .lines()
            .next()
            .and_then(|line| line.strip_prefix(DATE_LINE_PREFIX))
            .map(str::to_string))
    }

    fn write_original_date(&self, path: &Path, date: &NaiveDateTime) -> Result<(), Error> {
        let body = fs::read_to_string(path)?;
        let rest: Vec<&str> = body
            .lines()
            .filter(|line| !line.starts_with(DATE_LINE_PREFIX))
            .collect();
        let mut updated = format!("{}{}\n", DATE_LINE_PREFIX, date.format(METADATA_DATE_FORMAT));
        for line in rest {
            updated.push_str(line);
            updated.push('\n');
        }
        fs::write(path, updated)?;
        Ok(())
    }
}

/// Claims it can write BMP dates but cannot read them.
pub struct WriteOnlyBackend;

impl MetadataBackend for WriteOnlyBackend {
    fn name(&self) -> &'static str {
        "write-only"
    }

    fn readable_extensions(&self) -> &[&'static str] {
        &[]
    }

    fn editable_extensions(&self) -> &[&'static str] {
        &["BMP"]
    }

    fn read_original_date(&self, path: &Path) -> Result<Option<String>, Error> {
        Err(Error::NotReadable(path.to_path_buf()))
    }

    fn write_original_date(&self, _path: &Path, _date: &NaiveDateTime) -> Result<(), Error> {
        Ok(())
    }
}

pub fn write_file(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

/// File body carrying an original date.
pub fn dated(raw: &str) -> String {
    format!("{}{}\npixels\n", DATE_LINE_PREFIX, raw)
}

pub fn read_date_line(path: &Path) -> Option<String> {
    let body = fs::read_to_string(path).ok()?;
    body.lines()
        .next()
        .and_then(|line| line.strip_prefix(DATE_LINE_PREFIX))
        .map(str::to_string)
}

pub fn config(root: &Path, review_root: &Path) -> AppConfig {
    let mut config = AppConfig::new(root);
    config.review_root = review_root.to_path_buf();
    config
}

pub fn analyzer(config: AppConfig) -> Analyzer {
    Analyzer::new(config, vec![Box::new(TextBackend)]).unwrap()
}

/// File names directly inside `dir`, sorted.
pub fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Every file below `dir`, relative to it, sorted.
pub fn tree(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(dir).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
