//! Per-file classification records and the store the passes mutate.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::config::YearBounds;
use crate::din::{ekdin, kdin, proprietary};
use crate::error::Error;

/// Date conventions detected in a file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameFlags {
    pub kdin: bool,
    pub ekdin: bool,
    pub proprietary_din: bool,
}

impl NameFlags {
    pub fn detect(path: &Path, year_bounds: &YearBounds) -> Self {
        Self {
            kdin: kdin::is_kdin(path, year_bounds),
            ekdin: ekdin::is_ekdin(path, year_bounds),
            proprietary_din: proprietary::is_proprietary_din(path, year_bounds),
        }
    }
}

/// Everything the passes know about one scanned file.
///
/// The path and the name flags are private: `apply_rename` is the only way to
/// move a record, and it re-detects the flags from the new name so that they
/// always describe the current path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    path: PathBuf,
    flags: NameFlags,
    metadata_readable: bool,
    metadata_editable: bool,
    metadata_date: Option<NaiveDateTime>,
}

impl FileRecord {
    pub fn new(
        path: PathBuf,
        year_bounds: &YearBounds,
        metadata_readable: bool,
        metadata_editable: bool,
        metadata_date: Option<NaiveDateTime>,
    ) -> Self {
        let flags = NameFlags::detect(&path, year_bounds);
        Self {
            path,
            flags,
            metadata_readable,
            metadata_editable,
            metadata_date,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flags(&self) -> NameFlags {
        self.flags
    }

    pub fn has_kdin(&self) -> bool {
        self.flags.kdin
    }

    pub fn has_ekdin(&self) -> bool {
        self.flags.ekdin
    }

    pub fn has_proprietary_din(&self) -> bool {
        self.flags.proprietary_din
    }

    pub fn has_valid_metadata_date(&self) -> bool {
        self.metadata_date.is_some()
    }

    pub fn metadata_readable(&self) -> bool {
        self.metadata_readable
    }

    pub fn metadata_editable(&self) -> bool {
        self.metadata_editable
    }

    /// Whether any trustworthy date source is known for the file.
    pub fn has_date_evidence(&self) -> bool {
        self.flags.kdin
            || self.flags.ekdin
            || self.flags.proprietary_din
            || self.has_valid_metadata_date()
    }

    /// Valid metadata original date. Asking for it when there is none is a
    /// contract violation.
    pub fn metadata_original_date(&self) -> Result<NaiveDateTime, Error> {
        self.metadata_date
            .ok_or_else(|| Error::MissingMetadataDate(self.path.clone()))
    }

    /// Record the date just written into the file metadata.
    pub fn set_metadata_original_date(&mut self, date: NaiveDateTime) {
        self.metadata_date = Some(date);
    }

    /// Move the record to `new_path`, which must already hold the file.
    pub fn apply_rename(&mut self, new_path: PathBuf, year_bounds: &YearBounds) {
        self.flags = NameFlags::detect(&new_path, year_bounds);
        self.path = new_path;
    }

    pub fn kdin_date(&self, year_bounds: &YearBounds) -> Option<NaiveDateTime> {
        if self.flags.kdin {
            kdin::get_date(&self.path, year_bounds)
        } else {
            None
        }
    }

    pub fn ekdin_date(&self, year_bounds: &YearBounds) -> Option<NaiveDateTime> {
        if self.flags.ekdin {
            ekdin::get_date(&self.path, year_bounds)
        } else {
            None
        }
    }
}

/// Stable handle to a record. Paths change on rename, positions do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(usize);

impl RecordId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Owned, indexable sequence of records. Records are never removed.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<FileRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: FileRecord) -> RecordId {
        self.records.push(record);
        RecordId(self.records.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> {
        (0..self.records.len()).map(RecordId)
    }

    pub fn get(&self, id: RecordId) -> &FileRecord {
        &self.records[id.0]
    }

    /// Replace the record at `id` with its updated version.
    pub fn replace(&mut self, id: RecordId, record: FileRecord) {
        self.records[id.0] = record;
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &FileRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(idx, record)| (RecordId(idx), record))
    }
}

impl FromIterator<FileRecord> for RecordStore {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
