//! Metadata gateway for the embedded "original date" field.
//!
//! A `MetaManager` owns a list of backends and a per-extension lookup table
//! built once at construction. Loading a file tries the backends registered
//! for its extension in order and falls back to the next one on failure.

pub mod lofty;
pub mod photo;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::config::YearBounds;
use crate::error::Error;
use crate::utils::path::extension_upper;

/// Year written by cameras and editors that lost the real date.
pub const SENTINEL_YEAR: i32 = 1;

/// Format used when writing the original date.
pub const METADATA_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Offset-carrying forms. The wall-clock time at that offset is kept.
const OFFSET_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y:%m:%d %H:%M:%S%:z",
    "%Y:%m:%d %H:%M:%S%z",
];

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y:%m:%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y:%m:%d"];

/// `YYYY` or `YYYY-MM`, read as the first instant of that period.
fn parse_period(raw: &str) -> Option<NaiveDateTime> {
    let (year, month) = match raw.split_once('-') {
        Some((year, month)) if month.len() == 2 => (year, month.parse().ok()?),
        Some(_) => return None,
        None => (raw, 1),
    };
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)?.and_hms_opt(0, 0, 0)
}

/// Parse the raw value of the field. Offsets and a trailing `Z` are accepted.
fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.naive_local());
    }
    OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
        .map(|date| date.naive_local())
        .or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .or_else(|| parse_period(raw))
}

/// State of the original-date field of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateField {
    Absent,
    /// Present but unusable: sentinel year or unparseable value. Kept raw for review.
    Damaged(String),
    Present(NaiveDateTime),
}

impl DateField {
    pub fn parse(raw: Option<&str>) -> Self {
        let raw = match raw.map(str::trim) {
            None | Some("") => return DateField::Absent,
            Some(raw) => raw,
        };
        match parse_datetime(raw) {
            Some(date) if date.year() == SENTINEL_YEAR => DateField::Damaged(raw.to_string()),
            Some(date) => DateField::Present(date),
            None => DateField::Damaged(raw.to_string()),
        }
    }

    /// The date, if present and inside the bounds.
    pub fn valid_date(&self, year_bounds: &YearBounds) -> Option<NaiveDateTime> {
        match self {
            DateField::Present(date) if year_bounds.contains(date.year()) => Some(*date),
            _ => None,
        }
    }

    pub fn is_damaged(&self) -> bool {
        matches!(self, DateField::Damaged(_))
    }
}

pub(crate) fn metadata_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::Metadata {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// One way of reading and writing the original-date field.
pub trait MetadataBackend {
    fn name(&self) -> &'static str;

    /// Upper-case extensions this backend can read.
    fn readable_extensions(&self) -> &[&'static str];

    /// Upper-case extensions this backend can write.
    fn editable_extensions(&self) -> &[&'static str];

    /// Raw value of the original-date field, `None` when the field is missing.
    fn read_original_date(&self, path: &Path) -> Result<Option<String>, Error>;

    fn write_original_date(&self, path: &Path, date: &NaiveDateTime) -> Result<(), Error>;
}

pub struct MetaManager {
    backends: Vec<Box<dyn MetadataBackend>>,
    readers: HashMap<String, Vec<usize>>,
    editors: HashMap<String, Vec<usize>>,
    year_bounds: YearBounds,
}

impl MetaManager {
    /// Backends are tried in the given order for every extension they declare.
    pub fn new(backends: Vec<Box<dyn MetadataBackend>>, year_bounds: YearBounds) -> Self {
        let mut readers: HashMap<String, Vec<usize>> = HashMap::new();
        let mut editors: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, backend) in backends.iter().enumerate() {
            for ext in backend.readable_extensions() {
                readers.entry(ext.to_uppercase()).or_default().push(idx);
            }
            for ext in backend.editable_extensions() {
                editors.entry(ext.to_uppercase()).or_default().push(idx);
            }
        }
        Self {
            backends,
            readers,
            editors,
            year_bounds,
        }
    }

    pub fn with_default_backends(year_bounds: YearBounds) -> Self {
        let backends: Vec<Box<dyn MetadataBackend>> = vec![
            Box::new(photo::ExifBackend),
            Box::new(lofty::LoftyBackend),
            Box::new(lofty::ProbeBackend),
        ];
        Self::new(backends, year_bounds)
    }

    pub fn is_extension_readable(&self, ext: &str) -> bool {
        self.readers.contains_key(&ext.to_uppercase())
    }

    pub fn is_extension_editable(&self, ext: &str) -> bool {
        self.editors.contains_key(&ext.to_uppercase())
    }

    pub fn is_readable(&self, path: &Path) -> bool {
        extension_upper(path).is_some_and(|ext| self.is_extension_readable(&ext))
    }

    pub fn is_editable(&self, path: &Path) -> bool {
        extension_upper(path).is_some_and(|ext| self.is_extension_editable(&ext))
    }

    pub fn readable_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self.readers.keys().cloned().collect();
        exts.sort();
        exts
    }

    pub fn editable_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self.editors.keys().cloned().collect();
        exts.sort();
        exts
    }

    /// Read the original-date field of `path` with the first backend that succeeds.
    pub fn load(&self, path: &Path) -> Result<MetaFile<'_>, Error> {
        let ext = extension_upper(path).ok_or_else(|| Error::NotReadable(path.to_path_buf()))?;
        let candidates = self
            .readers
            .get(&ext)
            .ok_or_else(|| Error::NotReadable(path.to_path_buf()))?;

        let mut last_error = None;
        for &idx in candidates {
            let backend = &self.backends[idx];
            match backend.read_original_date(path) {
                Ok(raw) => {
                    trace!("{} loaded by {}", path.display(), backend.name());
                    return Ok(MetaFile {
                        manager: self,
                        path: path.to_path_buf(),
                        backend: idx,
                        field: DateField::parse(raw.as_deref()),
                        pending: None,
                    });
                }
                Err(err) => {
                    debug!(
                        "Backend {} failed on {}: {}",
                        backend.name(),
                        path.display(),
                        err
                    );
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| Error::NotReadable(path.to_path_buf())))
    }

    pub fn is_date_damaged(&self, path: &Path) -> Result<bool, Error> {
        Ok(self.load(path)?.field().is_damaged())
    }

    /// Raw damaged value, `None` when the field is absent or sound.
    pub fn damaged_date_string(&self, path: &Path) -> Result<Option<String>, Error> {
        match self.load(path)?.field {
            DateField::Damaged(raw) => Ok(Some(raw)),
            _ => Ok(None),
        }
    }

    fn editor_for(&self, ext: &str, preferred: usize) -> Option<usize> {
        let editors = self.editors.get(ext)?;
        if editors.contains(&preferred) {
            Some(preferred)
        } else {
            editors.first().copied()
        }
    }
}

/// A file whose original-date field has been read.
pub struct MetaFile<'a> {
    manager: &'a MetaManager,
    path: PathBuf,
    backend: usize,
    field: DateField,
    pending: Option<NaiveDateTime>,
}

impl MetaFile<'_> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn field(&self) -> &DateField {
        &self.field
    }

    pub fn has_valid_original_date(&self) -> bool {
        self.original_date().is_some()
    }

    /// The original date when it is present and inside the year bounds.
    pub fn original_date(&self) -> Option<NaiveDateTime> {
        self.field.valid_date(&self.manager.year_bounds)
    }

    /// Stage a new original date. Only editable extensions accept one.
    pub fn set_original_date(&mut self, date: NaiveDateTime) -> Result<(), Error> {
        if !self.manager.is_editable(&self.path) {
            return Err(Error::NotEditable(self.path.clone()));
        }
        self.pending = Some(date);
        Ok(())
    }

    /// Write the staged date. The backend that loaded the file is used when it
    /// can edit the extension, otherwise the first editor registered for it.
    pub fn save(&mut self) -> Result<(), Error> {
        let Some(date) = self.pending else {
            return Ok(());
        };
        let ext = extension_upper(&self.path).unwrap_or_default();
        let idx = self
            .manager
            .editor_for(&ext, self.backend)
            .ok_or_else(|| Error::NotEditable(self.path.clone()))?;
        self.manager.backends[idx].write_original_date(&self.path, &date)?;
        debug!(
            "{} original date set to {} by {}",
            self.path.display(),
            date,
            self.manager.backends[idx].name()
        );
        self.backend = idx;
        self.field = DateField::Present(date);
        self.pending = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct MemoryBackend {
        name: &'static str,
        readable: Vec<&'static str>,
        editable: Vec<&'static str>,
        fail_reads: bool,
        dates: RefCell<HashMap<PathBuf, String>>,
    }

    impl MemoryBackend {
        fn new(name: &'static str, readable: Vec<&'static str>, editable: Vec<&'static str>) -> Self {
            Self {
                name,
                readable,
                editable,
                fail_reads: false,
                dates: RefCell::new(HashMap::new()),
            }
        }

        fn with_date(self, path: &str, raw: &str) -> Self {
            self.dates
                .borrow_mut()
                .insert(PathBuf::from(path), raw.to_string());
            self
        }
    }

    impl MetadataBackend for MemoryBackend {
        fn name(&self) -> &'static str {
            self.name
        }

        fn readable_extensions(&self) -> &[&'static str] {
            &self.readable
        }

        fn editable_extensions(&self) -> &[&'static str] {
            &self.editable
        }

        fn read_original_date(&self, path: &Path) -> Result<Option<String>, Error> {
            if self.fail_reads {
                return Err(Error::Metadata {
                    path: path.to_path_buf(),
                    message: "corrupt".to_string(),
                });
            }
            Ok(self.dates.borrow().get(path).cloned())
        }

        fn write_original_date(&self, path: &Path, date: &NaiveDateTime) -> Result<(), Error> {
            self.dates.borrow_mut().insert(
                path.to_path_buf(),
                date.format(METADATA_DATE_FORMAT).to_string(),
            );
            Ok(())
        }
    }

    fn manager(backends: Vec<MemoryBackend>) -> MetaManager {
        let backends = backends
            .into_iter()
            .map(|b| Box::new(b) as Box<dyn MetadataBackend>)
            .collect();
        MetaManager::new(backends, YearBounds::default())
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_date_field_tri_state() {
        assert_eq!(DateField::parse(None), DateField::Absent);
        assert_eq!(DateField::parse(Some("  ")), DateField::Absent);
        assert_eq!(
            DateField::parse(Some("2021:03:04 00:00:00")),
            DateField::Present(date(2021, 3, 4))
        );
        assert_eq!(
            DateField::parse(Some("2021-03-04")),
            DateField::Present(date(2021, 3, 4))
        );
        assert!(DateField::parse(Some("0001:01:01 00:00:00")).is_damaged());
        assert!(DateField::parse(Some("0000:00:00 00:00:00")).is_damaged());
    }

    #[test]
    fn test_date_field_accepts_offsets_and_partial_dates() {
        let at = |h, mi, s| {
            NaiveDate::from_ymd_opt(2021, 3, 4)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap()
        };
        assert_eq!(
            DateField::parse(Some("2021-03-04T10:15:30Z")),
            DateField::Present(at(10, 15, 30))
        );
        assert_eq!(
            DateField::parse(Some("2021-03-04T10:15:30+01:00")),
            DateField::Present(at(10, 15, 30))
        );
        assert_eq!(
            DateField::parse(Some("2021-03-04T10:15:30.250-05:00")),
            DateField::Present(at(10, 15, 30) + chrono::TimeDelta::milliseconds(250))
        );
        assert_eq!(
            DateField::parse(Some("2021:03:04 10:15:30+02:00")),
            DateField::Present(at(10, 15, 30))
        );
        assert_eq!(
            DateField::parse(Some("2021-03-04 10:15:30+0100")),
            DateField::Present(at(10, 15, 30))
        );
        assert_eq!(
            DateField::parse(Some("2021-03-04T10:15")),
            DateField::Present(at(10, 15, 0))
        );
        assert_eq!(
            DateField::parse(Some("2021")),
            DateField::Present(date(2021, 1, 1))
        );
        assert_eq!(
            DateField::parse(Some("2021-03")),
            DateField::Present(date(2021, 3, 1))
        );
    }

    #[test]
    fn test_date_field_damaged_only_for_sentinel_or_garbage() {
        assert!(DateField::parse(Some("0001-01-01T00:00:00Z")).is_damaged());
        assert!(DateField::parse(Some("0001")).is_damaged());
        assert!(DateField::parse(Some("yesterday")).is_damaged());
        assert!(DateField::parse(Some("2021-13")).is_damaged());
        assert!(DateField::parse(Some("21")).is_damaged());
        assert!(!DateField::parse(Some("1999-12-31T23:59:59Z")).is_damaged());
    }

    #[test]
    fn test_valid_date_respects_year_bounds() {
        let bounds = YearBounds::default();
        assert!(DateField::Present(date(1700, 1, 1)).valid_date(&bounds).is_none());
        assert_eq!(
            DateField::Present(date(2000, 1, 1)).valid_date(&bounds),
            Some(date(2000, 1, 1))
        );
    }

    #[test]
    fn test_extension_table_is_case_insensitive() {
        let manager = manager(vec![MemoryBackend::new("mem", vec!["JPG", "PNG"], vec!["JPG"])]);
        assert!(manager.is_extension_readable("jpg"));
        assert!(manager.is_extension_readable("PNG"));
        assert!(manager.is_extension_editable("Jpg"));
        assert!(!manager.is_extension_editable("png"));
        assert!(!manager.is_extension_readable("mov"));
        assert_eq!(manager.readable_extensions(), vec!["JPG", "PNG"]);
    }

    #[test]
    fn test_load_falls_back_to_next_backend() {
        let mut broken = MemoryBackend::new("broken", vec!["JPG"], vec![]);
        broken.fail_reads = true;
        let working = MemoryBackend::new("working", vec!["JPG"], vec!["JPG"])
            .with_date("/p/a.jpg", "2020:01:02 03:04:05");
        let manager = manager(vec![broken, working]);

        let file = manager.load(Path::new("/p/a.jpg")).unwrap();
        assert!(file.has_valid_original_date());
        assert_eq!(
            file.original_date(),
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap().and_hms_opt(3, 4, 5)
        );
    }

    #[test]
    fn test_load_fails_when_every_backend_fails() {
        let mut broken = MemoryBackend::new("broken", vec!["JPG"], vec![]);
        broken.fail_reads = true;
        let manager = manager(vec![broken]);
        assert!(manager.load(Path::new("/p/a.jpg")).is_err());
        assert!(matches!(
            manager.load(Path::new("/p/a.txt")),
            Err(Error::NotReadable(_))
        ));
    }

    #[test]
    fn test_set_original_date_requires_editable_extension() {
        let manager = manager(vec![MemoryBackend::new("mem", vec!["PNG"], vec![])]);
        let mut file = manager.load(Path::new("/p/a.png")).unwrap();
        let err = file.set_original_date(date(2020, 1, 1)).unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_save_uses_editor_when_loader_cannot_edit() {
        let reader = MemoryBackend::new("reader", vec!["JPG"], vec![]);
        let editor = MemoryBackend::new("editor", vec![], vec!["JPG"]);
        let manager = manager(vec![reader, editor]);
        let mut file = manager.load(Path::new("/p/a.jpg")).unwrap();
        assert_eq!(file.field(), &DateField::Absent);
        file.set_original_date(date(2021, 3, 4)).unwrap();
        file.save().unwrap();
        assert_eq!(file.original_date(), Some(date(2021, 3, 4)));
    }

    #[test]
    fn test_damaged_date_detection() {
        let backend = MemoryBackend::new("mem", vec!["JPG"], vec![])
            .with_date("/p/bad.jpg", "0001:01:01 00:00:00")
            .with_date("/p/good.jpg", "2001:01:01 00:00:00");
        let manager = manager(vec![backend]);
        assert!(manager.is_date_damaged(Path::new("/p/bad.jpg")).unwrap());
        assert_eq!(
            manager.damaged_date_string(Path::new("/p/bad.jpg")).unwrap(),
            Some("0001:01:01 00:00:00".to_string())
        );
        assert!(!manager.is_date_damaged(Path::new("/p/good.jpg")).unwrap());
        assert!(!manager.is_date_damaged(Path::new("/p/none.jpg")).unwrap());
    }
}
