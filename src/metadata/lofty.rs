//! Tag backends built on `lofty`. The original date lives in the
//! `RecordingDate` item of the primary tag.

use chrono::NaiveDateTime;
use lofty::config::WriteOptions;
use lofty::file::{TaggedFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagExt};
use std::path::Path;

use super::{metadata_error, MetadataBackend, METADATA_DATE_FORMAT};
use crate::error::Error;

const TAG_READABLE: &[&str] = &[
    "AAC", "AIF", "AIFF", "APE", "FLAC", "M4A", "M4B", "M4V", "MP4", "MPC", "OGG", "OPUS",
    "SPX", "WAV", "WV",
];

const TAG_EDITABLE: &[&str] = &[
    "AIF", "AIFF", "APE", "FLAC", "M4A", "M4B", "M4V", "MP4", "OGG", "OPUS", "WV",
];

/// Extensions whose container is commonly mislabelled. Only read by sniffing.
const PROBE_READABLE: &[&str] = &["3GP", "M4A", "M4V", "MOV", "MP4", "OGG", "WAV"];

fn recording_date(tagged: &TaggedFile) -> Option<String> {
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;
    tag.get_string(&ItemKey::RecordingDate).map(str::to_string)
}

/// Resolves the container from the file extension.
pub struct LoftyBackend;

impl MetadataBackend for LoftyBackend {
    fn name(&self) -> &'static str {
        "lofty"
    }

    fn readable_extensions(&self) -> &[&'static str] {
        TAG_READABLE
    }

    fn editable_extensions(&self) -> &[&'static str] {
        TAG_EDITABLE
    }

    fn read_original_date(&self, path: &Path) -> Result<Option<String>, Error> {
        let tagged = Probe::open(path)
            .map_err(|e| metadata_error(path, e))?
            .read()
            .map_err(|e| metadata_error(path, e))?;
        Ok(recording_date(&tagged))
    }

    fn write_original_date(&self, path: &Path, date: &NaiveDateTime) -> Result<(), Error> {
        let mut tagged = Probe::open(path)
            .map_err(|e| metadata_error(path, e))?
            .read()
            .map_err(|e| metadata_error(path, e))?;

        if tagged.primary_tag().is_none() {
            let tag_type = tagged.primary_tag_type();
            tagged.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged
            .primary_tag_mut()
            .ok_or_else(|| metadata_error(path, "no writable tag"))?;
        tag.insert_text(
            ItemKey::RecordingDate,
            date.format(METADATA_DATE_FORMAT).to_string(),
        );
        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| metadata_error(path, e))?;
        Ok(())
    }
}

/// Sniffs the container from the file content. Read-only fallback for files
/// whose extension does not match what they hold.
pub struct ProbeBackend;

impl MetadataBackend for ProbeBackend {
    fn name(&self) -> &'static str {
        "lofty-probe"
    }

    fn readable_extensions(&self) -> &[&'static str] {
        PROBE_READABLE
    }

    fn editable_extensions(&self) -> &[&'static str] {
        &[]
    }

    fn read_original_date(&self, path: &Path) -> Result<Option<String>, Error> {
        let tagged = Probe::open(path)
            .map_err(|e| metadata_error(path, e))?
            .guess_file_type()
            .map_err(|e| metadata_error(path, e))?
            .read()
            .map_err(|e| metadata_error(path, e))?;
        Ok(recording_date(&tagged))
    }

    fn write_original_date(&self, path: &Path, _date: &NaiveDateTime) -> Result<(), Error> {
        Err(Error::NotEditable(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YearBounds;
    use crate::metadata::MetaManager;

    #[test]
    fn test_default_backends_extension_table() {
        let manager = MetaManager::with_default_backends(YearBounds::default());
        assert!(manager.is_extension_readable("flac"));
        assert!(manager.is_extension_editable("FLAC"));
        assert!(manager.is_extension_readable("MOV"));
        assert!(!manager.is_extension_editable("MOV"));
        assert!(!manager.is_extension_readable("MP3"));
        assert!(!manager.is_extension_readable("PDF"));
    }

    #[test]
    fn test_unreadable_content_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.flac");
        std::fs::write(&path, b"definitely not flac").unwrap();
        assert!(LoftyBackend.read_original_date(&path).is_err());

        let manager = MetaManager::with_default_backends(YearBounds::default());
        assert!(manager.load(&path).is_err());
    }
}
