//! EXIF backend for still images. The original date is `DateTimeOriginal`,
//! read with `kamadak-exif` and written with `little_exif`.

use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{metadata_error, MetadataBackend};
use crate::error::Error;

/// EXIF stores dates without zone, colon separated.
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

const EXIF_READABLE: &[&str] = &["HEIC", "HEIF", "JPEG", "JPG", "PNG", "TIF", "TIFF", "WEBP"];

const EXIF_EDITABLE: &[&str] = &["JPEG", "JPG", "PNG", "TIF", "TIFF", "WEBP"];

pub struct ExifBackend;

impl MetadataBackend for ExifBackend {
    fn name(&self) -> &'static str {
        "exif"
    }

    fn readable_extensions(&self) -> &[&'static str] {
        EXIF_READABLE
    }

    fn editable_extensions(&self) -> &[&'static str] {
        EXIF_EDITABLE
    }

    fn read_original_date(&self, path: &Path) -> Result<Option<String>, Error> {
        let mut reader = BufReader::new(File::open(path)?);
        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            // A picture without an EXIF block simply has no date.
            Err(exif::Error::NotFound(_)) => return Ok(None),
            Err(err) => return Err(metadata_error(path, err)),
        };

        let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) else {
            return Ok(None);
        };
        match &field.value {
            Value::Ascii(parts) => Ok(parts.first().map(|raw| {
                String::from_utf8_lossy(raw)
                    .trim_end_matches('\0')
                    .to_string()
            })),
            _ => Ok(None),
        }
    }

    fn write_original_date(&self, path: &Path, date: &NaiveDateTime) -> Result<(), Error> {
        let mut metadata = Metadata::new_from_path(path).map_err(|e| metadata_error(path, e))?;
        metadata.set_tag(ExifTag::DateTimeOriginal(
            date.format(EXIF_DATE_FORMAT).to_string(),
        ));
        metadata
            .write_to_file(path)
            .map_err(|e| metadata_error(path, e))
    }
}
