//! Date-in-name conventions.
//!
//! Pure string <-> date functions over file stems and folder names:
//! - `kdin`: plain date-in-name, `2021-03-04 10.15.30 beach.jpg`
//! - `ekdin`: edit date-in-name, `E2021-03-04 10.15.30 beach.jpg`
//! - `proprietary`: vendor conventions such as `IMG_20210304_101530.jpg`
//! - `folder`: folder-level date bounds, `2019-06_2019-08 Summer`
//!
//! Every decoder rejects dates whose year lies outside the given `YearBounds`.

pub mod ekdin;
pub mod folder;
pub mod kdin;
pub mod proprietary;

use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

use crate::config::YearBounds;

/// Date layout shared by KDIN and EKDIN.
pub const DIN_DATE_FORMAT: &str = "%Y-%m-%d %H.%M.%S";

pub fn format_din_date(date: &NaiveDateTime) -> String {
    date.format(DIN_DATE_FORMAT).to_string()
}

pub(crate) fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// Rebuild `path` with a new stem, keeping its folder and extension.
pub(crate) fn with_stem(path: &Path, stem: &str) -> PathBuf {
    let file_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem.to_string(),
    };
    path.with_file_name(file_name)
}

/// Build a bounded datetime out of numeric captures. Returns `None` on
/// impossible calendar values or years outside the bounds.
pub(crate) fn bounded_datetime(
    year: i32,
    [month, day, hour, minute, second]: [u32; 5],
    year_bounds: &YearBounds,
) -> Option<NaiveDateTime> {
    if !year_bounds.contains(year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Read the named groups `y mo d h mi s` of a match. Missing time groups
/// default to midnight.
pub(crate) fn datetime_from_captures(
    caps: &regex::Captures<'_>,
    year_bounds: &YearBounds,
) -> Option<NaiveDateTime> {
    let year: i32 = caps.name("y")?.as_str().parse().ok()?;
    let month = capture_u32(caps, "mo")?;
    let day = capture_u32(caps, "d")?;
    let hour = optional_u32(caps, "h")?;
    let minute = optional_u32(caps, "mi")?;
    let second = optional_u32(caps, "s")?;
    bounded_datetime(year, [month, day, hour, minute, second], year_bounds)
}

fn capture_u32(caps: &regex::Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse().ok()
}

fn optional_u32(caps: &regex::Captures<'_>, name: &str) -> Option<u32> {
    match caps.name(name) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(0),
    }
}
