use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

use super::{datetime_from_captures, file_stem, format_din_date, with_stem};
use crate::config::YearBounds;

/// Marks a KDIN whose date was taken from the filesystem and needs review.
pub const TO_REVIEW_MARKER: &str = "[TR]";

lazy_static! {
    static ref KDIN_RE: Regex = Regex::new(
        r"^(?P<y>\d{4})-(?P<mo>\d{2})-(?P<d>\d{2}) (?P<h>\d{2})\.(?P<mi>\d{2})\.(?P<s>\d{2})(?: |$)"
    )
    .expect("KDIN pattern must compile");
}

pub(crate) fn decode_stem(stem: &str, year_bounds: &YearBounds) -> Option<NaiveDateTime> {
    let caps = KDIN_RE.captures(stem)?;
    datetime_from_captures(&caps, year_bounds)
}

/// Date carried by a KDIN file name.
pub fn get_date(path: &Path, year_bounds: &YearBounds) -> Option<NaiveDateTime> {
    decode_stem(file_stem(path)?, year_bounds)
}

pub fn is_kdin(path: &Path, year_bounds: &YearBounds) -> bool {
    get_date(path, year_bounds).is_some()
}

/// KDIN carrying the to-review marker right after the date.
pub fn is_trkdin(path: &Path, year_bounds: &YearBounds) -> bool {
    let Some(stem) = file_stem(path) else {
        return false;
    };
    match KDIN_RE.find(stem) {
        Some(m) if decode_stem(stem, year_bounds).is_some() => {
            stem[m.end()..].starts_with(TO_REVIEW_MARKER)
        }
        _ => false,
    }
}

/// `<date> <rest>`, or the bare date when there is nothing left of the name.
pub(crate) fn compose_stem(date: &NaiveDateTime, rest: &str) -> String {
    let rest = rest.trim();
    if rest.is_empty() {
        format_din_date(date)
    } else {
        format!("{} {}", format_din_date(date), rest)
    }
}

/// Prefix a name without date convention with a KDIN.
pub fn file_clean_to_kdin(path: &Path, date: &NaiveDateTime) -> PathBuf {
    let stem = file_stem(path).unwrap_or_default();
    with_stem(path, &compose_stem(date, stem))
}

/// Prefix a name without date convention with a to-review KDIN.
pub fn file_clean_to_trkdin(path: &Path, date: &NaiveDateTime) -> PathBuf {
    let stem = file_stem(path).unwrap_or_default();
    let marked = with_stem(path, &format!("{} {}", TO_REVIEW_MARKER, stem));
    file_clean_to_kdin(&marked, date)
}
