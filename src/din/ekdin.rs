use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

use super::{datetime_from_captures, file_stem, format_din_date, kdin, with_stem};
use crate::config::YearBounds;

pub const EDIT_PREFIX: &str = "E";

/// Stem used when removing the EKDIN leaves nothing behind.
pub const UNTITLED_STEM: &str = "untitled";

lazy_static! {
    static ref EKDIN_RE: Regex = Regex::new(
        r"^E(?P<y>\d{4})-(?P<mo>\d{2})-(?P<d>\d{2}) (?P<h>\d{2})\.(?P<mi>\d{2})\.(?P<s>\d{2})(?: |$)"
    )
    .expect("EKDIN pattern must compile");
}

/// Date requested by an EKDIN file name.
pub fn get_date(path: &Path, year_bounds: &YearBounds) -> Option<NaiveDateTime> {
    let caps = EKDIN_RE.captures(file_stem(path)?)?;
    datetime_from_captures(&caps, year_bounds)
}

pub fn is_ekdin(path: &Path, year_bounds: &YearBounds) -> bool {
    get_date(path, year_bounds).is_some()
}

/// Render a date the way an EKDIN prefix is written, so that a reviewer can
/// paste it in front of a file name.
pub fn format_date(date: &NaiveDateTime) -> String {
    format!("{}{}", EDIT_PREFIX, format_din_date(date))
}

/// Turn the edit date into a plain KDIN. `None` if the name is not EKDIN.
pub fn file_ekdin_to_kdin(path: &Path, year_bounds: &YearBounds) -> Option<PathBuf> {
    let date = get_date(path, year_bounds)?;
    let rest = remainder(path)?;
    Some(with_stem(path, &kdin::compose_stem(&date, rest)))
}

/// Strip the edit date from the name. `None` if the name is not EKDIN.
pub fn file_ekdin_to_clean(path: &Path, year_bounds: &YearBounds) -> Option<PathBuf> {
    get_date(path, year_bounds)?;
    let rest = remainder(path)?.trim();
    let stem = if rest.is_empty() { UNTITLED_STEM } else { rest };
    Some(with_stem(path, stem))
}

fn remainder(path: &Path) -> Option<&str> {
    let stem = file_stem(path)?;
    let m = EKDIN_RE.find(stem)?;
    Some(&stem[m.end()..])
}
