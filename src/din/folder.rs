use chrono::{Months, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::path::Path;

use crate::config::YearBounds;

lazy_static! {
    static ref FOLDER_BOUNDS_RE: Regex = Regex::new(
        r"^(?P<start>\d{4}(?:-\d{2}(?:-\d{2})?)?)(?:_(?P<end>\d{4}(?:-\d{2}(?:-\d{2})?)?))?(?: |$)"
    )
    .expect("folder bounds pattern must compile");
}

/// Closed datetime interval encoded in a folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderBounds {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FolderBounds {
    pub fn contains(&self, date: &NaiveDateTime) -> bool {
        self.start <= *date && *date <= self.end
    }
}

impl fmt::Display for FolderBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.start, self.end)
    }
}

/// A `YYYY`, `YYYY-MM` or `YYYY-MM-DD` token expanded to its first and last day.
fn period(token: &str, year_bounds: &YearBounds) -> Option<(NaiveDate, NaiveDate)> {
    let mut parts = token.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    if !year_bounds.contains(year) {
        return None;
    }
    let month: Option<u32> = parts.next().map(str::parse).transpose().ok()?;
    let day: Option<u32> = parts.next().map(str::parse).transpose().ok()?;

    match (month, day) {
        (None, _) => Some((
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        )),
        (Some(month), None) => {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
            Some((first, last))
        }
        (Some(month), Some(day)) => {
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some((date, date))
        }
    }
}

/// Bounds encoded in the name of `folder`, if it follows the convention.
pub fn get_folder_bounds(folder: &Path, year_bounds: &YearBounds) -> Option<FolderBounds> {
    let name = folder.file_name()?.to_str()?;
    let caps = FOLDER_BOUNDS_RE.captures(name)?;
    let (first, first_end) = period(caps.name("start")?.as_str(), year_bounds)?;
    let last = match caps.name("end") {
        Some(end) => period(end.as_str(), year_bounds)?.1,
        None => first_end,
    };
    let bounds = FolderBounds {
        start: first.and_hms_opt(0, 0, 0)?,
        end: last.and_hms_opt(23, 59, 59)?,
    };
    (bounds.start <= bounds.end).then_some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_folder() {
        let bounds = get_folder_bounds(Path::new("/p/2019 Family"), &YearBounds::default()).unwrap();
        assert_eq!(bounds.start, day(2019, 1, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(bounds.end, day(2019, 12, 31).and_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn test_month_folder_handles_leap_years() {
        let bounds = get_folder_bounds(Path::new("/p/2020-02"), &YearBounds::default()).unwrap();
        assert_eq!(bounds.end, day(2020, 2, 29).and_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn test_explicit_range_folder() {
        let bounds = get_folder_bounds(
            Path::new("/p/2019-01-01_2019-12-31 Album"),
            &YearBounds::default(),
        )
        .unwrap();
        assert!(bounds.contains(&day(2019, 6, 1).and_hms_opt(12, 0, 0).unwrap()));
        assert!(!bounds.contains(&day(2020, 6, 1).and_hms_opt(12, 0, 0).unwrap()));
    }

    #[test]
    fn test_rejects_invalid_folder_names() {
        let bounds = YearBounds::default();
        assert!(get_folder_bounds(Path::new("/p/Holidays 2019"), &bounds).is_none());
        assert!(get_folder_bounds(Path::new("/p/20190"), &bounds).is_none());
        assert!(get_folder_bounds(Path::new("/p/2019-13"), &bounds).is_none());
        assert!(get_folder_bounds(Path::new("/p/2020_2019"), &bounds).is_none());
        assert!(get_folder_bounds(Path::new("/p/1500 Renaissance"), &bounds).is_none());
    }
}
