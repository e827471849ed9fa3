use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

use super::{datetime_from_captures, file_stem, kdin, with_stem};
use crate::config::YearBounds;

struct VendorConvention {
    name: &'static str,
    pattern: Regex,
}

impl VendorConvention {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("vendor date-in-name pattern must compile"),
        }
    }
}

lazy_static! {
    // Order matters only for names matching several conventions.
    static ref CONVENTIONS: Vec<VendorConvention> = vec![
        VendorConvention::new(
            "android",
            r"^(?:IMG|VID|PANO|MVIMG)_(?P<y>\d{4})(?P<mo>\d{2})(?P<d>\d{2})_(?P<h>\d{2})(?P<mi>\d{2})(?P<s>\d{2})(?:\D|$)",
        ),
        VendorConvention::new(
            "pixel",
            r"^PXL_(?P<y>\d{4})(?P<mo>\d{2})(?P<d>\d{2})_(?P<h>\d{2})(?P<mi>\d{2})(?P<s>\d{2})\d{3}(?:\D|$)",
        ),
        VendorConvention::new(
            "screenshot",
            r"^Screenshot_(?P<y>\d{4})(?P<mo>\d{2})(?P<d>\d{2})-(?P<h>\d{2})(?P<mi>\d{2})(?P<s>\d{2})(?:\D|$)",
        ),
        VendorConvention::new(
            "camera",
            r"^(?P<y>\d{4})(?P<mo>\d{2})(?P<d>\d{2})_(?P<h>\d{2})(?P<mi>\d{2})(?P<s>\d{2})(?:\D|$)",
        ),
        VendorConvention::new(
            "whatsapp",
            r"^WhatsApp (?:Image|Video) (?P<y>\d{4})-(?P<mo>\d{2})-(?P<d>\d{2}) at (?P<h>\d{2})\.(?P<mi>\d{2})\.(?P<s>\d{2})",
        ),
        VendorConvention::new(
            "whatsapp-legacy",
            r"^(?:IMG|VID|AUD)-(?P<y>\d{4})(?P<mo>\d{2})(?P<d>\d{2})-WA\d{4}",
        ),
    ];
}

fn matching_convention(
    stem: &str,
    year_bounds: &YearBounds,
) -> Option<(&'static VendorConvention, NaiveDateTime)> {
    CONVENTIONS.iter().find_map(|convention| {
        let caps = convention.pattern.captures(stem)?;
        datetime_from_captures(&caps, year_bounds).map(|date| (convention, date))
    })
}

/// Date encoded by a vendor naming convention.
pub fn get_date(path: &Path, year_bounds: &YearBounds) -> Option<NaiveDateTime> {
    matching_convention(file_stem(path)?, year_bounds).map(|(_, date)| date)
}

pub fn is_proprietary_din(path: &Path, year_bounds: &YearBounds) -> bool {
    get_date(path, year_bounds).is_some()
}

/// Name of the vendor convention the file follows, for logging.
pub fn convention_name(path: &Path, year_bounds: &YearBounds) -> Option<&'static str> {
    matching_convention(file_stem(path)?, year_bounds).map(|(c, _)| c.name)
}

/// Canonical KDIN name for a vendor-named file. The vendor stem is kept after
/// the date so that no information is lost.
pub fn kdin_from_proprietary_din(path: &Path, year_bounds: &YearBounds) -> Option<PathBuf> {
    let stem = file_stem(path)?;
    let (_, date) = matching_convention(stem, year_bounds)?;
    Some(with_stem(path, &kdin::compose_stem(&date, stem)))
}
