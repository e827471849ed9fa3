use chrono::{NaiveDateTime, TimeDelta};
use tracing::info;

use super::{Analyzer, PassReport, Tag};
use crate::din::ekdin;
use crate::error::Error;
use crate::record::RecordStore;

/// Whether two dates differ by more than `margin_secs`.
pub(crate) fn dates_diverge(a: &NaiveDateTime, b: &NaiveDateTime, margin_secs: i64) -> bool {
    (*a - *b).abs() > TimeDelta::seconds(margin_secs)
}

impl Analyzer {
    /// Report files whose KDIN and metadata dates disagree by more than the
    /// configured margin. The metadata date is given as an EKDIN prefix.
    pub fn analyse_date_consistency(&self, store: &RecordStore) -> Result<PassReport, Error> {
        info!("Scanning file metadata dates and KDIN consistency...");
        let mut report = PassReport::new();

        for (_, record) in store.iter() {
            if !(record.has_kdin() && record.has_valid_metadata_date()) {
                continue;
            }
            let meta_date = record.metadata_original_date()?;
            let Some(kdin_date) = record.kdin_date(self.year_bounds()) else {
                continue;
            };
            if dates_diverge(&meta_date, &kdin_date, self.config.margin_secs) {
                report.push(
                    Tag::Inconsistent,
                    record.path(),
                    Some(ekdin::format_date(&meta_date)),
                );
            }
        }

        report.log(&self.root);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_margin_is_exclusive_and_symmetric() {
        assert!(!dates_diverge(&at(10, 0, 30), &at(10, 0, 0), 60));
        assert!(!dates_diverge(&at(10, 1, 0), &at(10, 0, 0), 60));
        assert!(dates_diverge(&at(10, 1, 1), &at(10, 0, 0), 60));
        assert!(dates_diverge(&at(10, 0, 0), &at(10, 2, 0), 60));
    }
}
