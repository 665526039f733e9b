// Minguo (ROC) calendar conversion.
//
// Inspection dates in the source CSV are recorded with Republic-of-China year
// numbering, which trails the Gregorian year by 1911 (e.g. `113/05/20` is
// 2024-05-20). Segments may be separated by `/` or `-`, mixed freely.
use chrono::{Duration, NaiveDate};

/// Gregorian year = ROC year + 1911.
pub const ROC_YEAR_OFFSET: i32 = 1911;

/// Convert an ROC-formatted date string into a `NaiveDate`.
///
/// The string must split into exactly three numeric segments. Anything else
/// (wrong segment count, non-numeric text, empty input) yields `None`, which
/// callers treat as "skip this record", never as a fatal error.
///
/// Month and day are deliberately not range-checked: out-of-range values roll
/// over into adjacent months and years. The month is normalized into the year
/// by euclidean div/rem, then the day is resolved as an offset from the first
/// of that month, so `113-13-01` becomes 2025-01-01 and `113/04/31` becomes
/// 2024-05-01. Existing datasets rely on this rollover.
pub fn parse_roc_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let segments: Vec<&str> = s.split(['/', '-']).collect();
    if segments.len() != 3 {
        return None;
    }
    let roc_year: i64 = segments[0].trim().parse().ok()?;
    let month: i64 = segments[1].trim().parse().ok()?;
    let day: i64 = segments[2].trim().parse().ok()?;

    let month0 = month - 1;
    let year = i64::from(ROC_YEAR_OFFSET) + roc_year + month0.div_euclid(12);
    let month = month0.rem_euclid(12) + 1;

    let first_of_month =
        NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month as u32, 1)?;
    first_of_month.checked_add_signed(Duration::days(day - 1))
}
