// Windowed district aggregation.
//
// Everything in this module is a pure function: records and windows come in,
// a freshly built result comes out. The caller keeps the last `DistrictStats`
// around for the completion pass instead of this module caching anything.
use crate::calendar::parse_roc_date;
use crate::types::StationRecord;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;

/// Inclusive time span. Callers normalize both ends to day boundaries
/// (start 00:00:00.000, end 23:59:59.999) before handing the window to
/// `aggregate`; no normalization or ordering validation happens here, and an
/// inverted window simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Caller-side helper: span two dates inclusively, normalized to day
    /// boundaries.
    pub fn from_days(start: NaiveDate, end: NaiveDate) -> TimeWindow {
        TimeWindow {
            start: start.and_time(NaiveTime::MIN),
            end: end.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::milliseconds(1),
        }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DistrictCounts {
    /// Inspections inside window A, the year-to-date baseline.
    pub baseline: u32,
    /// Inspections inside window B, the current selection.
    pub current: u32,
    /// Always `baseline + current`, recomputed after every classification
    /// pass rather than accumulated incrementally.
    pub total: u32,
}

/// Per-district counts keyed by district name. Rebuilt in full on every run;
/// iteration order carries no meaning, sorting is a presentation concern.
pub type DistrictStats = HashMap<String, DistrictCounts>;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionEntry {
    pub label: String,
    pub percentage: f64,
}

/// Label of the synthetic all-districts row appended by `completion`.
pub const AGGREGATE_LABEL: &str = "總轄區";

/// Classify every record into at most one window per district.
///
/// Records with an empty district are excluded entirely. Every distinct
/// non-empty district seen gets an entry, zeroed if none of its records
/// count (unparseable inspection date, or date outside both windows).
///
/// Window A is checked before window B and the two are mutually exclusive
/// per record: even if a caller supplies overlapping windows by mistake, a
/// record matching A is never also counted in B.
pub fn aggregate(
    records: &[StationRecord],
    window_a: &TimeWindow,
    window_b: &TimeWindow,
) -> DistrictStats {
    let mut stats = DistrictStats::new();
    for record in records {
        if record.district.is_empty() {
            continue;
        }
        let counts = stats.entry(record.district.clone()).or_default();
        let Some(date) = parse_roc_date(&record.inspection_date) else {
            continue;
        };
        let at = date.and_time(NaiveTime::MIN);
        if window_a.contains(at) {
            counts.baseline += 1;
        } else if window_b.contains(at) {
            counts.current += 1;
        }
    }
    // Final pass so the invariant holds exactly even if the window logic
    // above ever changes.
    for counts in stats.values_mut() {
        counts.total = counts.baseline + counts.current;
    }
    stats
}

/// Derive completion percentages from previously computed stats and a
/// district-to-target mapping. Safe to call repeatedly as targets change;
/// never re-scans records.
///
/// Districts without a strictly positive target are skipped (and excluded
/// from the aggregate sums). Per-district entries are ordered alphabetically
/// to line up with the rendered classification table; the aggregate row is
/// always last. No rounding happens here.
pub fn completion(stats: &DistrictStats, targets: &HashMap<String, f64>) -> Vec<CompletionEntry> {
    let mut districts: Vec<&String> = stats.keys().collect();
    districts.sort();

    let mut entries = Vec::new();
    let mut sum_total = 0u32;
    let mut sum_target = 0f64;
    for district in districts {
        let target = match targets.get(district) {
            Some(t) if *t > 0.0 => *t,
            _ => continue,
        };
        let counts = stats[district];
        entries.push(CompletionEntry {
            label: district.clone(),
            percentage: f64::from(counts.total) / target * 100.0,
        });
        sum_total += counts.total;
        sum_target += target;
    }
    if sum_target > 0.0 {
        entries.push(CompletionEntry {
            label: AGGREGATE_LABEL.to_string(),
            percentage: f64::from(sum_total) / sum_target * 100.0,
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::{aggregate, completion, CompletionEntry, DistrictCounts, TimeWindow, AGGREGATE_LABEL};
    use crate::types::StationRecord;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn record(district: &str, inspection_date: &str) -> StationRecord {
        StationRecord {
            station_name: "測試站".to_string(),
            district: district.to_string(),
            station_type: "自立式".to_string(),
            height_m: Some(30.0),
            prev_maintenance_date: "112/11/01".to_string(),
            inspection_date: inspection_date.to_string(),
            improvement: String::new(),
            notes: String::new(),
        }
    }

    fn window(y1: i32, m1: u32, d1: u32, y2: i32, m2: u32, d2: u32) -> TimeWindow {
        TimeWindow::from_days(
            NaiveDate::from_ymd_opt(y1, m1, d1).unwrap(),
            NaiveDate::from_ymd_opt(y2, m2, d2).unwrap(),
        )
    }

    // Window A: 2024-01-01 ..= 2024-03-31, window B: 2024-04-01 ..= 2024-04-30.
    fn ytd_and_april() -> (TimeWindow, TimeWindow) {
        (window(2024, 1, 1, 2024, 3, 31), window(2024, 4, 1, 2024, 4, 30))
    }

    #[test]
    fn counts_each_window_and_recomputes_total() {
        let (a, b) = ytd_and_april();
        let records = vec![
            record("北區", "113/02/10"),
            record("北區", "113/03/05"),
            record("北區", "113/04/12"),
            record("南區", "113/04/30"),
        ];
        let stats = aggregate(&records, &a, &b);
        assert_eq!(stats["北區"], DistrictCounts { baseline: 2, current: 1, total: 3 });
        assert_eq!(stats["南區"], DistrictCounts { baseline: 0, current: 1, total: 1 });
        for counts in stats.values() {
            assert_eq!(counts.total, counts.baseline + counts.current);
        }
    }

    #[test]
    fn record_outside_both_windows_is_not_counted() {
        let (a, b) = ytd_and_april();
        let stats = aggregate(&[record("北區", "112/12/31")], &a, &b);
        assert_eq!(stats["北區"], DistrictCounts::default());
    }

    #[test]
    fn empty_district_is_excluded_entirely() {
        let (a, b) = ytd_and_april();
        let stats = aggregate(&[record("", "113/02/10")], &a, &b);
        assert!(stats.is_empty());
    }

    #[test]
    fn unparseable_date_still_registers_the_district() {
        let (a, b) = ytd_and_april();
        let records = vec![record("東區", "not a date"), record("東區", "113/05")];
        let stats = aggregate(&records, &a, &b);
        assert_eq!(stats["東區"], DistrictCounts::default());
    }

    #[test]
    fn window_a_takes_priority_when_windows_overlap() {
        // Both windows cover all of April; the record must land in A only.
        let a = window(2024, 4, 1, 2024, 4, 30);
        let b = window(2024, 4, 1, 2024, 4, 30);
        let stats = aggregate(&[record("北區", "113/04/15")], &a, &b);
        assert_eq!(stats["北區"], DistrictCounts { baseline: 1, current: 0, total: 1 });
    }

    #[test]
    fn window_boundaries_are_inclusive_per_day() {
        let (a, b) = ytd_and_april();
        // Exactly on window A's last day.
        let stats = aggregate(&[record("北區", "113/03/31")], &a, &b);
        assert_eq!(stats["北區"], DistrictCounts { baseline: 1, current: 0, total: 1 });
        // One day later falls out of A and into B.
        let stats = aggregate(&[record("北區", "113/04/01")], &a, &b);
        assert_eq!(stats["北區"], DistrictCounts { baseline: 0, current: 1, total: 1 });
    }

    #[test]
    fn aggregation_is_idempotent_over_identical_inputs() {
        let (a, b) = ytd_and_april();
        let records = vec![
            record("北區", "113/02/10"),
            record("南區", "113/04/12"),
            record("東區", "bad"),
        ];
        let first = aggregate(&records, &a, &b);
        let second = aggregate(&records, &a, &b);
        assert_eq!(first, second);
    }

    #[test]
    fn completion_percentages_and_aggregate_row() {
        let mut stats = HashMap::new();
        stats.insert("北區".to_string(), DistrictCounts { baseline: 15, current: 25, total: 40 });
        let targets = HashMap::from([("北區".to_string(), 50.0)]);
        let entries = completion(&stats, &targets);
        assert_eq!(
            entries,
            vec![
                CompletionEntry { label: "北區".to_string(), percentage: 80.0 },
                CompletionEntry { label: AGGREGATE_LABEL.to_string(), percentage: 80.0 },
            ]
        );
    }

    #[test]
    fn completion_skips_missing_and_non_positive_targets() {
        let mut stats = HashMap::new();
        stats.insert("北區".to_string(), DistrictCounts { baseline: 0, current: 40, total: 40 });
        stats.insert("南區".to_string(), DistrictCounts { baseline: 0, current: 10, total: 10 });

        // Zero target: no per-district entry and no aggregate row.
        let targets = HashMap::from([("北區".to_string(), 0.0)]);
        assert!(completion(&stats, &targets).is_empty());

        // Only one district qualifies; the aggregate covers just that one.
        let targets = HashMap::from([("北區".to_string(), 80.0), ("南區".to_string(), -5.0)]);
        let entries = completion(&stats, &targets);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "北區");
        assert_eq!(entries[0].percentage, 50.0);
        assert_eq!(entries[1].label, AGGREGATE_LABEL);
        assert_eq!(entries[1].percentage, 50.0);
    }

    #[test]
    fn completion_orders_districts_alphabetically_with_aggregate_last() {
        let mut stats = HashMap::new();
        for district in ["南區", "北區", "東區"] {
            stats.insert(district.to_string(), DistrictCounts { baseline: 1, current: 1, total: 2 });
        }
        let targets: HashMap<String, f64> =
            stats.keys().map(|k| (k.clone(), 4.0)).collect();
        let entries = completion(&stats, &targets);
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        let mut expected: Vec<&str> = vec!["南區", "北區", "東區"];
        expected.sort();
        expected.push(AGGREGATE_LABEL);
        assert_eq!(labels, expected);
    }
}
