use crate::types::{KeywordCountRow, StationRecord};

/// Count, per keyword rule, the records whose improvement text contains it.
///
/// Rules are passed in explicitly and their order is preserved in the output.
/// A record may match several rules; matching is plain substring search over
/// the free-text improvement field.
pub fn classify(records: &[StationRecord], rules: &[&str]) -> Vec<KeywordCountRow> {
    rules
        .iter()
        .map(|rule| KeywordCountRow {
            keyword: (*rule).to_string(),
            matches: records
                .iter()
                .filter(|r| !rule.is_empty() && r.improvement.contains(rule))
                .count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::classify;
    use crate::types::StationRecord;

    fn record(improvement: &str) -> StationRecord {
        StationRecord {
            station_name: "測試站".to_string(),
            district: "北區".to_string(),
            station_type: "自立式".to_string(),
            height_m: None,
            prev_maintenance_date: String::new(),
            inspection_date: "113/05/20".to_string(),
            improvement: improvement.to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn counts_matches_in_rule_order() {
        let records = vec![
            record("支架鏽蝕，待改善"),
            record("天線傾斜"),
            record("鏽蝕嚴重"),
            record(""),
        ];
        let rows = classify(&records, &["鏽蝕", "傾斜", "漏水"]);
        let pairs: Vec<(&str, usize)> =
            rows.iter().map(|r| (r.keyword.as_str(), r.matches)).collect();
        assert_eq!(pairs, vec![("鏽蝕", 2), ("傾斜", 1), ("漏水", 0)]);
    }

    #[test]
    fn one_record_can_match_several_rules() {
        let records = vec![record("鏽蝕且傾斜")];
        let rows = classify(&records, &["鏽蝕", "傾斜"]);
        assert_eq!(rows[0].matches, 1);
        assert_eq!(rows[1].matches, 1);
    }

    #[test]
    fn empty_rule_never_matches() {
        let records = vec![record("anything")];
        let rows = classify(&records, &[""]);
        assert_eq!(rows[0].matches, 0);
    }
}
