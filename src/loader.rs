use crate::calendar::parse_roc_date;
use crate::types::{RawRow, StationRecord};
use crate::util::parse_f64_safe;
use csv::ReaderBuilder;
use std::error::Error;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub parse_errors: usize,
    pub missing_district: usize,
    pub undated_rows: usize,
}

/// Load the inspection CSV and clean it into `StationRecord`s.
///
/// Rows that fail to deserialize are counted and skipped. Rows with an empty
/// district or an unparseable inspection date are kept (the analysis pass
/// excludes them itself) but counted here so the console can report data
/// quality up front.
pub fn load_and_clean(path: &str) -> Result<(Vec<StationRecord>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut missing_district = 0usize;
    let mut undated_rows = 0usize;
    let mut records: Vec<StationRecord> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };

        let district = row.district.unwrap_or_default().trim().to_string();
        if district.is_empty() {
            missing_district += 1;
        }
        let inspection_date = row.inspection_date.unwrap_or_default().trim().to_string();
        if parse_roc_date(&inspection_date).is_none() {
            undated_rows += 1;
        }

        records.push(StationRecord {
            station_name: row.station_name.unwrap_or_default().trim().to_string(),
            district,
            station_type: row
                .station_type
                .unwrap_or_else(|| "Unspecified".to_string())
                .trim()
                .to_string(),
            height_m: parse_f64_safe(row.height_m.as_deref()),
            prev_maintenance_date: row.prev_maintenance_date.unwrap_or_default().trim().to_string(),
            inspection_date,
            improvement: row.improvement.unwrap_or_default().trim().to_string(),
            notes: row.notes.unwrap_or_default().trim().to_string(),
        });
    }

    let kept_rows = records.len();
    let report = LoadReport {
        total_rows,
        kept_rows,
        parse_errors,
        missing_district,
        undated_rows,
    };
    Ok((records, report))
}
