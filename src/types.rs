use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "StationName")]
    pub station_name: Option<String>,
    #[serde(rename = "District")]
    pub district: Option<String>,
    #[serde(rename = "StationType")]
    pub station_type: Option<String>,
    #[serde(rename = "HeightM")]
    pub height_m: Option<String>,
    #[serde(rename = "PrevMaintenanceDate")]
    pub prev_maintenance_date: Option<String>,
    #[serde(rename = "InspectionDate")]
    pub inspection_date: Option<String>,
    #[serde(rename = "Improvement")]
    pub improvement: Option<String>,
    #[serde(rename = "Notes")]
    pub notes: Option<String>,
}

/// One cleaned inspection entry. Immutable once loaded; the analysis passes
/// never mutate these.
#[derive(Debug, Clone)]
pub struct StationRecord {
    pub station_name: String,
    pub district: String,
    pub station_type: String,
    pub height_m: Option<f64>,
    pub prev_maintenance_date: String,
    pub inspection_date: String,
    pub improvement: String,
    pub notes: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DistrictSummaryRow {
    #[serde(rename = "District")]
    #[tabled(rename = "District")]
    pub district: String,
    #[serde(rename = "YtdBaseline")]
    #[tabled(rename = "YtdBaseline")]
    pub ytd_baseline: u32,
    #[serde(rename = "CurrentPeriod")]
    #[tabled(rename = "CurrentPeriod")]
    pub current_period: u32,
    #[serde(rename = "Cumulative")]
    #[tabled(rename = "Cumulative")]
    pub cumulative: u32,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CompletionRow {
    #[serde(rename = "Label")]
    #[tabled(rename = "Label")]
    pub label: String,
    #[serde(rename = "CompletionPct")]
    #[tabled(rename = "CompletionPct")]
    pub completion_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct KeywordCountRow {
    #[serde(rename = "Keyword")]
    #[tabled(rename = "Keyword")]
    pub keyword: String,
    #[serde(rename = "Matches")]
    #[tabled(rename = "Matches")]
    pub matches: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    pub total_records: usize,
    pub total_districts: usize,
    pub undated_records: usize,
    pub ytd_baseline_total: u32,
    pub current_period_total: u32,
    pub cumulative_total: u32,
}
