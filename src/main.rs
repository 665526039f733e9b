// Entry point and high-level CLI flow.
//
// - Option [1] loads and cleans the inspection CSV, printing diagnostics.
// - Option [2] asks for the current selection range, runs the district
//   analysis against a year-to-date baseline, and exports the results.
// - Option [3] asks for per-district targets and derives completion rates
//   from the stats cached by option [2], without re-scanning records.
mod analysis;
mod calendar;
mod keywords;
mod loader;
mod output;
mod types;
mod util;

use analysis::{DistrictStats, TimeWindow};
use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::io::{self, Write};
use types::{AnalysisSummary, CompletionRow, DistrictSummaryRow, StationRecord};

// Simple in-memory app state so we only load the CSV once but can run the
// analysis and completion passes multiple times in a single session. The
// analysis itself is pure; this is the caller-held cache it reads from.
static APP_STATE: Lazy<std::sync::Mutex<AppState>> =
    Lazy::new(|| std::sync::Mutex::new(AppState { data: None, stats: None }));

struct AppState {
    data: Option<Vec<StationRecord>>,
    stats: Option<DistrictStats>,
}

// Keyword rules applied to the improvement free text. Passed explicitly to
// the classifier; there is no ambient rule collection.
const DEFAULT_KEYWORD_RULES: &[&str] = &["鏽蝕", "傾斜", "漏水", "鬆脫", "待改善"];

/// Read a single line of input after printing the given prompt.
fn prompt_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the selection menu after a report.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match prompt_line("Back to Selection Menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load and clean the inspection CSV.
fn handle_load() {
    let path = "station_inspections.csv";
    match loader::load_and_clean(path) {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} rows loaded, {} kept)",
                util::format_int(report.total_rows as i64),
                util::format_int(report.kept_rows as i64)
            );
            println!(
                "Note: {} rows skipped due to parse errors.",
                util::format_int(report.parse_errors as i64)
            );
            if report.missing_district > 0 {
                println!(
                    "Info: {} rows have no district and will be excluded from aggregation.",
                    util::format_int(report.missing_district as i64)
                );
            }
            if report.undated_rows > 0 {
                println!(
                    "Info: {} rows have an unparseable inspection date and will not be counted.",
                    util::format_int(report.undated_rows as i64)
                );
            }
            println!("");
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
            state.stats = None;
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Prompt for one ROC-formatted date, returning `None` after an error message
/// if the input does not resolve.
fn prompt_roc_date(prompt: &str) -> Option<NaiveDate> {
    let raw = prompt_line(prompt);
    match calendar::parse_roc_date(&raw) {
        Some(d) => Some(d),
        None => {
            println!("Error: '{}' is not a valid ROC date (expected yyy/mm/dd).\n", raw);
            None
        }
    }
}

/// Handle option [2]: run the district analysis for a user-selected range.
///
/// Window B is the selected range; window A spans from January 1 of the
/// selection's start year up to the day before the selection begins. Both are
/// normalized to day boundaries here, before the engine sees them.
fn handle_analysis() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    let Some(start) = prompt_roc_date("Selection start (ROC yyy/mm/dd): ") else {
        return;
    };
    let Some(end) = prompt_roc_date("Selection end (ROC yyy/mm/dd): ") else {
        return;
    };
    if start > end {
        println!("Error: selection start must not be after selection end.\n");
        return;
    }

    let Some(year_start) = NaiveDate::from_ymd_opt(start.year(), 1, 1) else {
        println!("Error: selection year is out of range.\n");
        return;
    };
    let window_a = TimeWindow::from_days(year_start, start - Duration::days(1));
    let window_b = TimeWindow::from_days(start, end);

    println!("\nGenerating district analysis...");
    let stats = analysis::aggregate(&data, &window_a, &window_b);

    let mut districts: Vec<&String> = stats.keys().collect();
    districts.sort();
    let rows: Vec<DistrictSummaryRow> = districts
        .iter()
        .map(|district| {
            let counts = stats[*district];
            DistrictSummaryRow {
                district: (*district).clone(),
                ytd_baseline: counts.baseline,
                current_period: counts.current,
                cumulative: counts.total,
            }
        })
        .collect();

    let file = "district_summary.csv";
    if let Err(e) = output::write_csv(file, &rows) {
        eprintln!("Write error: {}", e);
    }
    println!("District Inspection Summary");
    println!(
        "(Baseline {} – {}, selection {} – {})\n",
        year_start,
        start - Duration::days(1),
        start,
        end
    );
    output::preview_table_rows(&rows, rows.len());
    println!("(Full table exported to {})\n", file);

    let keyword_rows = keywords::classify(&data, DEFAULT_KEYWORD_RULES);
    println!("Improvement Keyword Classification\n");
    output::preview_table_rows(&keyword_rows, keyword_rows.len());

    let summary = AnalysisSummary {
        total_records: data.len(),
        total_districts: stats.len(),
        undated_records: data
            .iter()
            .filter(|r| calendar::parse_roc_date(&r.inspection_date).is_none())
            .count(),
        ytd_baseline_total: stats.values().map(|c| c.baseline).sum(),
        current_period_total: stats.values().map(|c| c.current).sum(),
        cumulative_total: stats.values().map(|c| c.total).sum(),
    };
    if let Err(e) = output::write_json("analysis_summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("(Summary stats exported to analysis_summary.json)\n");

    let mut state = APP_STATE.lock().unwrap();
    state.stats = Some(stats);
}

/// Handle option [3]: derive completion rates from the cached stats.
///
/// Every district must receive a strictly positive target or the whole view
/// is suppressed; that gate lives here, not in the engine.
fn handle_completion() {
    let stats = {
        let state = APP_STATE.lock().unwrap();
        state.stats.clone()
    };
    let Some(stats) = stats else {
        println!("Error: No analysis available. Please run the district analysis first (option 2).\n");
        return;
    };

    let mut districts: Vec<&String> = stats.keys().collect();
    districts.sort();

    let mut targets: HashMap<String, f64> = HashMap::new();
    for district in &districts {
        let raw = prompt_line(&format!("Target for {}: ", district));
        match util::parse_f64_safe(Some(&raw)) {
            Some(t) if t > 0.0 => {
                targets.insert((*district).clone(), t);
            }
            _ => {
                println!(
                    "Completion view suppressed: every district needs a positive target ('{}' for {}).\n",
                    raw, district
                );
                return;
            }
        }
    }

    let entries = analysis::completion(&stats, &targets);
    let rows: Vec<CompletionRow> = entries
        .iter()
        .map(|e| CompletionRow {
            label: e.label.clone(),
            completion_pct: util::format_number(e.percentage, 1),
        })
        .collect();

    let file = "completion_report.csv";
    if let Err(e) = output::write_csv(file, &rows) {
        eprintln!("Write error: {}", e);
    }
    println!("\nTarget Completion Report\n");
    output::preview_table_rows(&rows, rows.len());
    println!("(Full table exported to {})\n", file);
}

fn main() {
    loop {
        println!("Base Station Inspection Reports");
        println!("[1] Load the inspection file");
        println!("[2] Run district analysis");
        println!("[3] Target completion report\n");
        match prompt_line("Enter choice: ").as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_analysis();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                println!("");
                handle_completion();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2, or 3.\n");
            }
        }
    }
}
