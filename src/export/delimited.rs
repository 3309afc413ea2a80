use crate::domain::model::RankedReport;
use crate::export::{format_percentage, format_score};
use crate::utils::error::{ReportError, Result};

pub const FIXED_COLUMNS: [&str; 4] = ["Student", "Rank", "Total Score", "Percentage (%)"];

/// Serializes the report as CSV: a header row, then one row per entry in
/// report order.
pub fn to_delimited_text(report: &RankedReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = FIXED_COLUMNS.to_vec();
    header.extend(report.subjects().iter().map(String::as_str));
    writer.write_record(&header)?;

    for entry in report.entries() {
        let mut record = vec![
            entry.student.clone(),
            entry.rank.to_string(),
            format_score(entry.total),
            format_percentage(entry.percentage),
        ];
        record.extend(entry.scores.iter().map(|s| format_score(*s)));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::export(format!("failed to flush CSV output: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ReportError::export(format!("CSV output is not valid UTF-8: {}", e)))
}
