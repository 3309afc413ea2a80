use crate::domain::model::{RankedReport, ReportEntry};
use crate::utils::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Topper<'a> {
    student: &'a str,
    percentage: f64,
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    generated_at: String,
    num_subjects: usize,
    subjects: &'a [String],
    topper: Option<Topper<'a>>,
    entries: &'a [ReportEntry],
}

pub fn to_json_summary(report: &RankedReport) -> Result<String> {
    to_json_summary_at(report, Utc::now())
}

pub fn to_json_summary_at(report: &RankedReport, generated_at: DateTime<Utc>) -> Result<String> {
    let summary = Summary {
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        num_subjects: report.num_subjects(),
        subjects: report.subjects(),
        topper: report.topper().map(|entry| Topper {
            student: &entry.student,
            percentage: entry.percentage,
        }),
        entries: report.entries(),
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}
