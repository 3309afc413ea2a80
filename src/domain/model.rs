use crate::utils::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 一位學生的原始分數列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRow {
    pub label: String,
    pub scores: Vec<f64>,
}

impl StudentRow {
    pub fn new(label: impl Into<String>, scores: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            scores,
        }
    }
}

/// Student-by-subject score grid, one snapshot of the input collaborator.
///
/// Every row carries exactly one score per subject column.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    subjects: Vec<String>,
    rows: Vec<StudentRow>,
}

pub fn default_student_label(index: usize) -> String {
    format!("Student {}", index + 1)
}

pub fn default_subject_label(index: usize) -> String {
    format!("Subject {}", index + 1)
}

impl ScoreTable {
    pub fn new(subjects: Vec<String>, rows: Vec<StudentRow>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.scores.len() != subjects.len() {
                return Err(ReportError::invalid_input(format!(
                    "row {} ('{}') has {} scores but the table has {} subject columns",
                    idx + 1,
                    row.label,
                    row.scores.len(),
                    subjects.len()
                )));
            }
            if let Some(col) = row.scores.iter().position(|s| !s.is_finite()) {
                return Err(ReportError::invalid_input(format!(
                    "row {} ('{}') has a non-finite score in column '{}'",
                    idx + 1,
                    row.label,
                    subjects[col]
                )));
            }
        }
        Ok(Self { subjects, rows })
    }

    /// Grid of the given size with default labels and every score at 0.
    pub fn zeroed(students: usize, subjects: usize) -> Result<Self> {
        if students < 1 {
            return Err(ReportError::invalid_input(
                "number of students must be at least 1",
            ));
        }
        if subjects < 1 {
            return Err(ReportError::invalid_input(
                "number of subjects must be at least 1",
            ));
        }

        let subject_labels = (0..subjects).map(default_subject_label).collect();
        let rows = (0..students)
            .map(|i| StudentRow::new(default_student_label(i), vec![0.0; subjects]))
            .collect();
        Self::new(subject_labels, rows)
    }

    /// Builds a table with default labels from raw score rows.
    pub fn from_scores(scores: Vec<Vec<f64>>) -> Result<Self> {
        let width = scores.first().map(Vec::len).unwrap_or(0);
        let subjects = (0..width).map(default_subject_label).collect();
        let rows = scores
            .into_iter()
            .enumerate()
            .map(|(i, s)| StudentRow::new(default_student_label(i), s))
            .collect();
        Self::new(subjects, rows)
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn rows(&self) -> &[StudentRow] {
        &self.rows
    }

    pub fn num_subjects(&self) -> usize {
        self.subjects.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub student: String,
    pub total: f64,
    pub percentage: f64,
    pub rank: usize,
    pub scores: Vec<f64>,
}

/// Computed, rank-ordered results. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedReport {
    subjects: Vec<String>,
    num_subjects: usize,
    entries: Vec<ReportEntry>,
}

impl RankedReport {
    pub(crate) fn new(subjects: Vec<String>, num_subjects: usize, entries: Vec<ReportEntry>) -> Self {
        Self {
            subjects,
            num_subjects,
            entries,
        }
    }

    /// A report with no entries; renders as the title and header only.
    pub fn empty(subjects: Vec<String>) -> Self {
        let num_subjects = subjects.len();
        Self::new(subjects, num_subjects, Vec::new())
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn num_subjects(&self) -> usize {
        self.num_subjects
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The class topper: first entry after sorting by rank.
    pub fn topper(&self) -> Option<&ReportEntry> {
        self.entries.first()
    }
}

/// 輸入來源：檔案，或是指定大小、全部為 0 的空白表格
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreSource {
    File(String),
    Blank { students: usize, subjects: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Text,
    Pdf,
    Json,
}

impl ExportFormat {
    pub const SUPPORTED: [&'static str; 3] = ["txt", "pdf", "json"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Text => "student_results.txt",
            ExportFormat::Pdf => "student_results.pdf",
            ExportFormat::Json => "student_results.json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text/csv",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(ExportFormat::Text),
            "pdf" => Ok(ExportFormat::Pdf),
            "json" => Ok(ExportFormat::Json),
            other => Err(ReportError::InvalidConfigValueError {
                field: "formats".to_string(),
                value: other.to_string(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    Self::SUPPORTED.join(", ")
                ),
            }),
        }
    }
}

/// One rendered export, ready to hand to storage.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub report: RankedReport,
    pub artifacts: Vec<ExportArtifact>,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RankedReport,
    pub written: Vec<String>,
}
