use crate::core::ConfigProvider;
use crate::domain::model::{ExportFormat, ScoreSource};
use crate::export::layout::DEFAULT_REPORT_TITLE;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_formats, validate_non_empty_string, validate_path,
    validate_positive_number, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Subject count of the blank grid when neither `--input` nor `--subjects` is given.
pub const DEFAULT_BLANK_SUBJECTS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "student-ranker")]
#[command(about = "Compute totals, percentages and ranks from a student score grid")]
pub struct CliConfig {
    /// CSV score grid: a header row, then one student per row
    #[arg(long)]
    pub input: Option<String>,

    /// Number of students in the blank grid used when no input is given
    #[arg(long, default_value = "3")]
    pub students: usize,

    /// Number of subjects; defaults to the grid's subject columns
    #[arg(long)]
    pub subjects: Option<usize>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "txt,pdf")]
    pub formats: Vec<String>,

    #[arg(long, default_value = DEFAULT_REPORT_TITLE)]
    pub title: String,

    /// Write a blank score grid template to this path and exit
    #[arg(long)]
    pub write_template: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn score_source(&self) -> ScoreSource {
        match &self.input {
            Some(path) => ScoreSource::File(path.clone()),
            None => ScoreSource::Blank {
                students: self.students,
                subjects: self.subjects.unwrap_or(DEFAULT_BLANK_SUBJECTS),
            },
        }
    }

    fn num_subjects(&self) -> Option<usize> {
        self.subjects
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn report_title(&self) -> &str {
        &self.title
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_path", &self.output_path)?;
        if let Some(input) = &self.input {
            validate_path("input", input)?;
            validate_file_extension("input", input, &["csv", "txt"])?;
        }
        validate_positive_number("students", self.students, 1)?;
        if let Some(subjects) = self.subjects {
            validate_positive_number("subjects", subjects, 1)?;
        }
        validate_formats("formats", &self.formats, &ExportFormat::SUPPORTED)?;
        validate_non_empty_string("title", &self.title)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_blank_grid() {
        let config = CliConfig::parse_from(["student-ranker"]);

        assert_eq!(
            config.score_source(),
            ScoreSource::Blank {
                students: 3,
                subjects: 4
            }
        );
        assert_eq!(config.formats, vec!["txt", "pdf"]);
        assert_eq!(config.report_title(), DEFAULT_REPORT_TITLE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_input_and_formats() {
        let config = CliConfig::parse_from([
            "student-ranker",
            "--input",
            "scores.csv",
            "--formats",
            "pdf,json",
            "--subjects",
            "5",
        ]);

        assert_eq!(
            config.score_source(),
            ScoreSource::File("scores.csv".to_string())
        );
        assert_eq!(config.num_subjects(), Some(5));
        assert_eq!(config.formats, vec!["pdf", "json"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let zero_students = CliConfig::parse_from(["student-ranker", "--students", "0"]);
        assert!(zero_students.validate().is_err());

        let bad_format = CliConfig::parse_from(["student-ranker", "--formats", "xlsx"]);
        assert!(bad_format.validate().is_err());

        let bad_input = CliConfig::parse_from(["student-ranker", "--input", "scores.xlsx"]);
        assert!(bad_input.validate().is_err());
    }
}
