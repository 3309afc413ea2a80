use crate::core::ConfigProvider;
use crate::domain::model::{ExportFormat, ScoreSource};
use crate::export::layout::DEFAULT_REPORT_TITLE;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_BLANK_STUDENTS: usize = 3;
const DEFAULT_BLANK_SUBJECTS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: Option<ReportSection>,
    #[serde(default)]
    pub input: InputConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: Option<String>,
    pub students: Option<usize>,
    pub subjects: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub txt: Option<String>,
    pub pdf: Option<String>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SCORES_DIR})，未設定的變數保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigValidationError {
            field: "environment".to_string(),
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::{
            validate_file_extension, validate_formats, validate_non_empty_string, validate_path,
            validate_positive_number,
        };

        validate_path("output.path", &self.output.path)?;
        validate_formats("output.formats", &self.output.formats, &ExportFormat::SUPPORTED)?;

        if let Some(path) = &self.input.path {
            validate_path("input.path", path)?;
            validate_file_extension("input.path", path, &["csv", "txt"])?;
        }
        if let Some(students) = self.input.students {
            validate_positive_number("input.students", students, 1)?;
        }
        if let Some(subjects) = self.input.subjects {
            validate_positive_number("input.subjects", subjects, 1)?;
        }

        if let Some(title) = self.report.as_ref().and_then(|r| r.title.as_deref()) {
            validate_non_empty_string("report.title", title)?;
        }

        if let Some(names) = &self.output.filenames {
            for (field, name) in [
                ("output.filenames.txt", &names.txt),
                ("output.filenames.pdf", &names.pdf),
                ("output.filenames.json", &names.json),
            ] {
                if let Some(name) = name {
                    validate_path(field, name)?;
                }
            }
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !["compact", "json"].contains(&format) {
                return Err(ReportError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f == "json")
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn score_source(&self) -> ScoreSource {
        match &self.input.path {
            Some(path) => ScoreSource::File(path.clone()),
            None => ScoreSource::Blank {
                students: self.input.students.unwrap_or(DEFAULT_BLANK_STUDENTS),
                subjects: self.input.subjects.unwrap_or(DEFAULT_BLANK_SUBJECTS),
            },
        }
    }

    fn num_subjects(&self) -> Option<usize> {
        self.input.subjects
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn report_title(&self) -> &str {
        self.report
            .as_ref()
            .and_then(|r| r.title.as_deref())
            .unwrap_or(DEFAULT_REPORT_TITLE)
    }

    fn file_name_for(&self, format: ExportFormat) -> String {
        let custom = self.output.filenames.as_ref().and_then(|names| match format {
            ExportFormat::Text => names.txt.clone(),
            ExportFormat::Pdf => names.pdf.clone(),
            ExportFormat::Json => names.json.clone(),
        });
        custom.unwrap_or_else(|| format.default_file_name().to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[report]
title = "Term 1 Results"

[input]
path = "scores.csv"
subjects = 5

[output]
path = "./test-output"
formats = ["txt", "pdf"]

[output.filenames]
pdf = "term1.pdf"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.report_title(), "Term 1 Results");
        assert_eq!(
            config.score_source(),
            ScoreSource::File("scores.csv".to_string())
        );
        assert_eq!(config.num_subjects(), Some(5));
        assert_eq!(config.file_name_for(ExportFormat::Pdf), "term1.pdf");
        assert_eq!(
            config.file_name_for(ExportFormat::Text),
            "student_results.txt"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_blank_grid() {
        let toml_content = r#"
[output]
path = "./output"
formats = ["txt"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.score_source(),
            ScoreSource::Blank {
                students: 3,
                subjects: 4
            }
        );
        assert_eq!(config.report_title(), DEFAULT_REPORT_TITLE);
        assert!(!config.verbose());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_SCORES_DIR", "/data/class-7b");

        let toml_content = r#"
[input]
path = "${TEST_SCORES_DIR}/scores.csv"

[output]
path = "./output"
formats = ["txt"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.input.path.as_deref(),
            Some("/data/class-7b/scores.csv")
        );

        std::env::remove_var("TEST_SCORES_DIR");
    }

    #[test]
    fn test_unset_env_var_is_left_in_place() {
        let toml_content = r#"
[output]
path = "${TEST_UNSET_OUTPUT_DIR_7F3A}"
formats = ["txt"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output.path, "${TEST_UNSET_OUTPUT_DIR_7F3A}");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[output]
path = "./output"
formats = ["txt", "docx"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let bad_logging = r#"
[output]
path = "./output"
formats = ["pdf"]

[logging]
format = "yaml"
"#;
        let config = TomlConfig::from_toml_str(bad_logging).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[output\npath = 1");
        assert!(matches!(
            result,
            Err(ReportError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[report]
title = "File Test"

[output]
path = "./output"
formats = ["json"]

[logging]
verbose = true
format = "json"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report_title(), "File Test");
        assert!(config.verbose());
        assert!(config.json_logs());
    }
}
