use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("PDF rendering failed: {message}")]
    Render { message: String },

    #[error("Export failed: {message}")]
    Export { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Rendering,
    Export,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::InvalidInput { .. } => ErrorCategory::Input,
            ReportError::Render { .. } => ErrorCategory::Rendering,
            ReportError::Export { .. }
            | ReportError::CsvError(_)
            | ReportError::SerializationError(_) => ErrorCategory::Export,
            ReportError::IoError(_) => ErrorCategory::Io,
            ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Rendering | ErrorCategory::Export => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 依嚴重程度決定程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// 給終端使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::InvalidInput { message } => {
                format!("The score table could not be used: {}", message)
            }
            ReportError::Render { message } => {
                format!("The PDF report could not be generated: {}", message)
            }
            ReportError::Export { message } => {
                format!("The results export could not be written: {}", message)
            }
            ReportError::CsvError(e) => format!("The score grid or CSV export failed: {}", e),
            ReportError::IoError(e) => format!("A file could not be read or written: {}", e),
            ReportError::SerializationError(e) => {
                format!("The JSON summary could not be produced: {}", e)
            }
            ReportError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            ReportError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for '{}': {}", value, field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Check that every student row has one numeric score per subject and that the student and subject counts are at least 1"
            }
            ErrorCategory::Rendering => {
                "The text export is unaffected; retry with --formats txt to get the results without the PDF"
            }
            ErrorCategory::Export => "Check the output formats and file names in the configuration",
            ErrorCategory::Io => "Check that the paths exist and that you have permission to read and write them",
            ErrorCategory::Configuration => "Fix the flagged setting and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_errors_are_distinct_from_input_errors() {
        let input = ReportError::invalid_input("table has no rows");
        let render = ReportError::render("content stream encoding failed");

        assert_eq!(input.category(), ErrorCategory::Input);
        assert_eq!(render.category(), ErrorCategory::Rendering);
        assert!(render.user_friendly_message().contains("PDF"));
        assert!(!input.user_friendly_message().contains("PDF"));
    }

    #[test]
    fn test_severity_ordering() {
        let io = ReportError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert!(ReportError::render("x").severity() < io.severity());
        assert_eq!(io.exit_code(), 3);
        assert_eq!(ReportError::render("x").exit_code(), 2);
        assert_eq!(ReportError::invalid_input("x").exit_code(), 1);
        assert_eq!(
            ReportError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: "bad".to_string()
            }
            .severity(),
            ErrorSeverity::High
        );
    }
}
