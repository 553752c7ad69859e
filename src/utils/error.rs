use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Prompt failed: {0}")]
    PromptError(#[from] inquire::InquireError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl EtlError {
    /// Short message for the terminal, without the source chain.
    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::CsvError(e) => format!("Could not write a delimited output file: {}", e),
            EtlError::IoError(e) => format!("File system error: {}", e),
            EtlError::PromptError(e) => format!("Could not read the start date: {}", e),
            EtlError::ConfigError { message } => message.clone(),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            EtlError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is invalid: {}", field, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Make sure the output directory exists and is writable"
            }
            EtlError::PromptError(_) => "Run in a terminal, or pass --start-date instead",
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => {
                "Fix the setting in the TOML file or on the command line"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message_names_field() {
        let err = EtlError::InvalidConfigValueError {
            field: "filters.start_date".to_string(),
            value: "2020-13-01".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Invalid value '2020-13-01' for filters.start_date: expected YYYY-MM-DD"
        );
        assert!(err.user_friendly_message().contains("filters.start_date"));
    }

    #[test]
    fn test_io_error_suggests_output_directory() {
        let err: EtlError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.recovery_suggestion().contains("output directory"));
    }

    #[test]
    fn test_cancelled_prompt_points_to_flag() {
        let err: EtlError = inquire::InquireError::OperationCanceled.into();
        assert!(err.to_string().starts_with("Prompt failed"));
        assert!(err.recovery_suggestion().contains("--start-date"));
    }
}
