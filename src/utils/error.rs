use std::fmt;
use thiserror::Error;

/// 查詢失敗時的鍵種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Sample,
    Rater,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Sample => write!(f, "sample"),
            KeyKind::Rater => write!(f, "rater"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TastingError {
    #[error("Invalid configuration for '{field}' (value: {value}): {reason}")]
    InvalidConfiguration {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid value for '{field}' (value: {value}): {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {kind}: '{key}'")]
    UnknownKey { kind: KeyKind, key: String },

    #[error("Unsupported export format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Export to '{path}' failed: {reason}")]
    ExportFailed { path: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Command script error: {0}")]
    ScriptError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Export,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 程序結束碼；Low 只是警告，視為成功
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl TastingError {
    pub fn invalid_configuration(
        field: impl Into<String>,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        TastingError::InvalidConfiguration {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        TastingError::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unknown_sample(key: &str) -> Self {
        TastingError::UnknownKey {
            kind: KeyKind::Sample,
            key: key.to_string(),
        }
    }

    pub fn unknown_rater(key: &str) -> Self {
        TastingError::UnknownKey {
            kind: KeyKind::Rater,
            key: key.to_string(),
        }
    }

    pub fn export_failed(path: impl Into<String>, cause: impl fmt::Display) -> Self {
        TastingError::ExportFailed {
            path: path.into(),
            reason: cause.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TastingError::InvalidValue { .. } | TastingError::UnknownKey { .. } => {
                ErrorCategory::Input
            }
            TastingError::InvalidConfiguration { .. }
            | TastingError::ConfigError { .. }
            | TastingError::ScriptError(_) => ErrorCategory::Configuration,
            TastingError::UnsupportedFormat(_) | TastingError::ExportFailed { .. } => {
                ErrorCategory::Export
            }
            TastingError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 使用者重新輸入即可
            TastingError::InvalidValue { .. }
            | TastingError::UnknownKey { .. }
            | TastingError::UnsupportedFormat(_) => ErrorSeverity::Low,
            TastingError::ExportFailed { .. } => ErrorSeverity::Medium,
            TastingError::InvalidConfiguration { .. }
            | TastingError::ConfigError { .. }
            | TastingError::ScriptError(_) => ErrorSeverity::High,
            TastingError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            TastingError::InvalidConfiguration { field, .. } => {
                format!("Check the value given for '{}' and start the session again", field)
            }
            TastingError::InvalidValue { field, .. } => {
                format!("Enter a different value for '{}'", field)
            }
            TastingError::UnknownKey { kind, .. } => {
                format!("Use one of the {}s registered when the session started", kind)
            }
            TastingError::UnsupportedFormat(_) => "Choose 'Excel' or 'CSV'".to_string(),
            TastingError::ExportFailed { .. } => {
                "Check that the output directory exists and is writable".to_string()
            }
            TastingError::IoError(_) => {
                "Check file paths and permissions, e.g. the known samples list".to_string()
            }
            TastingError::ScriptError(_) => {
                "Make sure the command script is a JSON array of commands".to_string()
            }
            TastingError::ConfigError { .. } => {
                "Make sure the configuration file is valid TOML".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TastingError::InvalidConfiguration { reason, .. } => {
                format!("The session setup is not valid: {}", reason)
            }
            TastingError::InvalidValue { field, value, reason } => {
                format!("'{}' is not a valid {}: {}", value, field, reason)
            }
            TastingError::UnknownKey { kind, key } => format!("There is no {} called '{}'", kind, key),
            TastingError::UnsupportedFormat(format) => {
                format!("'{}' is not a supported file type", format)
            }
            TastingError::ExportFailed { path, reason } => {
                format!("Could not save the results to {}: {}", path, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TastingError>;
