use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuddyError {
    #[error("Invalid date: {value}")]
    InvalidDate { value: String },

    #[error("No start or end date was provided")]
    UnknownDate,

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("No county was provided")]
    MissingCounty,

    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者提供的日期或參數有誤
    Date,
    /// 遠端 API 無法使用
    Communication,
    Configuration,
    Internal,
}

impl BuddyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BuddyError::InvalidDate { .. }
            | BuddyError::UnknownDate
            | BuddyError::InvalidDateRange { .. }
            | BuddyError::MissingCounty => ErrorCategory::Date,
            BuddyError::CommunicationError { .. }
            | BuddyError::ApiError(_)
            | BuddyError::SerializationError(_) => ErrorCategory::Communication,
            BuddyError::ConfigError { .. }
            | BuddyError::InvalidConfigValueError { .. }
            | BuddyError::MissingConfigError { .. } => ErrorCategory::Configuration,
            BuddyError::IoError(_) => ErrorCategory::Internal,
        }
    }

    /// 是否讓使用者再試一次 (保持對話開啟)
    pub fn invites_retry(&self) -> bool {
        matches!(
            self,
            BuddyError::InvalidDate { .. } | BuddyError::UnknownDate | BuddyError::MissingCounty
        )
    }
}

pub type Result<T> = std::result::Result<T, BuddyError>;
