use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Insufficient balance to bank: requested {requested}, available {available}")]
    InsufficientBalance { requested: f64, available: f64 },

    #[error("Insufficient banked amount: requested {requested}, banked {available}")]
    InsufficientBanked { requested: f64, available: f64 },

    #[error("Failed to create pool: {reason}")]
    PoolCreationFailed { reason: String },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("No compliance balance recorded for year {year}")]
    BalanceNotFound { year: i32 },

    #[error("Compliance data has not been loaded yet")]
    NotLoaded,

    #[error("Backend request failed ({status}): {message}")]
    BackendError { status: u16, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Domain,
    Config,
    Network,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashError::InsufficientBalance { .. }
            | DashError::InsufficientBanked { .. }
            | DashError::PoolCreationFailed { .. }
            | DashError::InvalidAmount { .. }
            | DashError::BalanceNotFound { .. }
            | DashError::NotLoaded => ErrorCategory::Domain,
            DashError::BackendError { .. } | DashError::ApiError(_) => ErrorCategory::Network,
            DashError::UrlError(_)
            | DashError::ConfigValidationError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::MissingConfigError { .. } => ErrorCategory::Config,
            DashError::IoError(_) => ErrorCategory::Io,
            DashError::CsvError(_) | DashError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    /// 決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者操作被拒絕，狀態未變
            ErrorCategory::Domain => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Config | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// Message shown in the blocking notification.
    pub fn user_friendly_message(&self) -> String {
        match self {
            DashError::InsufficientBalance { .. } => "Insufficient balance to bank.".to_string(),
            DashError::InsufficientBanked { .. } => "Insufficient banked amount.".to_string(),
            DashError::PoolCreationFailed { .. } => "Failed to create pool".to_string(),
            DashError::InvalidAmount { amount } => {
                format!("Amount {} is not valid for this operation.", amount)
            }
            DashError::BalanceNotFound { year } => {
                format!("No compliance balance is available for {}.", year)
            }
            DashError::NotLoaded => "Compliance data is still loading.".to_string(),
            DashError::BackendError { .. } | DashError::ApiError(_) => {
                "The compliance backend could not be reached.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashError::InsufficientBalance { .. } => {
                "Bank at most the current surplus balance"
            }
            DashError::InsufficientBanked { .. } => {
                "Apply at most the amount banked from previous years"
            }
            DashError::PoolCreationFailed { .. } => {
                "Make sure the pool total is non-negative and no pool is already active"
            }
            DashError::InvalidAmount { .. } => "Enter a positive amount",
            DashError::BalanceNotFound { .. } => "Check the reporting year in the configuration",
            DashError::NotLoaded => "Wait for the initial load to finish",
            DashError::BackendError { .. } | DashError::ApiError(_) => {
                "Check the backend endpoint and network connectivity"
            }
            DashError::UrlError(_) => "Check the backend endpoint URL",
            DashError::ConfigValidationError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::MissingConfigError { .. } => "Fix the configuration file and retry",
            DashError::IoError(_) => "Check file paths and permissions",
            DashError::CsvError(_) | DashError::SerializationError(_) => {
                "Check the export format and output path"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_low_severity() {
        let err = DashError::InsufficientBalance {
            requested: 100.0,
            available: 0.0,
        };
        assert_eq!(err.category(), ErrorCategory::Domain);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.user_friendly_message(), "Insufficient balance to bank.");
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = DashError::MissingConfigError {
            field: "backend.endpoint".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("backend.endpoint"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = DashError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
