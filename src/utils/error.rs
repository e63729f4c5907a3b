use thiserror::Error;

/// Failures raised by an order store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("order store unavailable: {message}")]
    Unavailable { message: String },

    #[error("malformed order record at line {line}: {message}")]
    Malformed { line: u64, message: String },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid quarter {quarter}: expected a value between 1 and 4")]
    InvalidQuarter { quarter: u32 },

    #[error("Invalid year {year}: outside the supported calendar range")]
    InvalidYear { year: i32 },

    #[error("Order store unavailable while building Q{quarter} {year} report: {source}")]
    StoreUnavailable {
        quarter: u32,
        year: i32,
        #[source]
        source: StoreError,
    },

    #[error("Q{quarter} {year} totals overflow while adding order {order_id}")]
    TotalsOverflow {
        quarter: u32,
        year: i32,
        order_id: u64,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
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
    Store,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::InvalidQuarter { .. } | ReportError::InvalidYear { .. } => {
                ErrorCategory::Input
            }
            ReportError::StoreUnavailable { .. } | ReportError::TotalsOverflow { .. } => {
                ErrorCategory::Store
            }
            ReportError::CsvError(_)
            | ReportError::IoError(_)
            | ReportError::SerializationError(_) => ErrorCategory::Output,
            ReportError::ConfigError { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::Store => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ReportError::InvalidQuarter { .. } => {
                "Pick a quarter between 1 and 4, or omit it to use the current quarter".to_string()
            }
            ReportError::InvalidYear { .. } => {
                "Pass a four-digit calendar year, or omit it to use the current year".to_string()
            }
            ReportError::StoreUnavailable { .. } => {
                "Check that the order source is reachable and readable, then run the report again"
                    .to_string()
            }
            ReportError::TotalsOverflow { .. } => {
                "Check the order source for corrupt subtotal, tax or total amounts".to_string()
            }
            ReportError::CsvError(_) | ReportError::IoError(_) => {
                "Check the output directory exists and is writable".to_string()
            }
            ReportError::SerializationError(_) => "Try the text output format".to_string(),
            ReportError::ConfigError { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::InvalidQuarter { quarter } => {
                format!("Quarter {} does not exist (use 1-4)", quarter)
            }
            ReportError::InvalidYear { year } => format!("Year {} cannot be reported on", year),
            ReportError::StoreUnavailable { quarter, year, .. } => format!(
                "Could not read orders for Q{} {}: the order store is unavailable",
                quarter, year
            ),
            ReportError::TotalsOverflow {
                quarter,
                year,
                order_id,
            } => format!(
                "Q{} {} totals are too large to compute (order {})",
                quarter, year, order_id
            ),
            ReportError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_failure_keeps_period_context() {
        let err = ReportError::StoreUnavailable {
            quarter: 2,
            year: 2024,
            source: StoreError::Unavailable {
                message: "connection refused".to_string(),
            },
        };

        let text = err.to_string();
        assert!(text.contains("Q2 2024"));
        assert!(text.contains("connection refused"));
        assert_eq!(err.category(), ErrorCategory::Store);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_invalid_quarter_is_recoverable_input() {
        let err = ReportError::InvalidQuarter { quarter: 5 };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.severity() < ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("Quarter 5"));
    }
}
