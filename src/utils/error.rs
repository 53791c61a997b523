use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed page: {message}")]
    MalformedPage { message: String },

    #[error("Cannot convert {field} value {value:?} to a number")]
    NumericConversion { field: String, value: String },

    #[error("Invalid performance record: {message}")]
    InvalidRecord { message: String },

    #[error("Schema mismatch: expected columns [{expected}], found [{found}]")]
    SchemaMismatch { expected: String, found: String },

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}' ({value:?}): {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn malformed(message: impl Into<String>) -> Self {
        EtlError::MalformedPage {
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::Network(_) | EtlError::HttpStatus { .. } => ErrorSeverity::Medium,
            EtlError::MalformedPage { .. }
            | EtlError::NumericConversion { .. }
            | EtlError::InvalidRecord { .. }
            | EtlError::SchemaMismatch { .. } => ErrorSeverity::High,
            EtlError::Config { .. } | EtlError::Validation { .. } | EtlError::Url(_) => {
                ErrorSeverity::High
            }
            EtlError::Csv(_) | EtlError::Serialization(_) | EtlError::Io(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::Network(_) | EtlError::HttpStatus { .. } => {
                "Check the network connection and that the results site is reachable, then re-run"
            }
            EtlError::MalformedPage { .. } => {
                "The page layout may have changed; inspect the page in a browser"
            }
            EtlError::NumericConversion { .. } | EtlError::InvalidRecord { .. } => {
                "A published grade or score is corrupt; check the offending round page"
            }
            EtlError::SchemaMismatch { .. } => "Tables with different columns cannot be joined",
            EtlError::Config { .. } | EtlError::Validation { .. } | EtlError::Url(_) => {
                "Fix the command line arguments or configuration file"
            }
            EtlError::Csv(_) | EtlError::Serialization(_) | EtlError::Io(_) => {
                "Check that the input lists exist and the output directory is writable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
