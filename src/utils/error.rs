use crate::core::arithmetic::ArithmeticError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Expression is empty")]
    EmptyInput,

    #[error("Remote call failed: {reason}")]
    RemoteCallFailed { reason: String },

    #[error("Could not parse a numerical result from response: {response:?}")]
    UnparseableResponse { response: String },

    #[error("Invalid expression '{expression}': {source}")]
    InvalidExpression {
        expression: String,
        #[source]
        source: ArithmeticError,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Remote,
    Response,
    Evaluation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl From<reqwest::Error> for CalcError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_decode() {
            format!("malformed response body: {}", err)
        } else {
            err.to_string()
        };
        CalcError::RemoteCallFailed { reason }
    }
}

impl CalcError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::EmptyInput => ErrorCategory::Input,
            CalcError::RemoteCallFailed { .. } => ErrorCategory::Remote,
            CalcError::UnparseableResponse { .. } => ErrorCategory::Response,
            CalcError::InvalidExpression { .. } => ErrorCategory::Evaluation,
            CalcError::IoError(_) => ErrorCategory::System,
            CalcError::ConfigError { .. }
            | CalcError::ConfigValidationError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Remote | ErrorCategory::Response => ErrorSeverity::Medium,
            ErrorCategory::Evaluation | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 只有遠端呼叫失敗可以改用本地計算恢復
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::RemoteCallFailed { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CalcError::EmptyInput => "Please enter an expression first!".to_string(),
            CalcError::RemoteCallFailed { .. } => {
                "The model API could not be reached.".to_string()
            }
            CalcError::UnparseableResponse { .. } => {
                "The model answered, but no number could be found in its reply.".to_string()
            }
            CalcError::InvalidExpression { expression, .. } => {
                format!("'{}' is not a valid calculation.", expression)
            }
            CalcError::IoError(_) => "A file or terminal operation failed.".to_string(),
            CalcError::ConfigError { .. }
            | CalcError::ConfigValidationError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::MissingConfigError { .. } => {
                format!("Configuration problem: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CalcError::EmptyInput => "Type an expression such as 2+2 and press Enter.",
            CalcError::RemoteCallFailed { .. } => {
                "Check ANTHROPIC_API_KEY and network access, or run with --local-only."
            }
            CalcError::UnparseableResponse { .. } => {
                "Try again, or use --local-only to evaluate without the model."
            }
            CalcError::InvalidExpression { .. } => {
                "Use only numbers, + - * /, and parentheses; avoid dividing by zero."
            }
            CalcError::IoError(_) => "Check file paths and permissions.",
            CalcError::ConfigError { .. }
            | CalcError::ConfigValidationError { .. }
            | CalcError::InvalidConfigValueError { .. }
            | CalcError::MissingConfigError { .. } => {
                "Review the [api] section of the config file and the ANTHROPIC_* variables."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
