use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration parse error in '{field}': {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Delivery failed (status {status}): {message}")]
    DeliveryError { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Transport,
    System,
}

impl GatewayError {
    pub fn delivery(status: u16, message: impl Into<String>) -> Self {
        GatewayError::DeliveryError {
            status,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::ConfigError { .. }
            | GatewayError::ConfigParseError { .. }
            | GatewayError::MissingConfigError { .. }
            | GatewayError::InvalidConfigValueError { .. }
            | GatewayError::UrlError(_) => ErrorCategory::Configuration,
            GatewayError::HttpError(_) | GatewayError::DeliveryError { .. } => {
                ErrorCategory::Transport
            }
            GatewayError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GatewayError::InvalidConfigValueError { field, reason, .. } => {
                format!("設定值錯誤 '{}': {}", field, reason)
            }
            GatewayError::MissingConfigError { field } => {
                format!("缺少必要設定 '{}'", field)
            }
            GatewayError::ConfigParseError { message, .. } => {
                format!("無法解析設定檔: {}", message)
            }
            GatewayError::IoError(e) => format!("檔案存取失敗: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML file and any ${VAR} environment variables it references"
            }
            ErrorCategory::Transport => {
                "Make sure the transport service is reachable and the session is connected"
            }
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
