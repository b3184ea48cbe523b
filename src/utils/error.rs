use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    BusinessRuleViolation { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    /// 持久化存儲（資料庫等）實作 `RouteRepository` 時回報的失敗；
    /// 內建的記憶體存儲不會產生，HTTP 層一律當作 500 處理且不外洩訊息
    #[error("Route store error: {message}")]
    StoreError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API responded with {status}: {message}")]
    ApiResponseError { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 請求格式錯誤
    Validation,
    /// 找不到引用的資源
    NotFound,
    /// 請求合法但違反業務規則
    BusinessRule,
    Configuration,
    /// 其餘一律視為內部錯誤
    Internal,
    Remote,
}

impl FleetError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FleetError::ValidationError { .. } => ErrorCategory::Validation,
            FleetError::NotFound { .. } => ErrorCategory::NotFound,
            FleetError::BusinessRuleViolation { .. } => ErrorCategory::BusinessRule,
            FleetError::ConfigError { .. }
            | FleetError::InvalidConfigValueError { .. }
            | FleetError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FleetError::ApiError(_) | FleetError::ApiResponseError { .. } => {
                ErrorCategory::Remote
            }
            FleetError::StoreError { .. }
            | FleetError::IoError(_)
            | FleetError::CsvError(_)
            | FleetError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP status code the boundary layer answers with.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::BusinessRule => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Configuration | ErrorCategory::Internal => 500,
            ErrorCategory::Remote => match self {
                FleetError::ApiResponseError { status, .. } => *status,
                _ => 502,
            },
        }
    }

    /// Whether the message is safe to hand back to a caller verbatim.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::NotFound | ErrorCategory::BusinessRule
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FleetError::ApiResponseError { status, message } => {
                format!("伺服器回應 {}: {}", status, message)
            }
            FleetError::ApiError(_) => "無法連線到 marine-fleet 伺服器".to_string(),
            FleetError::ConfigError { .. }
            | FleetError::InvalidConfigValueError { .. }
            | FleetError::MissingConfigError { .. } => format!("設定錯誤: {}", self),
            other if other.is_client_error() => other.to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Check the request parameters (year range, routeIds array)",
            ErrorCategory::NotFound => "List available routes with GET /routes",
            ErrorCategory::BusinessRule => "Inspect the compliance balance before banking or pooling",
            ErrorCategory::Configuration => "Review fleet.toml and the command-line overrides",
            ErrorCategory::Remote => "Make sure the server is running and the base URL is correct",
            ErrorCategory::Internal => "Check the server logs for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;
