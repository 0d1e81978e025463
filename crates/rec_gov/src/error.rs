use reqwest::StatusCode;

/// Custom error type for Recreation.gov operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecGovError {
    /// No API key configured for a directory call that requires one
    #[error("API key required for search. Please set RECREATION_API_KEY.")]
    MissingApiKey,

    /// Availability API returned 404 for the campground
    #[error(
        "Campground not found (ID: {campground_id}). This campground may not exist or may not be available for online reservations."
    )]
    NotFound {
        /// The campground that was requested
        campground_id: String,
    },

    /// Availability API returned 500
    #[error("Recreation.gov server error. Please try again later.")]
    ServerError,

    /// Rate limited by the availability API
    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,

    /// Any other non-success status from the availability API
    #[error("Failed to fetch availability (HTTP {0})")]
    Http(u16),

    /// Directory API rejected the credential
    #[error("Authentication failed with Recreation.gov. Please check your API key.")]
    AuthenticationFailed,

    /// Any other non-success status from the directory API
    #[error("API Error: {status} - {body}")]
    Directory {
        /// HTTP status code
        status: u16,
        /// Response body returned by the directory
        body: String,
    },

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RecGovError {
    /// Classifies a non-success status from the month availability API.
    pub fn from_availability_status(status: StatusCode, campground_id: &str) -> Self {
        match status.as_u16() {
            404 => RecGovError::NotFound {
                campground_id: campground_id.to_string(),
            },
            500 => RecGovError::ServerError,
            429 => RecGovError::RateLimited,
            code => RecGovError::Http(code),
        }
    }

    /// Classifies a non-success status from the facility directory API.
    pub fn from_directory_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => RecGovError::AuthenticationFailed,
            code => RecGovError::Directory { status: code, body },
        }
    }

    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RecGovError::MissingApiKey => "missing_api_key",
            RecGovError::NotFound { .. } => "campground_not_found",
            RecGovError::ServerError => "upstream_server_error",
            RecGovError::RateLimited => "rate_limited",
            RecGovError::Http(_) => "upstream_error",
            RecGovError::AuthenticationFailed => "authentication_failed",
            RecGovError::Directory { .. } => "directory_error",
            RecGovError::Network(_) => "network_error",
            RecGovError::DataFormat(_) => "data_format_error",
            RecGovError::ConfigError(_) => "configuration_error",
        }
    }
}

impl From<reqwest::Error> for RecGovError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RecGovError::DataFormat(format!("Failed to parse response: {}", e))
        } else {
            RecGovError::Network(format!("HTTP request failed: {}", e))
        }
    }
}

impl actix_web::ResponseError for RecGovError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            RecGovError::NotFound { .. } => StatusCode::NOT_FOUND,
            RecGovError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            RecGovError::MissingApiKey | RecGovError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.code(),
            "message": self.to_string()
        }))
    }
}
