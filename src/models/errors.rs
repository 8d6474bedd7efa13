//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so production logs can be
//! grepped by category.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - CONTENT_xxx: content store errors
//! - GATEWAY_xxx: payment gateway errors
//! - FORM_xxx: form intake errors
//! - LOAN_xxx: loan quote errors
//! - API_xxx: API errors
//! - CFG_xxx: configuration errors

use std::fmt;

/// Application-wide error type; all failures flow through this
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Content Store Errors
    // ============================================
    /// Requested page has no content document
    ContentNotFound,
    /// Content document failed to parse
    ContentMalformed,
    /// Typed update rejected (bad target, out-of-range index)
    ContentUpdateRejected,
    /// Content document could not be persisted
    ContentWriteFailed,

    // ============================================
    // Payment Gateway Errors
    // ============================================
    /// Gateway connection failed
    GatewayConnectionFailed,
    /// Gateway request timeout
    GatewayTimeout,
    /// Gateway returned an error response
    GatewayError,
    /// Gateway response did not match the expected shape
    GatewayInvalidResponse,
    /// Payment reference unknown to the gateway
    GatewayUnknownReference,
    /// Gateway declined the transaction
    GatewayDeclined,

    // ============================================
    // Form Intake Errors
    // ============================================
    /// Submitted payload failed validation
    FormInvalidField,
    /// Submission could not be recorded
    FormStoreFailed,

    // ============================================
    // Loan Quote Errors
    // ============================================
    /// Principal must be positive and finite
    LoanInvalidPrincipal,
    /// Term must be within the program's bounds
    LoanInvalidTerm,
    /// Rate must be non-negative and finite
    LoanInvalidRate,
    /// Donation amount for an impact estimate is invalid
    ImpactInvalidAmount,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Unauthorized (invalid admin key)
    ApiUnauthorized,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,
    /// Resource not found
    ApiNotFound,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Missing environment variable
    ConfigMissingEnv,
    /// Invalid configuration value
    ConfigInvalidValue,
    /// Gateway secret key not configured
    ConfigMissingGatewayKey,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Content Store Errors
            Self::ContentNotFound => "CONTENT_NOT_FOUND",
            Self::ContentMalformed => "CONTENT_MALFORMED",
            Self::ContentUpdateRejected => "CONTENT_UPDATE_REJECTED",
            Self::ContentWriteFailed => "CONTENT_WRITE_FAILED",

            // Payment Gateway Errors
            Self::GatewayConnectionFailed => "GATEWAY_CONNECTION_FAILED",
            Self::GatewayTimeout => "GATEWAY_TIMEOUT",
            Self::GatewayError => "GATEWAY_ERROR",
            Self::GatewayInvalidResponse => "GATEWAY_INVALID_RESPONSE",
            Self::GatewayUnknownReference => "GATEWAY_UNKNOWN_REFERENCE",
            Self::GatewayDeclined => "GATEWAY_DECLINED",

            // Form Intake Errors
            Self::FormInvalidField => "FORM_INVALID_FIELD",
            Self::FormStoreFailed => "FORM_STORE_FAILED",

            // Loan Quote Errors
            Self::LoanInvalidPrincipal => "LOAN_INVALID_PRINCIPAL",
            Self::LoanInvalidTerm => "LOAN_INVALID_TERM",
            Self::LoanInvalidRate => "LOAN_INVALID_RATE",
            Self::ImpactInvalidAmount => "IMPACT_INVALID_AMOUNT",

            // API Errors
            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiUnauthorized => "API_UNAUTHORIZED",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",
            Self::ApiNotFound => "API_NOT_FOUND",

            // Configuration Errors
            Self::ConfigMissingEnv => "CFG_MISSING_ENV",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::ConfigMissingGatewayKey => "CFG_MISSING_GATEWAY_KEY",

            // Generic
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest
            | Self::ContentUpdateRejected
            | Self::FormInvalidField
            | Self::LoanInvalidPrincipal
            | Self::LoanInvalidTerm
            | Self::LoanInvalidRate
            | Self::ImpactInvalidAmount
            | Self::ConfigInvalidValue => 400,
            Self::ApiUnauthorized => 401,
            Self::GatewayDeclined => 402,
            Self::ApiNotFound | Self::ContentNotFound | Self::GatewayUnknownReference => 404,
            Self::ApiRateLimited => 429,
            Self::GatewayTimeout | Self::GatewayConnectionFailed => 502,
            Self::ConfigMissingGatewayKey => 503,
            _ => 500,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::GatewayTimeout
                | Self::GatewayConnectionFailed
                | Self::GatewayError
                | Self::ApiRateLimited
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Requested page has no content document
    pub fn content_not_found(page: &str) -> Self {
        Self::new(
            ErrorCode::ContentNotFound,
            format!("No content document for page: {}", page),
        )
    }

    /// Content document failed to parse
    pub fn content_malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ContentMalformed, msg)
    }

    /// Typed update rejected
    pub fn update_rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ContentUpdateRejected, msg)
    }

    /// Content persistence failed
    pub fn content_write_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ContentWriteFailed, msg)
    }

    /// Gateway connection failed
    pub fn gateway_connection_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::GatewayConnectionFailed, msg)
    }

    /// Gateway timeout
    pub fn gateway_timeout() -> Self {
        Self::new(ErrorCode::GatewayTimeout, "Payment gateway request timed out")
    }

    /// Gateway error response
    pub fn gateway_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::GatewayError, msg)
    }

    /// Gateway response shape mismatch
    pub fn gateway_invalid_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::GatewayInvalidResponse, msg)
    }

    /// Unknown payment reference
    pub fn unknown_reference(reference: &str) -> Self {
        Self::new(
            ErrorCode::GatewayUnknownReference,
            format!("Unknown payment reference: {}", reference),
        )
    }

    /// Form field validation failure
    pub fn invalid_field(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FormInvalidField, msg)
    }

    /// Submission persistence failure
    pub fn form_store_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FormStoreFailed, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }

    /// Gateway secret key not configured
    pub fn missing_gateway_key() -> Self {
        Self::new(
            ErrorCode::ConfigMissingGatewayKey,
            "Payment gateway secret key not configured; donation routes disabled",
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::GatewayTimeout, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::GatewayConnectionFailed, "Connection failed")
        } else {
            Self::new(ErrorCode::GatewayError, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::ContentMalformed, "JSON parse error", err)
    }
}
