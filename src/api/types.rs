//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::core::amortization::{round_to_cents, LoanQuote};
use crate::core::impact::{ImpactCostTable, ImpactEstimate};
use crate::models::errors::AppError;
use crate::providers::gateway::{PaymentInit, PaymentVerification};

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "API_BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            code: "API_UNAUTHORIZED".to_string(),
            message: "Invalid or missing admin key".to_string(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "API_NOT_FOUND".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "API_INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: err.source.as_ref().map(|source| source.to_string()),
        }
    }
}

// ============================================
// Loan Quotes
// ============================================

#[derive(Debug, Deserialize)]
pub struct LoanQuoteRequest {
    pub principal: f64,
    pub term_months: u32,
    /// Omitted = the program's configured rate
    pub annual_rate_percent: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct LoanQuoteData {
    pub principal: f64,
    pub term_months: u32,
    pub annual_rate_percent: f64,
    /// Rounded to cents for display
    pub monthly_payment: f64,
    /// Rounded to cents for display
    pub total_repayment: f64,
    pub total_interest: f64,
}

impl From<LoanQuote> for LoanQuoteData {
    fn from(quote: LoanQuote) -> Self {
        Self {
            principal: quote.principal,
            term_months: quote.term_months,
            annual_rate_percent: quote.annual_rate_percent,
            monthly_payment: round_to_cents(quote.monthly_payment),
            total_repayment: round_to_cents(quote.total_repayment),
            total_interest: round_to_cents(quote.total_interest()),
        }
    }
}

// ============================================
// Impact Estimates
// ============================================

#[derive(Debug, Deserialize)]
pub struct ImpactEstimateRequest {
    pub donation_amount: f64,
    /// Omitted = the configured cost table
    pub costs: Option<ImpactCostTable>,
}

#[derive(Debug, Serialize)]
pub struct ImpactEstimateData {
    pub donation_amount: f64,
    pub costs: ImpactCostTable,
    pub impact: ImpactEstimate,
}

// ============================================
// Donations
// ============================================

#[derive(Debug, Deserialize)]
pub struct InitializeDonationRequest {
    pub email: String,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct DonationInitData {
    pub status: String,
    pub reference: String,
    pub checkout_url: String,
}

impl From<PaymentInit> for DonationInitData {
    fn from(init: PaymentInit) -> Self {
        Self {
            status: format!("{:?}", init.status).to_lowercase(),
            reference: init.reference,
            checkout_url: init.checkout_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DonationVerifyData {
    pub reference: String,
    pub status: String,
    pub verified: bool,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl From<PaymentVerification> for DonationVerifyData {
    fn from(verification: PaymentVerification) -> Self {
        Self {
            reference: verification.reference,
            status: format!("{:?}", verification.status).to_lowercase(),
            verified: verification.status.is_success(),
            amount: verification.amount,
            paid_at: verification.paid_at,
            channel: verification.channel,
        }
    }
}

// ============================================
// Forms
// ============================================

/// `{success, message}` shape the website's forms expect
#[derive(Debug, Serialize)]
pub struct SubmissionAck {
    pub id: uuid::Uuid,
    pub message: String,
}

// ============================================
// Content
// ============================================

#[derive(Debug, Serialize)]
pub struct ContentEditData {
    pub page: String,
    pub message: String,
}

// ============================================
// Stats / Health
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub donations_initialized: u64,
    pub donations_verified: u64,
    pub total_raised: f64,
    pub forms_received: u64,
    pub quotes_served: u64,
    pub content_edits: u64,
    pub avg_latency_ms: f64,
    pub cache_entries: usize,
    pub cache_hit_rate: f64,
    pub uptime_seconds: u64,
    pub api_version: String,
}

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
