//! Payment Gateway Client
//!
//! REST client for the card-checkout provider behind the donate page.
//! Two calls matter: initialize a checkout session and verify a completed
//! payment by reference.
//!
//! The provider speaks a Paystack-style API:
//! - `POST /transaction/initialize` -> `{status, message, data: {authorization_url, reference}}`
//! - `GET  /transaction/verify/{reference}` -> `{status, message, data: {status, amount, ...}}`
//!
//! Amounts cross the wire in subunits (cents). References are issued by
//! this server (`AMN-<uuid>`) so verification is always keyed to something
//! the foundation created.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_GATEWAY_TIMEOUT_SECS, PAYMENT_REFERENCE_PREFIX, USER_AGENT,
};

/// Parameters for opening a checkout session
#[derive(Debug, Clone, Serialize)]
pub struct InitializePaymentParams {
    /// Donor email the gateway sends the receipt to
    pub email: String,
    /// Donation amount in currency units
    pub amount: f64,
    /// Server-issued payment reference
    pub reference: String,
    /// Where the gateway redirects after checkout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// A newly opened checkout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInit {
    pub status: PaymentStatus,
    pub reference: String,
    /// URL the donor is sent to for card entry
    pub checkout_url: String,
}

/// Result of verifying a payment by reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub reference: String,
    pub status: PaymentStatus,
    /// Amount actually charged, in currency units
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// Gateway-side lifecycle of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Abandoned,
}

impl PaymentStatus {
    /// Map the gateway's status string
    pub fn from_gateway(value: &str) -> Self {
        match value {
            "success" => Self::Success,
            "failed" => Self::Failed,
            "abandoned" => Self::Abandoned,
            _ => Self::Pending,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Seam between handlers and the payment provider
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initialize_payment(&self, params: InitializePaymentParams) -> AppResult<PaymentInit>;
    async fn verify_payment(&self, reference: &str) -> AppResult<PaymentVerification>;
}

/// Issue a fresh payment reference
pub fn new_payment_reference() -> String {
    format!("{}-{}", PAYMENT_REFERENCE_PREFIX, Uuid::new_v4().simple())
}

// ============================================
// Wire shapes
// ============================================

#[derive(Debug, Deserialize)]
struct GatewayEnvelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct InitializeData {
    authorization_url: String,
    reference: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    status: String,
    /// Subunits (cents)
    amount: u64,
    paid_at: Option<String>,
    channel: Option<String>,
}

#[derive(Debug, Serialize)]
struct InitializeRequest<'a> {
    email: &'a str,
    /// Subunits (cents)
    amount: u64,
    reference: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
}

// ============================================
// HTTP implementation
// ============================================

/// reqwest-backed gateway client
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> AppResult<Self> {
        Self::with_timeout(base_url, secret_key, Duration::from_secs(DEFAULT_GATEWAY_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::gateway_connection_failed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }

    fn subunits(amount: f64) -> u64 {
        (amount * 100.0).round() as u64
    }
}

#[async_trait]
impl PaymentGateway for HttpGateway {
    async fn initialize_payment(&self, params: InitializePaymentParams) -> AppResult<PaymentInit> {
        let url = format!("{}/transaction/initialize", self.base_url);
        let body = InitializeRequest {
            email: &params.email,
            amount: Self::subunits(params.amount),
            reference: &params.reference,
            callback_url: params.callback_url.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await?;

        let http_status = response.status();
        if !http_status.is_success() {
            warn!("Gateway initialize returned HTTP {}", http_status);
            return Err(AppError::gateway_error(format!(
                "Initialize failed with HTTP {}",
                http_status
            )));
        }

        let envelope: GatewayEnvelope<InitializeData> = response
            .json()
            .await
            .map_err(|e| AppError::gateway_invalid_response(e.to_string()))?;

        if !envelope.status {
            return Err(AppError::gateway_error(envelope.message));
        }
        let data = envelope
            .data
            .ok_or_else(|| AppError::gateway_invalid_response("Initialize response missing data"))?;

        info!("Checkout session opened: {}", data.reference);
        Ok(PaymentInit {
            status: PaymentStatus::Pending,
            reference: data.reference,
            checkout_url: data.authorization_url,
        })
    }

    async fn verify_payment(&self, reference: &str) -> AppResult<PaymentVerification> {
        let url = format!("{}/transaction/verify/{}", self.base_url, reference);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let http_status = response.status();
        if http_status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::unknown_reference(reference));
        }
        if !http_status.is_success() {
            warn!("Gateway verify returned HTTP {}", http_status);
            return Err(AppError::gateway_error(format!(
                "Verify failed with HTTP {}",
                http_status
            )));
        }

        let envelope: GatewayEnvelope<VerifyData> = response
            .json()
            .await
            .map_err(|e| AppError::gateway_invalid_response(e.to_string()))?;

        if !envelope.status {
            return Err(AppError::gateway_error(envelope.message));
        }
        let data = envelope
            .data
            .ok_or_else(|| AppError::gateway_invalid_response("Verify response missing data"))?;

        let paid_at = data
            .paid_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(PaymentVerification {
            reference: reference.to_string(),
            status: PaymentStatus::from_gateway(&data.status),
            amount: data.amount as f64 / 100.0,
            paid_at,
            channel: data.channel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        let reference = new_payment_reference();
        assert!(reference.starts_with("AMN-"));
        // prefix + dash + 32 hex chars
        assert_eq!(reference.len(), 4 + 32);

        // Each reference is unique
        assert_ne!(reference, new_payment_reference());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(PaymentStatus::from_gateway("success"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_gateway("failed"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from_gateway("abandoned"), PaymentStatus::Abandoned);
        assert_eq!(PaymentStatus::from_gateway("ongoing"), PaymentStatus::Pending);
        assert!(PaymentStatus::Success.is_success());
        assert!(!PaymentStatus::Pending.is_success());
    }

    #[test]
    fn test_subunit_conversion() {
        assert_eq!(HttpGateway::subunits(50.0), 5000);
        assert_eq!(HttpGateway::subunits(19.99), 1999);
        assert_eq!(HttpGateway::subunits(123.45), 12345); // rounds, never truncates
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let gateway = HttpGateway::new("https://api.example.com/", "sk_test_x").unwrap();
        assert_eq!(gateway.base_url, "https://api.example.com");
    }
}
