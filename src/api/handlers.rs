//! API Request Handlers

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::types::*;
use crate::config::AppConfig;
use crate::core::{amortization, impact};
use crate::models::content::{
    AboutContent, ContactContent, ContentShape, DonateContent, HomeContent, LoansContent,
};
use crate::models::errors::{AppError, AppResult};
use crate::models::forms::{
    ContactMessage, FormPayload, LoanApplication, StoredSubmission, VolunteerSignup,
};
use crate::providers::gateway::{
    new_payment_reference, HttpGateway, InitializePaymentParams, PaymentGateway,
};
use crate::store::ContentStore;
use crate::telemetry::{EventKind, TelemetryCollector, TelemetryEvent};
use crate::utils::constants::{CONTENT_PAGES, MIN_DONATION_AMOUNT};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<ContentStore>,
    /// None when no gateway secret is configured; donation routes then 503
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    pub telemetry: Arc<TelemetryCollector>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, telemetry: Arc<TelemetryCollector>) -> AppResult<Self> {
        let store = Arc::new(ContentStore::new(
            config.content_dir.clone(),
            config.content_ttl_secs,
        )?);

        std::fs::create_dir_all(&config.submissions_dir).map_err(|e| {
            AppError::form_store_failed(format!(
                "Cannot create submissions directory {}: {}",
                config.submissions_dir.display(),
                e
            ))
        })?;

        let gateway: Option<Arc<dyn PaymentGateway>> = match &config.gateway_secret_key {
            Some(secret) => Some(Arc::new(HttpGateway::with_timeout(
                config.gateway_base_url.clone(),
                secret.clone(),
                config.gateway_timeout,
            )?)),
            None => None,
        };

        // Background task: drop expired content cache entries
        let store_clone = store.clone();
        let sweep_secs = config.cache_sweep_interval_secs;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(sweep_secs.max(1)));
            loop {
                interval.tick().await;
                store_clone.sweep_cache();
            }
        });

        Ok(Self {
            config,
            store,
            gateway,
            telemetry,
            start_time: Instant::now(),
        })
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Append a validated submission to its intake log
    fn record_submission<T: FormPayload>(&self, stored: &StoredSubmission<T>) -> AppResult<()> {
        let path = self
            .config
            .submissions_dir
            .join(format!("{}.jsonl", T::FORM_NAME));

        let line = serde_json::to_string(stored)
            .map_err(|e| AppError::form_store_failed(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| AppError::form_store_failed(format!("Cannot open {}: {}", path.display(), e)))?;
        writeln!(file, "{}", line)
            .map_err(|e| AppError::form_store_failed(e.to_string()))?;

        Ok(())
    }
}

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

/// Map an AppError onto the response envelope and its HTTP status
fn fail(err: AppError, start: Instant) -> HandlerError {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ApiResponse::error(
            ApiError::from(&err),
            start.elapsed().as_secs_f64() * 1000.0,
        )),
    )
}

fn latency_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, latency_ms(start)))
}

// ============================================
// Content
// ============================================

fn known_page(page: &str) -> bool {
    CONTENT_PAGES.contains(&page)
}

pub async fn get_content(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> Result<Json<ApiResponse<Value>>, HandlerError> {
    let start = Instant::now();

    if !known_page(&page) {
        return Err(fail(AppError::content_not_found(&page), start));
    }

    let document = state.store.load_raw(&page).map_err(|e| fail(e, start))?;
    Ok(Json(ApiResponse::success(document, latency_ms(start))))
}

pub async fn update_content(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse<ContentEditData>>, HandlerError> {
    let start = Instant::now();

    apply_typed_update(&state.store, &page, body).map_err(|e| fail(e, start))?;

    state.telemetry.record_kind(
        EventKind::ContentEdit,
        start.elapsed().as_millis() as u64,
        page.clone(),
    );

    let data = ContentEditData {
        page: page.clone(),
        message: format!("Content for '{}' updated", page),
    };
    Ok(Json(ApiResponse::success(data, latency_ms(start))))
}

/// Dispatch a raw update body to the page's typed update operation
fn apply_typed_update(store: &ContentStore, page: &str, body: Value) -> AppResult<()> {
    fn parse_and_apply<T: ContentShape>(store: &ContentStore, body: Value) -> AppResult<()> {
        let update: T::Update = serde_json::from_value(body).map_err(|e| {
            AppError::update_rejected(format!("Not a valid update for this page: {}", e))
        })?;
        store.update::<T>(update)?;
        Ok(())
    }

    match page {
        "home" => parse_and_apply::<HomeContent>(store, body),
        "about" => parse_and_apply::<AboutContent>(store, body),
        "donate" => parse_and_apply::<DonateContent>(store, body),
        "loans" => parse_and_apply::<LoansContent>(store, body),
        "contact" => parse_and_apply::<ContactContent>(store, body),
        _ => Err(AppError::content_not_found(page)),
    }
}

// ============================================
// Loan Quotes
// ============================================

pub async fn loan_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoanQuoteRequest>,
) -> Result<Json<ApiResponse<LoanQuoteData>>, HandlerError> {
    let start = Instant::now();

    let rate = req
        .annual_rate_percent
        .unwrap_or(state.config.annual_rate_percent);

    let quote =
        amortization::quote(req.principal, req.term_months, rate).map_err(|e| fail(e, start))?;

    state.telemetry.record_kind(
        EventKind::LoanQuote,
        start.elapsed().as_millis() as u64,
        format!("term {} months", quote.term_months),
    );

    Ok(Json(ApiResponse::success(quote.into(), latency_ms(start))))
}

// ============================================
// Impact Estimates
// ============================================

pub async fn impact_estimate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImpactEstimateRequest>,
) -> Result<Json<ApiResponse<ImpactEstimateData>>, HandlerError> {
    let start = Instant::now();

    let costs = req.costs.unwrap_or_else(|| state.config.impact_costs.clone());
    let estimate = impact::estimate(req.donation_amount, &costs).map_err(|e| fail(e, start))?;

    state.telemetry.record_kind(
        EventKind::ImpactEstimate,
        start.elapsed().as_millis() as u64,
        String::new(),
    );

    let data = ImpactEstimateData {
        donation_amount: req.donation_amount,
        costs,
        impact: estimate,
    };
    Ok(Json(ApiResponse::success(data, latency_ms(start))))
}

// ============================================
// Forms
// ============================================

async fn handle_submission<T>(
    state: Arc<AppState>,
    payload: T,
    ack_message: &str,
) -> Result<Json<ApiResponse<SubmissionAck>>, HandlerError>
where
    T: FormPayload + DeserializeOwned,
{
    let start = Instant::now();

    payload.validate().map_err(|e| fail(e, start))?;

    let stored = StoredSubmission::new(payload);
    state.record_submission(&stored).map_err(|e| {
        error!("Failed to record {} submission: {}", T::FORM_NAME, e);
        fail(e, start)
    })?;

    state.telemetry.record_kind(
        EventKind::FormSubmission,
        start.elapsed().as_millis() as u64,
        T::FORM_NAME.to_string(),
    );
    info!("{} submission accepted: {}", T::FORM_NAME, stored.id);

    let ack = SubmissionAck {
        id: stored.id,
        message: ack_message.to_string(),
    };
    Ok(Json(ApiResponse::success(ack, latency_ms(start))))
}

pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ContactMessage>,
) -> Result<Json<ApiResponse<SubmissionAck>>, HandlerError> {
    handle_submission(state, payload, "Thank you for reaching out. We reply within two working days.").await
}

pub async fn submit_volunteer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VolunteerSignup>,
) -> Result<Json<ApiResponse<SubmissionAck>>, HandlerError> {
    handle_submission(state, payload, "Thank you for volunteering. Our program team will be in touch.").await
}

pub async fn apply_loan(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoanApplication>,
) -> Result<Json<ApiResponse<SubmissionAck>>, HandlerError> {
    handle_submission(state, payload, "Application received. Review takes up to ten working days.").await
}

// ============================================
// Donations
// ============================================

pub async fn initialize_donation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InitializeDonationRequest>,
) -> Result<Json<ApiResponse<DonationInitData>>, HandlerError> {
    let start = Instant::now();

    let Some(gateway) = state.gateway.clone() else {
        return Err(fail(AppError::missing_gateway_key(), start));
    };

    if !req.email.contains('@') {
        return Err(fail(
            AppError::bad_request("A valid donor email is required"),
            start,
        ));
    }
    if !req.amount.is_finite() || req.amount < MIN_DONATION_AMOUNT {
        return Err(fail(
            AppError::bad_request(format!(
                "Donation amount must be at least {}",
                MIN_DONATION_AMOUNT
            )),
            start,
        ));
    }

    let reference = new_payment_reference();
    let params = InitializePaymentParams {
        email: req.email,
        amount: req.amount,
        reference: reference.clone(),
        callback_url: state.config.donation_callback_url.clone(),
    };

    let init = gateway.initialize_payment(params).await.map_err(|e| {
        error!("Donation initialize failed for {}: {}", reference, e);
        fail(e, start)
    })?;

    state.telemetry.record(TelemetryEvent::new(
        EventKind::DonationInitialized,
        req.amount,
        start.elapsed().as_millis() as u64,
        init.reference.clone(),
    ));
    info!("Donation initialized: {} ({})", init.reference, req.amount);

    Ok(Json(ApiResponse::success(init.into(), latency_ms(start))))
}

pub async fn verify_donation(
    State(state): State<Arc<AppState>>,
    Path(reference): Path<String>,
) -> Result<Json<ApiResponse<DonationVerifyData>>, HandlerError> {
    let start = Instant::now();

    let Some(gateway) = state.gateway.clone() else {
        return Err(fail(AppError::missing_gateway_key(), start));
    };

    let verification = gateway
        .verify_payment(&reference)
        .await
        .map_err(|e| fail(e, start))?;

    if verification.status.is_success() {
        state.telemetry.record(TelemetryEvent::new(
            EventKind::DonationVerified,
            verification.amount,
            start.elapsed().as_millis() as u64,
            reference.clone(),
        ));
        info!("Donation verified: {} ({})", reference, verification.amount);
    }

    Ok(Json(ApiResponse::success(
        verification.into(),
        latency_ms(start),
    )))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();
    let stats = state.telemetry.get_stats();
    let cache_stats = state.store.cache_stats();

    let data = StatsData {
        donations_initialized: stats.donations_initialized,
        donations_verified: stats.donations_verified,
        total_raised: stats.total_raised,
        forms_received: stats.forms_received,
        quotes_served: stats.quotes_served,
        content_edits: stats.content_edits,
        avg_latency_ms: stats.avg_latency_ms,
        cache_entries: cache_stats.entries,
        cache_hit_rate: cache_stats.hit_rate,
        uptime_seconds: state.uptime_seconds(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(data, latency_ms(start)))
}
