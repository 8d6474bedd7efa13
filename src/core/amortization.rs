//! Loan Amortization Module
//! Computes the fixed monthly installment for the foundation's microloan
//! program from principal, term and annual rate.
//!
//! Pure and deterministic: no I/O, output depends only on inputs.

use serde::{Deserialize, Serialize};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{MAX_TERM_MONTHS, MIN_TERM_MONTHS};

/// A computed loan quote
///
/// `monthly_payment * term_months` equals `total_repayment` up to f64
/// rounding; both are raw values, display rounding happens at the API edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanQuote {
    /// Amount borrowed (currency units)
    pub principal: f64,
    /// Number of monthly installments
    pub term_months: u32,
    /// Annual interest rate in percent (4.68 = 4.68%)
    pub annual_rate_percent: f64,
    /// Fixed monthly installment
    pub monthly_payment: f64,
    /// Total paid over the life of the loan
    pub total_repayment: f64,
}

impl LoanQuote {
    /// Total interest paid over the life of the loan
    pub fn total_interest(&self) -> f64 {
        self.total_repayment - self.principal
    }
}

/// Compute a quote for a standard amortizing loan.
///
/// A zero rate has no closed-form installment (the formula divides by
/// zero), so it falls back to straight-line repayment: equal principal
/// slices with no interest. Interest-free terms are a real configuration
/// for the hardship track of the microloan program.
pub fn quote(principal: f64, term_months: u32, annual_rate_percent: f64) -> AppResult<LoanQuote> {
    validate_inputs(principal, term_months, annual_rate_percent)?;

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;

    let monthly_payment = if monthly_rate == 0.0 {
        principal / term_months as f64
    } else {
        let growth = (1.0 + monthly_rate).powi(term_months as i32);
        principal * monthly_rate * growth / (growth - 1.0)
    };

    let total_repayment = monthly_payment * term_months as f64;

    Ok(LoanQuote {
        principal,
        term_months,
        annual_rate_percent,
        monthly_payment,
        total_repayment,
    })
}

fn validate_inputs(principal: f64, term_months: u32, annual_rate_percent: f64) -> AppResult<()> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(AppError::new(
            ErrorCode::LoanInvalidPrincipal,
            format!("Principal must be a positive amount, got {}", principal),
        ));
    }

    if !(MIN_TERM_MONTHS..=MAX_TERM_MONTHS).contains(&term_months) {
        return Err(AppError::new(
            ErrorCode::LoanInvalidTerm,
            format!(
                "Term must be between {} and {} months, got {}",
                MIN_TERM_MONTHS, MAX_TERM_MONTHS, term_months
            ),
        ));
    }

    if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
        return Err(AppError::new(
            ErrorCode::LoanInvalidRate,
            format!("Annual rate must be non-negative, got {}", annual_rate_percent),
        ));
    }

    Ok(())
}

/// Round a currency amount to cents for display
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
