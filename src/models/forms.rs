//! Form Payload Types
//!
//! Typed payloads for the website's forms, each with its own validation.
//! Accepted submissions are wrapped in [`StoredSubmission`] before being
//! appended to the intake log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{MAX_TERM_MONTHS, MIN_TERM_MONTHS};

/// A form payload that can be validated and filed under a form name
pub trait FormPayload: Serialize + Send {
    /// Name of the intake log the submission is appended to
    const FORM_NAME: &'static str;

    /// First field error, if any
    fn validate(&self) -> AppResult<()>;
}

/// Message from the contact page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormPayload for ContactMessage {
    const FORM_NAME: &'static str = "contact";

    fn validate(&self) -> AppResult<()> {
        require_filled("name", &self.name)?;
        require_email(&self.email)?;
        require_filled("subject", &self.subject)?;
        require_filled("message", &self.message)?;
        Ok(())
    }
}

/// Signup from the volunteer section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerSignup {
    pub name: String,
    pub email: String,
    /// Program the volunteer wants to join ("education", "healthcare", ...)
    pub program: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

impl FormPayload for VolunteerSignup {
    const FORM_NAME: &'static str = "volunteer";

    fn validate(&self) -> AppResult<()> {
        require_filled("name", &self.name)?;
        require_email(&self.email)?;
        require_filled("program", &self.program)?;
        Ok(())
    }
}

/// Application from the microloan page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanApplication {
    pub name: String,
    pub email: String,
    /// Amount requested (currency units)
    pub amount: f64,
    /// Requested repayment term
    pub term_months: u32,
    /// What the loan funds, in the applicant's words
    pub purpose: String,
}

impl FormPayload for LoanApplication {
    const FORM_NAME: &'static str = "loan_application";

    fn validate(&self) -> AppResult<()> {
        require_filled("name", &self.name)?;
        require_email(&self.email)?;
        require_filled("purpose", &self.purpose)?;

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(AppError::invalid_field(format!(
                "Requested amount must be positive, got {}",
                self.amount
            )));
        }
        if !(MIN_TERM_MONTHS..=MAX_TERM_MONTHS).contains(&self.term_months) {
            return Err(AppError::invalid_field(format!(
                "Requested term must be between {} and {} months, got {}",
                MIN_TERM_MONTHS, MAX_TERM_MONTHS, self.term_months
            )));
        }
        Ok(())
    }
}

/// A validated submission as written to the intake log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSubmission<T> {
    pub id: Uuid,
    pub form: String,
    pub received_at: DateTime<Utc>,
    pub payload: T,
}

impl<T: FormPayload> StoredSubmission<T> {
    pub fn new(payload: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            form: T::FORM_NAME.to_string(),
            received_at: Utc::now(),
            payload,
        }
    }
}

// ============================================
// Field helpers
// ============================================

fn require_filled(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_field(format!("Field '{}' is required", field)));
    }
    Ok(())
}

fn require_email(value: &str) -> AppResult<()> {
    let trimmed = value.trim();
    let looks_like_email = trimmed
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);

    if !looks_like_email {
        return Err(AppError::invalid_field(format!("Invalid email address: {}", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    fn contact_fixture() -> ContactMessage {
        ContactMessage {
            name: "Asha Mwangi".to_string(),
            email: "asha@example.com".to_string(),
            subject: "Partnership".to_string(),
            message: "We would like to partner on the school program.".to_string(),
        }
    }

    #[test]
    fn test_valid_contact_message() {
        assert!(contact_fixture().validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut msg = contact_fixture();
        msg.name = "   ".to_string();
        let err = msg.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::FormInvalidField);
        assert!(err.message.contains("name"));
    }

    #[test]
    fn test_bad_email_rejected() {
        for bad in ["plainaddress", "@no-local.org", "user@nodot"] {
            let mut msg = contact_fixture();
            msg.email = bad.to_string();
            assert!(msg.validate().is_err(), "should reject {}", bad);
        }
    }

    #[test]
    fn test_loan_application_amount_bounds() {
        let app = LoanApplication {
            name: "Juma O.".to_string(),
            email: "juma@example.com".to_string(),
            amount: 0.0,
            term_months: 12,
            purpose: "Sewing machine".to_string(),
        };
        let err = app.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::FormInvalidField);
    }

    #[test]
    fn test_loan_application_term_bounds() {
        let app = LoanApplication {
            name: "Juma O.".to_string(),
            email: "juma@example.com".to_string(),
            amount: 500.0,
            term_months: 0,
            purpose: "Sewing machine".to_string(),
        };
        assert!(app.validate().is_err());
    }

    #[test]
    fn test_stored_submission_carries_form_name() {
        let stored = StoredSubmission::new(contact_fixture());
        assert_eq!(stored.form, "contact");

        let line = serde_json::to_string(&stored).unwrap();
        assert!(line.contains("\"form\":\"contact\""));
        assert!(line.contains("Asha"));
    }
}
