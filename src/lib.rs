//! Amani Foundation API Library
//!
//! Backend for the foundation's website:
//! - Content documents for every rendered page, with typed CMS updates
//! - Donation checkout via the payment gateway
//! - Loan amortization quotes for the microloan program
//! - Donation impact estimates
//! - Form intake (contact, volunteer, loan applications)

pub mod api;
pub mod config;
pub mod core;
pub mod models;
pub mod providers;
pub mod store;
pub mod telemetry;
pub mod utils;

pub use config::AppConfig;
pub use crate::core::amortization::{quote, LoanQuote};
pub use crate::core::impact::{estimate, ImpactCostTable, ImpactEstimate};
pub use models::content::{
    AboutContent, ContactContent, ContentShape, DonateContent, HomeContent, LoansContent,
};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::forms::{ContactMessage, LoanApplication, StoredSubmission, VolunteerSignup};
pub use providers::gateway::{
    HttpGateway, InitializePaymentParams, PaymentGateway, PaymentInit, PaymentStatus,
    PaymentVerification,
};
pub use store::ContentStore;
pub use telemetry::{EventKind, TelemetryCollector, TelemetryEvent, TelemetryStats};
pub use utils::cache::{CacheStats, TtlCache};
