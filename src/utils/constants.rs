//! Constants Module - Single Source of Truth
//!
//! Every constant and default used across the application is defined here.
//! No hardcoded values in other modules.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "AmaniFoundation";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for outbound HTTP requests (gateway dashboard monitoring)
pub const USER_AGENT: &str = "AmaniFoundation/0.1";

// ============================================
// HTTP CONSTANTS
// ============================================

/// Default timeout for payment gateway requests (seconds)
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

/// Default TTL for cached content documents (seconds)
pub const DEFAULT_CONTENT_TTL_SECS: u64 = 300;

/// Interval between cache expiry sweeps (seconds)
pub const CACHE_SWEEP_INTERVAL_SECS: u64 = 60;

// ============================================
// LOAN PROGRAM CONSTANTS
// ============================================

/// Advertised annual interest rate for the microloan program (percent)
pub const DEFAULT_ANNUAL_RATE_PERCENT: f64 = 4.68;

/// Shortest term the program offers (months)
pub const MIN_TERM_MONTHS: u32 = 1;

/// Longest term the program offers (months)
pub const MAX_TERM_MONTHS: u32 = 360;

// ============================================
// IMPACT PROGRAM UNIT COSTS (currency units)
// ============================================

/// Cost to sponsor one student for a school term
pub const DEFAULT_STUDENT_UNIT_COST: f64 = 25.0;

/// Seed capital for one microloan recipient
pub const DEFAULT_MICROLOAN_UNIT_COST: f64 = 150.0;

/// Cost of one healthcare visit
pub const DEFAULT_HEALTHCARE_UNIT_COST: f64 = 40.0;

/// Contribution share for one community project
pub const DEFAULT_COMMUNITY_UNIT_COST: f64 = 500.0;

// ============================================
// DONATION CONSTANTS
// ============================================

/// Prefix for gateway payment references issued by this server
pub const PAYMENT_REFERENCE_PREFIX: &str = "AMN";

/// Smallest accepted donation (currency units)
pub const MIN_DONATION_AMOUNT: f64 = 1.0;

// ============================================
// CONTENT PAGES
// ============================================

/// Page slugs the content store serves
pub const CONTENT_PAGES: &[&str] = &["home", "about", "donate", "loans", "contact"];
