//! Utils Module - Shared Utilities
//!
//! The TTL cache and the application-wide constants.

pub mod cache;
pub mod constants;

pub use cache::*;
pub use constants::*;
