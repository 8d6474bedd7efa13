//! Providers Module - External Services
//!
//! Outbound clients: the payment gateway today, future integrations later.

pub mod gateway;

pub use gateway::*;
