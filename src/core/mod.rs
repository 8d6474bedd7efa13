//! Core Module - Program Calculators
//!
//! The pure computations behind the website's widgets: loan amortization
//! and donation impact. No I/O lives here.

pub mod amortization;
pub mod impact;

pub use amortization::*;
pub use impact::*;
