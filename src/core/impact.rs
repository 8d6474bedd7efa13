//! Donation Impact Module
//! Translates a donation amount into concrete program outcomes using the
//! foundation's per-unit cost table.
//!
//! Pure and deterministic: floor division per category, never negative.

use serde::{Deserialize, Serialize};

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{
    DEFAULT_COMMUNITY_UNIT_COST, DEFAULT_HEALTHCARE_UNIT_COST, DEFAULT_MICROLOAN_UNIT_COST,
    DEFAULT_STUDENT_UNIT_COST,
};

/// Per-unit costs for each program category (currency units)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactCostTable {
    /// Sponsoring one student for a school term
    pub student: f64,
    /// Seed capital for one microloan recipient
    pub microloan: f64,
    /// One healthcare visit
    pub healthcare: f64,
    /// Share of one community project
    pub community: f64,
}

impl Default for ImpactCostTable {
    fn default() -> Self {
        Self {
            student: DEFAULT_STUDENT_UNIT_COST,
            microloan: DEFAULT_MICROLOAN_UNIT_COST,
            healthcare: DEFAULT_HEALTHCARE_UNIT_COST,
            community: DEFAULT_COMMUNITY_UNIT_COST,
        }
    }
}

impl ImpactCostTable {
    /// Every unit cost must be strictly positive for floor division to
    /// make sense
    pub fn validate(&self) -> AppResult<()> {
        for (name, cost) in [
            ("student", self.student),
            ("microloan", self.microloan),
            ("healthcare", self.healthcare),
            ("community", self.community),
        ] {
            if !cost.is_finite() || cost <= 0.0 {
                return Err(AppError::new(
                    ErrorCode::ConfigInvalidValue,
                    format!("Unit cost for {} must be positive, got {}", name, cost),
                ));
            }
        }
        Ok(())
    }
}

/// Whole-unit outcomes a donation funds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    /// Students sponsored
    pub students: u64,
    /// Microloans seeded
    pub microloans: u64,
    /// Healthcare visits covered
    pub healthcare_visits: u64,
    /// Community projects supported
    pub community_projects: u64,
}

impl ImpactEstimate {
    /// True when the donation funds nothing whole in any category
    pub fn is_empty(&self) -> bool {
        self.students == 0
            && self.microloans == 0
            && self.healthcare_visits == 0
            && self.community_projects == 0
    }
}

/// Estimate how many whole units a donation funds in each category.
///
/// Counts are `floor(donation_amount / unit_cost)`: a donation below a
/// category's unit cost yields zero for that category.
pub fn estimate(donation_amount: f64, costs: &ImpactCostTable) -> AppResult<ImpactEstimate> {
    if !donation_amount.is_finite() || donation_amount < 0.0 {
        return Err(AppError::new(
            ErrorCode::ImpactInvalidAmount,
            format!("Donation amount must be non-negative, got {}", donation_amount),
        ));
    }
    costs.validate()?;

    Ok(ImpactEstimate {
        students: whole_units(donation_amount, costs.student),
        microloans: whole_units(donation_amount, costs.microloan),
        healthcare_visits: whole_units(donation_amount, costs.healthcare),
        community_projects: whole_units(donation_amount, costs.community),
    })
}

#[inline]
fn whole_units(amount: f64, unit_cost: f64) -> u64 {
    (amount / unit_cost).floor() as u64
}
