//! Creditworthiness scoring.
//!
//! The score must be reproducible bit-for-bit from the stored profile at any
//! later read, so it is a pure function of the document with the policy
//! constants fixed next to it. Reads recompute it every time; nothing caches
//! the result.

use crate::models::profile::FinancialProfile;

pub const SCORE_BASELINE: u32 = 650;

pub const SCORE_PAID_INCREMENT: u32 = 5;

pub const SCORE_CEILING: u32 = 850;

/// Derives the bounded credit score for a profile: baseline plus a fixed
/// increment per repaid loan, clamped to the ceiling. An absent or empty loan
/// history yields the baseline unchanged.
#[must_use]
pub fn credit_score(profile: &FinancialProfile) -> u32 {
    let paid = profile
        .loan_history
        .iter()
        .flatten()
        .filter(|record| record.is_paid())
        .count();

    let paid = u32::try_from(paid).unwrap_or(u32::MAX);

    SCORE_BASELINE
        .saturating_add(SCORE_PAID_INCREMENT.saturating_mul(paid))
        .min(SCORE_CEILING)
}
