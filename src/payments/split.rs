//! Split payment shares

use std::hash::Hash;

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use thiserror::Error;

/// Ways a split request can be malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SplitError {
    /// A split needs at least two payers.
    #[error("split payment needs at least two shares")]
    TooFewShares,

    /// Each payer pays exactly once.
    #[error("payer appears more than once")]
    DuplicatePayer,

    /// Shares must be positive.
    #[error("share amount must be greater than zero")]
    NonPositiveShare,

    /// Shares may not add up to more than the order total.
    #[error("shares exceed the order total")]
    ExceedsTotal,
}

/// One payer's portion of a split order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Share<K> {
    /// Who pays.
    pub payer: K,

    /// How much.
    pub amount: Decimal,
}

/// Check split shares against the order total.
///
/// # Errors
///
/// Returns the first [`SplitError`] found.
pub fn validate_shares<K: Eq + Hash>(
    shares: &[Share<K>],
    total: Decimal,
) -> Result<(), SplitError> {
    if shares.len() < 2 {
        return Err(SplitError::TooFewShares);
    }

    let mut payers = FxHashSet::default();

    for share in shares {
        if share.amount <= Decimal::ZERO {
            return Err(SplitError::NonPositiveShare);
        }

        if !payers.insert(&share.payer) {
            return Err(SplitError::DuplicatePayer);
        }
    }

    let sum: Decimal = shares.iter().map(|share| share.amount).sum();

    if sum > total {
        return Err(SplitError::ExceedsTotal);
    }

    Ok(())
}
