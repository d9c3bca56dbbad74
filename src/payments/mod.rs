//! Payments
//!
//! An order is paid through one payment record (regular) or one per participating payer
//! (split). Each record follows its own small lifecycle driven by the payment gateway; the
//! order's `payment_status` is never set directly but derived from the set of records by
//! [`aggregate`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::values::UnknownValueError;

pub mod split;

/// Status of one payment record, and of the order aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Waiting for the payer.
    Pending,

    /// Partly paid.
    Partial,

    /// Fully paid.
    Paid,

    /// The payment window closed without payment.
    Expired,

    /// The gateway reported a failure, or the order was cancelled before payment.
    Failed,

    /// Money returned after cancellation.
    Refunded,
}

/// A payment record cannot move between these statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move payment from {from} to {to}")]
pub struct PaymentTransitionError {
    /// Current status.
    pub from: PaymentStatus,

    /// Requested status.
    pub to: PaymentStatus,
}

/// How an order's total is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    /// One payment for the full total by the buyer.
    Regular,

    /// Two or more payments, one per payer.
    Split,
}

impl PaymentStatus {
    /// Stored label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Partial => "PARTIAL",
            Self::Paid => "PAID",
            Self::Expired => "EXPIRED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }

    /// Whether money has been received on this record.
    pub const fn has_funds(self) -> bool {
        matches!(self, Self::Paid | Self::Partial)
    }

    /// Whether the record is closed without money kept.
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Expired | Self::Failed)
    }

    /// Whether a single record may move from `self` to `target`.
    ///
    /// Refunds are only reachable once the order has been cancelled.
    pub const fn can_transition_to(self, target: Self, order_cancelled: bool) -> bool {
        match (self, target) {
            (Self::Pending, Self::Partial | Self::Paid | Self::Expired | Self::Failed)
            | (Self::Partial, Self::Paid) => true,
            (Self::Paid | Self::Partial, Self::Refunded) => order_cancelled,
            _ => false,
        }
    }

    /// Validate a single-record move.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentTransitionError`] when the move is not allowed.
    pub fn transition_to(
        self,
        target: Self,
        order_cancelled: bool,
    ) -> Result<Self, PaymentTransitionError> {
        if self.can_transition_to(target, order_cancelled) {
            Ok(target)
        } else {
            Err(PaymentTransitionError {
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PARTIAL" => Ok(Self::Partial),
            "PAID" => Ok(Self::Paid),
            "EXPIRED" => Ok(Self::Expired),
            "FAILED" => Ok(Self::Failed),
            "REFUNDED" => Ok(Self::Refunded),
            other => Err(UnknownValueError::new("payment status", other)),
        }
    }
}

impl PaymentType {
    /// Stored label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "REGULAR",
            Self::Split => "SPLIT",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGULAR" => Ok(Self::Regular),
            "SPLIT" => Ok(Self::Split),
            other => Err(UnknownValueError::new("payment type", other)),
        }
    }
}

/// Derive an order's payment status from its payment records.
///
/// - every record `PAID` gives `PAID`;
/// - any `PAID` or `PARTIAL` otherwise gives `PARTIAL`;
/// - every record `PENDING` (or no records) gives `PENDING`;
/// - failures with nothing paid give `FAILED`, or `EXPIRED` when no record failed outright;
/// - refunded records with nothing else still holding money give `REFUNDED`.
pub fn aggregate(statuses: impl IntoIterator<Item = PaymentStatus>) -> PaymentStatus {
    let mut count = 0_usize;
    let mut paid = 0_usize;
    let mut with_funds = 0_usize;
    let mut pending = 0_usize;
    let mut refunded = 0_usize;
    let mut failed = false;
    let mut expired = false;

    for status in statuses {
        count += 1;

        match status {
            PaymentStatus::Paid => {
                paid += 1;
                with_funds += 1;
            }
            PaymentStatus::Partial => with_funds += 1,
            PaymentStatus::Pending => pending += 1,
            PaymentStatus::Refunded => refunded += 1,
            PaymentStatus::Failed => failed = true,
            PaymentStatus::Expired => expired = true,
        }
    }

    if count == 0 || pending == count {
        return PaymentStatus::Pending;
    }

    if paid == count {
        return PaymentStatus::Paid;
    }

    if with_funds > 0 {
        return PaymentStatus::Partial;
    }

    if refunded > 0 && pending == 0 {
        return PaymentStatus::Refunded;
    }

    if failed {
        return PaymentStatus::Failed;
    }

    if expired {
        return PaymentStatus::Expired;
    }

    PaymentStatus::Pending
}
