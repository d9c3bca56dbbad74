//! Order Status

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::values::UnknownValueError;

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created, waiting for payment.
    Pending,

    /// Paid and being prepared.
    Processing,

    /// Packed and ready for pickup or hand-over to the courier.
    Ready,

    /// With the courier.
    Shipped,

    /// Received by the buyer.
    Completed,

    /// Cancelled before completion.
    Cancelled,
}

/// A requested status change that the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move order from {from} to {to}")]
pub struct TransitionError {
    /// Status the order is in.
    pub from: OrderStatus,

    /// Status that was requested.
    pub to: OrderStatus,
}

impl OrderStatus {
    /// Stored label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Ready => "READY",
            Self::Shipped => "SHIPPED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// `COMPLETED` and `CANCELLED` accept no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// The next step on the forward path, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Processing),
            Self::Processing => Some(Self::Ready),
            Self::Ready => Some(Self::Shipped),
            Self::Shipped => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Whether `self -> target` is a legal single step.
    pub fn can_transition_to(self, target: Self) -> bool {
        if self.is_terminal() {
            return false;
        }

        target == Self::Cancelled || self.next() == Some(target)
    }

    /// Validate a single step.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] for skips, backward moves and moves out of a terminal status.
    pub fn transition_to(self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TransitionError {
                from: self,
                to: target,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PROCESSING" => Ok(Self::Processing),
            "READY" => Ok(Self::Ready),
            "SHIPPED" => Ok(Self::Shipped),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(UnknownValueError::new("order status", other)),
        }
    }
}

/// Whether a sequence of statuses, oldest first, is a path the lifecycle could have produced.
pub fn is_valid_path(path: &[OrderStatus]) -> bool {
    path.first() == Some(&OrderStatus::Pending)
        && path
            .windows(2)
            .all(|pair| matches!(pair, [from, to] if from.can_transition_to(*to)))
}

/// Per-status timestamps of an order.
///
/// Each field is written once, by the first transition into its status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTimestamps {
    /// Aggregate payment status first became `PAID`.
    pub paid_at: Option<Timestamp>,

    /// Entered `PROCESSING`.
    pub processed_at: Option<Timestamp>,

    /// Entered `READY`.
    pub ready_at: Option<Timestamp>,

    /// Entered `SHIPPED`.
    pub shipped_at: Option<Timestamp>,

    /// Entered `COMPLETED`.
    pub completed_at: Option<Timestamp>,

    /// Entered `CANCELLED`.
    pub cancelled_at: Option<Timestamp>,
}

impl StatusTimestamps {
    fn slot(&mut self, status: OrderStatus) -> Option<&mut Option<Timestamp>> {
        match status {
            OrderStatus::Pending => None,
            OrderStatus::Processing => Some(&mut self.processed_at),
            OrderStatus::Ready => Some(&mut self.ready_at),
            OrderStatus::Shipped => Some(&mut self.shipped_at),
            OrderStatus::Completed => Some(&mut self.completed_at),
            OrderStatus::Cancelled => Some(&mut self.cancelled_at),
        }
    }

    /// Timestamp recorded for entering `status`.
    pub fn entered(&self, status: OrderStatus) -> Option<Timestamp> {
        match status {
            OrderStatus::Pending => None,
            OrderStatus::Processing => self.processed_at,
            OrderStatus::Ready => self.ready_at,
            OrderStatus::Shipped => self.shipped_at,
            OrderStatus::Completed => self.completed_at,
            OrderStatus::Cancelled => self.cancelled_at,
        }
    }

    /// Record entering `status` at `at`; returns `false` when it was already recorded.
    pub fn stamp(&mut self, status: OrderStatus, at: Timestamp) -> bool {
        match self.slot(status) {
            Some(slot) if slot.is_none() => {
                *slot = Some(at);
                true
            }
            _ => false,
        }
    }

    /// Record the first time payment completed.
    pub fn stamp_paid(&mut self, at: Timestamp) -> bool {
        if self.paid_at.is_some() {
            return false;
        }

        self.paid_at = Some(at);

        true
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Ready,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn forward_path_is_allowed() {
        assert!(is_valid_path(&[
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Ready,
            OrderStatus::Shipped,
            OrderStatus::Completed,
        ]));
    }

    #[test]
    fn pending_to_shipped_is_rejected() {
        assert_eq!(
            OrderStatus::Pending.transition_to(OrderStatus::Shipped),
            Err(TransitionError {
                from: OrderStatus::Pending,
                to: OrderStatus::Shipped,
            })
        );
    }

    #[test]
    fn cancel_allowed_from_every_non_terminal_status() {
        for status in ALL.into_iter().filter(|s| !s.is_terminal()) {
            assert!(
                status.can_transition_to(OrderStatus::Cancelled),
                "expected {status} -> CANCELLED to be allowed"
            );
        }
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        for from in [OrderStatus::Completed, OrderStatus::Cancelled] {
            for to in ALL {
                assert!(
                    !from.can_transition_to(to),
                    "expected {from} -> {to} to be rejected"
                );
            }
        }
    }

    #[test]
    fn backward_moves_are_rejected() {
        for (index, from) in ALL.iter().enumerate() {
            for to in ALL.iter().take(index) {
                assert!(
                    !from.can_transition_to(*to),
                    "expected {from} -> {to} to be rejected"
                );
            }
        }
    }

    #[test]
    fn every_allowed_step_keeps_path_valid() {
        // exhaustive over paths of up to five steps
        fn walk(path: &mut Vec<OrderStatus>, depth: usize) {
            assert!(is_valid_path(path), "path {path:?} should be valid");

            if depth == 0 {
                return;
            }

            let Some(&last) = path.last() else {
                return;
            };

            for next in ALL.into_iter().filter(|s| last.can_transition_to(*s)) {
                path.push(next);
                walk(path, depth - 1);
                path.pop();
            }
        }

        walk(&mut vec![OrderStatus::Pending], 5);
    }

    #[test]
    fn cancelled_after_terminal_is_invalid_path() {
        assert!(!is_valid_path(&[
            OrderStatus::Pending,
            OrderStatus::Cancelled,
            OrderStatus::Cancelled,
        ]));
        assert!(!is_valid_path(&[OrderStatus::Processing]));
    }

    #[test]
    fn timestamps_are_first_write_wins() -> TestResult {
        let first: Timestamp = "2026-10-16T08:00:00Z".parse()?;
        let second: Timestamp = "2026-10-16T09:00:00Z".parse()?;

        let mut timestamps = StatusTimestamps::default();

        assert!(timestamps.stamp(OrderStatus::Processing, first));
        assert!(!timestamps.stamp(OrderStatus::Processing, second));
        assert!(!timestamps.stamp(OrderStatus::Pending, second));
        assert_eq!(timestamps.entered(OrderStatus::Processing), Some(first));

        assert!(timestamps.stamp_paid(first));
        assert!(!timestamps.stamp_paid(second));
        assert_eq!(timestamps.paid_at, Some(first));

        Ok(())
    }

    #[test]
    fn labels_round_trip() -> TestResult {
        for status in ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }

        Ok(())
    }
}
