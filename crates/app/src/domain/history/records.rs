//! History Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use grosir::values::UnknownValueError;

use crate::{domain::orders::records::OrderUuid, identities::ActorUuid, uuids::TypedUuid};

/// Status History UUID
pub type StatusHistoryUuid = TypedUuid<StatusHistoryRecord>;

/// Which status an entry tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryKind {
    /// `order_status`
    Order,

    /// `payment_status`
    Payment,
}

impl HistoryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Order => "ORDER",
            Self::Payment => "PAYMENT",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryKind {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORDER" => Ok(Self::Order),
            "PAYMENT" => Ok(Self::Payment),
            other => Err(UnknownValueError {
                kind: "history kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Status History Record
#[derive(Debug, Clone, PartialEq)]
pub struct StatusHistoryRecord {
    pub uuid: StatusHistoryUuid,
    pub order: OrderUuid,
    pub kind: HistoryKind,
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor: Option<ActorUuid>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}
