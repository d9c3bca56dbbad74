//! Orders

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::values::UnknownValueError;

pub mod pricing;
pub mod status;

pub use status::{OrderStatus, StatusTimestamps, TransitionError};

/// How an order reaches the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    /// Collected by the buyer at the warehouse.
    Pickup,

    /// Delivered by the store's own courier.
    StoreCourier,

    /// Handed to a third-party expedition service.
    Expedition,
}

impl DeliveryType {
    /// Stored label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "PICKUP",
            Self::StoreCourier => "STORE_COURIER",
            Self::Expedition => "EXPEDITION",
        }
    }

    /// Anything but pickup needs a delivery address.
    pub const fn requires_address(self) -> bool {
        !matches!(self, Self::Pickup)
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryType {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PICKUP" => Ok(Self::Pickup),
            "STORE_COURIER" => Ok(Self::StoreCourier),
            "EXPEDITION" => Ok(Self::Expedition),
            other => Err(UnknownValueError::new("delivery type", other)),
        }
    }
}
