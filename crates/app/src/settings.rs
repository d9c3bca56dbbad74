//! Business Settings

use clap::Args;
use jiff::{SignedDuration, Timestamp, Zoned, tz::TimeZone};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown time zone {name:?}")]
    TimeZone {
        name: String,
        #[source]
        source: jiff::Error,
    },

    #[error("tax rate must be between 0 and 100")]
    TaxRate,

    #[error("payment window must be at least one minute")]
    PaymentWindow,
}

/// Business settings shared by the server and the CLI.
#[derive(Debug, Clone, Args)]
pub struct BusinessArgs {
    /// Time zone used for calendar dates (coupon expiry, discount windows, order codes)
    #[arg(long, env = "BUSINESS_TIMEZONE", default_value = "Asia/Jakarta")]
    pub business_timezone: String,

    /// VAT (PPN) rate in percent applied to the discounted product cost
    #[arg(long, env = "PPN_RATE_PERCENT", default_value = "11")]
    pub ppn_rate_percent: Decimal,

    /// Minutes a new order waits for payment before the expiry sweep cancels it
    #[arg(long, env = "ORDER_PAYMENT_TTL_MINUTES", default_value_t = 1_440)]
    pub order_payment_ttl_minutes: i64,
}

impl BusinessArgs {
    /// Validate and resolve the raw arguments.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown time zones or out-of-range values.
    pub fn resolve(&self) -> Result<Settings, SettingsError> {
        let time_zone =
            TimeZone::get(&self.business_timezone).map_err(|source| SettingsError::TimeZone {
                name: self.business_timezone.clone(),
                source,
            })?;

        if self.ppn_rate_percent < Decimal::ZERO || self.ppn_rate_percent > Decimal::ONE_HUNDRED {
            return Err(SettingsError::TaxRate);
        }

        if self.order_payment_ttl_minutes < 1 {
            return Err(SettingsError::PaymentWindow);
        }

        Ok(Settings {
            time_zone,
            tax_rate: self.ppn_rate_percent,
            payment_window: SignedDuration::from_mins(self.order_payment_ttl_minutes),
        })
    }
}

/// Resolved business settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub time_zone: TimeZone,
    pub tax_rate: Decimal,
    pub payment_window: SignedDuration,
}

impl Settings {
    /// `at` on the business clock.
    #[must_use]
    pub fn local(&self, at: Timestamp) -> Zoned {
        at.to_zoned(self.time_zone.clone())
    }
}
