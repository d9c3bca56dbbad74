//! Payment status hook

use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::{Postgres, Transaction};

use grosir::payments::PaymentStatus;

use crate::domain::orders::records::OrderUuid;

/// Notified inside the settling transaction whenever an order's aggregate payment status
/// changes. The order row is already locked.
#[async_trait]
pub trait PaymentStatusHook: Send + Sync {
    async fn on_payment_status_changed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        from: PaymentStatus,
        to: PaymentStatus,
        at: Timestamp,
    ) -> Result<(), sqlx::Error>;
}
