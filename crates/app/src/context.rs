//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        coupons::{CouponsService, PgCouponsService},
        orders::{OrdersService, PgOrdersService},
        payments::{PaymentsService, PgPaymentsService},
    },
    settings::Settings,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub coupons: Arc<dyn CouponsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        max_connections: u32,
        settings: Settings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(&Db::new(pool), settings))
    }

    #[must_use]
    pub fn from_db(db: &Db, settings: Settings) -> Self {
        Self {
            coupons: Arc::new(PgCouponsService::new(db.clone(), settings.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), settings)),
            payments: Arc::new(PgPaymentsService::new(db.clone())),
        }
    }
}
