//! Coupons Service

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{Span, info};

use grosir::{codes::tombstone, coupons::normalise_code};

use crate::{
    database::Db,
    domain::coupons::{
        CouponCheck, CouponsServiceError, PgCouponLedger, PgCouponValidator, RowLock,
        data::{CouponPreview, CouponTerms, CouponUpdate, NewCoupon},
        records::{CouponQuote, CouponRecord, CouponUsageReport, CouponUuid},
        repositories::PgCouponsRepository,
    },
    settings::Settings,
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    settings: Settings,
    coupons: PgCouponsRepository,
    ledger: PgCouponLedger,
    validator: PgCouponValidator,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db, settings: Settings) -> Self {
        Self {
            db,
            settings,
            coupons: PgCouponsRepository::new(),
            ledger: PgCouponLedger::new(),
            validator: PgCouponValidator::new(),
        }
    }
}

/// Normalise the code and check the definition before anything touches storage.
fn prepare(
    code: &str,
    mut terms: CouponTerms,
) -> Result<(String, CouponTerms), CouponsServiceError> {
    let code = normalise_code(code)?;

    if terms.all_categories {
        terms.categories.clear();
    }

    terms.rule().validate_definition()?;

    Ok((code, terms))
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(coupon_uuid = %coupon.uuid, coupon_code = tracing::field::Empty),
        err
    )]
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        let (code, terms) = prepare(&coupon.code, coupon.terms)?;

        Span::current().record("coupon_code", tracing::field::display(&code));

        let mut tx = self.db.begin().await?;

        let record = self
            .coupons
            .create_coupon(&mut tx, coupon.uuid, &code, &terms)
            .await?;

        tx.commit().await?;

        info!(coupon_uuid = %record.uuid, code = %record.code, "created coupon");

        Ok(record)
    }

    async fn get_coupon(&self, coupon: CouponUuid) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.coupons.get_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn find_coupon_by_code(&self, code: &str) -> Result<CouponRecord, CouponsServiceError> {
        let code = normalise_code(code).map_err(|_| CouponsServiceError::NotFound)?;

        let mut tx = self.db.begin().await?;

        let record = self
            .coupons
            .find_by_code(&mut tx, &code)
            .await?
            .ok_or(CouponsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.coupons.list_coupons(&mut tx).await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "coupons.service.update_coupon",
        skip(self, update),
        fields(coupon_uuid = %coupon),
        err
    )]
    async fn update_coupon(
        &self,
        coupon: CouponUuid,
        update: CouponUpdate,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let (code, terms) = prepare(&update.code, update.terms)?;

        let mut tx = self.db.begin().await?;

        let record = self
            .coupons
            .update_coupon(&mut tx, coupon, &code, &terms)
            .await?;

        tx.commit().await?;

        info!(coupon_uuid = %coupon, code = %record.code, "updated coupon");

        Ok(record)
    }

    #[tracing::instrument(
        name = "coupons.service.delete_coupon",
        skip(self),
        fields(coupon_uuid = %coupon),
        err
    )]
    async fn delete_coupon(
        &self,
        coupon: CouponUuid,
        at: Timestamp,
    ) -> Result<(), CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.coupons.lock_coupon(&mut tx, coupon).await?;

        let rows_affected = self
            .coupons
            .delete_coupon(&mut tx, coupon, &tombstone(&record.code, at), at)
            .await?;

        if rows_affected == 0 {
            return Err(CouponsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(coupon_uuid = %coupon, code = %record.code, "deleted coupon");

        Ok(())
    }

    #[tracing::instrument(
        name = "coupons.service.validate_coupon",
        skip(self, preview),
        fields(buyer_uuid = %preview.buyer, total = %preview.total),
        err(level = tracing::Level::DEBUG)
    )]
    async fn validate_coupon(
        &self,
        preview: CouponPreview,
        at: Timestamp,
    ) -> Result<CouponQuote, CouponsServiceError> {
        let now = self.settings.local(at);

        let mut tx = self.db.begin().await?;

        let validated = self
            .validator
            .validate(
                &mut tx,
                CouponCheck {
                    code: &preview.code,
                    buyer: preview.buyer,
                    total: preview.total,
                    categories: &preview.categories,
                    now: &now,
                },
                RowLock::None,
            )
            .await?;

        tx.commit().await?;

        Ok(CouponQuote {
            coupon: validated.coupon.uuid,
            code: validated.coupon.code,
            discount: validated.discount,
        })
    }

    async fn usage_report(
        &self,
        coupon: CouponUuid,
    ) -> Result<CouponUsageReport, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.coupons.get_coupon(&mut tx, coupon).await?;
        let usages = self.ledger.list_usages(&mut tx, coupon).await?;

        tx.commit().await?;

        let total_discount: Decimal = usages.iter().map(|usage| usage.discount).sum();

        Ok(CouponUsageReport {
            coupon: record,
            usage_count: usages.len() as u64,
            total_discount,
            usages,
        })
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Create a coupon. Codes are stored upper-case.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Retrieve a live coupon.
    async fn get_coupon(&self, coupon: CouponUuid) -> Result<CouponRecord, CouponsServiceError>;

    /// Retrieve a live coupon by code, ignoring case.
    async fn find_coupon_by_code(&self, code: &str) -> Result<CouponRecord, CouponsServiceError>;

    /// All live coupons, newest first.
    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError>;

    /// Replace a coupon's code, terms and category links.
    async fn update_coupon(
        &self,
        coupon: CouponUuid,
        update: CouponUpdate,
    ) -> Result<CouponRecord, CouponsServiceError>;

    /// Soft-delete a coupon, freeing its code.
    async fn delete_coupon(&self, coupon: CouponUuid, at: Timestamp)
    -> Result<(), CouponsServiceError>;

    /// Evaluate a code against a prospective order without redeeming it.
    async fn validate_coupon(
        &self,
        preview: CouponPreview,
        at: Timestamp,
    ) -> Result<CouponQuote, CouponsServiceError>;

    /// Every redemption of a coupon.
    async fn usage_report(&self, coupon: CouponUuid)
    -> Result<CouponUsageReport, CouponsServiceError>;
}
