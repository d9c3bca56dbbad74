//! Coupons Repository

use jiff::Timestamp;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        catalog::records::CategoryUuid,
        coupons::{
            data::CouponTerms,
            records::{CouponRecord, CouponUuid},
        },
        parse_column, try_i64_from_u64, try_u64_from_i64,
    },
    uuids::raw_uuids,
};

const CREATE_COUPON_SQL: &str = include_str!("../sql/create_coupon.sql");
const GET_COUPON_SQL: &str = include_str!("../sql/get_coupon.sql");
const LOCK_COUPON_SQL: &str = include_str!("../sql/lock_coupon.sql");
const FIND_COUPON_BY_CODE_SQL: &str = include_str!("../sql/find_coupon_by_code.sql");
const LOCK_COUPON_BY_CODE_SQL: &str = include_str!("../sql/lock_coupon_by_code.sql");
const LIST_COUPONS_SQL: &str = include_str!("../sql/list_coupons.sql");
const UPDATE_COUPON_SQL: &str = include_str!("../sql/update_coupon.sql");
const DELETE_COUPON_SQL: &str = include_str!("../sql/delete_coupon.sql");
const LIST_COUPON_CATEGORIES_SQL: &str = include_str!("../sql/list_coupon_categories.sql");
const CREATE_COUPON_CATEGORIES_SQL: &str = include_str!("../sql/create_coupon_categories.sql");
const DELETE_COUPON_CATEGORIES_SQL: &str = include_str!("../sql/delete_coupon_categories.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CouponUuid,
        code: &str,
        terms: &CouponTerms,
    ) -> Result<CouponRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, CouponRecord>(CREATE_COUPON_SQL)
            .bind(uuid.into_uuid())
            .bind(code)
            .bind(terms.kind.as_str())
            .bind(terms.value)
            .bind(terms.minimum_purchase)
            .bind(bind_limit(terms.usage_limit)?)
            .bind(SqlxDate::from(terms.expires_on))
            .bind(terms.active)
            .bind(terms.all_categories)
            .fetch_one(&mut **tx)
            .await?;

        record.terms.categories = self
            .replace_categories(tx, uuid, &terms.categories)
            .await?;

        Ok(record)
    }

    pub(crate) async fn get_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CouponUuid,
    ) -> Result<CouponRecord, sqlx::Error> {
        let record = query_as::<Postgres, CouponRecord>(GET_COUPON_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_categories(tx, record).await
    }

    /// Live coupon `uuid`, row-locked until the transaction ends.
    pub(crate) async fn lock_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CouponUuid,
    ) -> Result<CouponRecord, sqlx::Error> {
        let record = query_as::<Postgres, CouponRecord>(LOCK_COUPON_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_categories(tx, record).await
    }

    /// Case-insensitive lookup among live coupons.
    pub(crate) async fn find_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        let record = query_as::<Postgres, CouponRecord>(FIND_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await?;

        match record {
            Some(record) => Ok(Some(self.with_categories(tx, record).await?)),
            None => Ok(None),
        }
    }

    /// Like [`Self::find_by_code`], but holds the row lock until the transaction ends.
    ///
    /// Concurrent redemptions of the same code queue up here, so the usage count they read
    /// afterwards is exact.
    pub(crate) async fn lock_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        let record = query_as::<Postgres, CouponRecord>(LOCK_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await?;

        match record {
            Some(record) => Ok(Some(self.with_categories(tx, record).await?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CouponRecord>, sqlx::Error> {
        let mut records = query_as::<Postgres, CouponRecord>(LIST_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await?;

        let uuids: Vec<Uuid> = records.iter().map(|record| record.uuid.into_uuid()).collect();
        let mut links = self.list_categories(tx, &uuids).await?;

        for record in &mut records {
            if let Some(categories) = links.remove(&record.uuid) {
                record.terms.categories = categories;
            }
        }

        Ok(records)
    }

    pub(crate) async fn update_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CouponUuid,
        code: &str,
        terms: &CouponTerms,
    ) -> Result<CouponRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, CouponRecord>(UPDATE_COUPON_SQL)
            .bind(uuid.into_uuid())
            .bind(code)
            .bind(terms.kind.as_str())
            .bind(terms.value)
            .bind(terms.minimum_purchase)
            .bind(bind_limit(terms.usage_limit)?)
            .bind(SqlxDate::from(terms.expires_on))
            .bind(terms.active)
            .bind(terms.all_categories)
            .fetch_one(&mut **tx)
            .await?;

        query(DELETE_COUPON_CATEGORIES_SQL)
            .bind(uuid.into_uuid())
            .execute(&mut **tx)
            .await?;

        record.terms.categories = self
            .replace_categories(tx, uuid, &terms.categories)
            .await?;

        Ok(record)
    }

    /// Soft-delete, renaming the code so it can be issued again.
    pub(crate) async fn delete_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CouponUuid,
        tombstone: &str,
        deleted_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_COUPON_SQL)
            .bind(uuid.into_uuid())
            .bind(tombstone)
            .bind(SqlxTimestamp::from(deleted_at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn replace_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CouponUuid,
        categories: &[CategoryUuid],
    ) -> Result<Vec<CategoryUuid>, sqlx::Error> {
        if !categories.is_empty() {
            query(CREATE_COUPON_CATEGORIES_SQL)
                .bind(uuid.into_uuid())
                .bind(raw_uuids(categories))
                .execute(&mut **tx)
                .await?;
        }

        let mut links = self.list_categories(tx, &[uuid.into_uuid()]).await?;

        Ok(links.remove(&uuid).unwrap_or_default())
    }

    async fn with_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut record: CouponRecord,
    ) -> Result<CouponRecord, sqlx::Error> {
        let mut links = self
            .list_categories(tx, &[record.uuid.into_uuid()])
            .await?;

        record.terms.categories = links.remove(&record.uuid).unwrap_or_default();

        Ok(record)
    }

    async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupons: &[Uuid],
    ) -> Result<FxHashMap<CouponUuid, Vec<CategoryUuid>>, sqlx::Error> {
        let rows = query(LIST_COUPON_CATEGORIES_SQL)
            .bind(coupons)
            .fetch_all(&mut **tx)
            .await?;

        let mut links: FxHashMap<CouponUuid, Vec<CategoryUuid>> = FxHashMap::default();

        for row in rows {
            let coupon = CouponUuid::from_uuid(row.try_get("kupon_uuid")?);
            let category = CategoryUuid::from_uuid(row.try_get("kategori_uuid")?);

            links.entry(coupon).or_default().push(category);
        }

        Ok(links)
    }
}

fn bind_limit(limit: Option<u64>) -> Result<Option<i64>, sqlx::Error> {
    limit
        .map(|limit| try_i64_from_u64(limit, "batas_penggunaan"))
        .transpose()
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let usage_limit = row
            .try_get::<Option<i64>, _>("batas_penggunaan")?
            .map(|limit| try_u64_from_i64(limit, "batas_penggunaan"))
            .transpose()?;

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("kode")?,
            terms: CouponTerms {
                kind: parse_column(row, "jenis_diskon")?,
                value: row.try_get("nilai_diskon")?,
                minimum_purchase: row.try_get("minimal_pembelian")?,
                usage_limit,
                expires_on: row.try_get::<SqlxDate, _>("tanggal_kedaluarsa")?.to_jiff(),
                active: row.try_get("aktif")?,
                all_categories: row.try_get("semua_kategori")?,
                categories: Vec::new(),
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
