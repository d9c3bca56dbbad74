//! Catalog Repository

use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use grosir::categories::CategoryDiscount;

use crate::{
    domain::{
        catalog::records::{CategoryUuid, ProductRecord, ProductUuid},
        parse_column,
    },
    uuids::raw_uuids,
};

const GET_PRODUCTS_SQL: &str = include_str!("sql/get_products.sql");
const LIST_CATEGORY_DISCOUNTS_SQL: &str = include_str!("sql/list_category_discounts.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Live products among `products`; missing or deleted ones are simply absent.
    pub(crate) async fn get_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCTS_SQL)
            .bind(raw_uuids(products))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_category_discounts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        categories: &[CategoryUuid],
        day: Date,
    ) -> Result<Vec<CategoryDiscount<CategoryUuid>>, sqlx::Error> {
        let rows = query(LIST_CATEGORY_DISCOUNTS_SQL)
            .bind(raw_uuids(categories))
            .bind(SqlxDate::from(day))
            .fetch_all(&mut **tx)
            .await?;

        rows.iter().map(category_discount_from_row).collect()
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            category: CategoryUuid::from_uuid(row.try_get("kategori_uuid")?),
            name: row.try_get("nama")?,
            sku: row.try_get("sku")?,
            price: row.try_get("harga")?,
        })
    }
}

fn category_discount_from_row(row: &PgRow) -> sqlx::Result<CategoryDiscount<CategoryUuid>> {
    Ok(CategoryDiscount {
        category: CategoryUuid::from_uuid(row.try_get("kategori_uuid")?),
        kind: parse_column(row, "jenis")?,
        value: row.try_get("nilai")?,
        starts_on: row.try_get::<SqlxDate, _>("tanggal_mulai")?.to_jiff(),
        ends_on: row.try_get::<SqlxDate, _>("tanggal_selesai")?.to_jiff(),
        active: row.try_get("aktif")?,
        created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
    })
}
