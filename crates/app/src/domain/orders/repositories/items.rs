//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use grosir::orders::pricing::LinePrice;

use crate::domain::{
    catalog::records::{CategoryUuid, ProductRecord, ProductUuid},
    orders::records::{OrderItemRecord, OrderItemUuid, OrderUuid},
};

const CREATE_ITEM_SQL: &str = include_str!("../sql/create_item.sql");
const LIST_ITEMS_SQL: &str = include_str!("../sql/list_items.sql");

/// A priced line ready to be stored.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NewOrderItem<'a> {
    pub(crate) product: &'a ProductRecord,
    pub(crate) price: LinePrice,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: NewOrderItem<'_>,
    ) -> Result<OrderItemRecord, sqlx::Error> {
        let quantity = i32::try_from(item.price.quantity).map_err(|e| sqlx::Error::ColumnDecode {
            index: "qty".to_string(),
            source: Box::new(e),
        })?;

        query_as::<Postgres, OrderItemRecord>(CREATE_ITEM_SQL)
            .bind(OrderItemUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(item.product.uuid.into_uuid())
            .bind(item.product.category.into_uuid())
            .bind(&item.product.name)
            .bind(&item.product.sku)
            .bind(item.price.unit_price)
            .bind(item.price.unit_discount)
            .bind(quantity)
            .bind(item.price.subtotal())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(LIST_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("qty")?;

        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order: OrderUuid::from_uuid(row.try_get("pesanan_uuid")?),
            product: ProductUuid::from_uuid(row.try_get("produk_uuid")?),
            category: CategoryUuid::from_uuid(row.try_get("kategori_uuid")?),
            product_name: row.try_get("nama_produk")?,
            sku: row.try_get("sku")?,
            unit_price: row.try_get("harga_satuan")?,
            unit_discount: row.try_get("diskon_satuan")?,
            quantity: u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                index: "qty".to_string(),
                source: Box::new(e),
            })?,
            subtotal: row.try_get("subtotal")?,
        })
    }
}
