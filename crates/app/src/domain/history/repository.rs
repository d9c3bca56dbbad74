//! History Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    domain::{
        history::records::{HistoryKind, StatusHistoryRecord, StatusHistoryUuid},
        orders::records::OrderUuid,
        parse_column,
    },
    identities::ActorUuid,
};

const CREATE_ENTRY_SQL: &str = include_str!("sql/create_entry.sql");
const LIST_ENTRIES_SQL: &str = include_str!("sql/list_entries.sql");

/// One status change to record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NewHistoryEntry<'a> {
    pub(crate) order: OrderUuid,
    pub(crate) kind: HistoryKind,
    pub(crate) from_status: Option<&'a str>,
    pub(crate) to_status: &'a str,
    pub(crate) actor: Option<ActorUuid>,
    pub(crate) note: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgHistoryRepository;

impl PgHistoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: NewHistoryEntry<'_>,
    ) -> Result<StatusHistoryRecord, sqlx::Error> {
        query_as::<Postgres, StatusHistoryRecord>(CREATE_ENTRY_SQL)
            .bind(StatusHistoryUuid::new().into_uuid())
            .bind(entry.order.into_uuid())
            .bind(entry.kind.as_str())
            .bind(entry.from_status)
            .bind(entry.to_status)
            .bind(entry.actor.map(ActorUuid::into_uuid))
            .bind(entry.note)
            .fetch_one(&mut **tx)
            .await
    }

    /// Entries for `order`, newest first.
    pub(crate) async fn list(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<StatusHistoryRecord>, sqlx::Error> {
        query_as::<Postgres, StatusHistoryRecord>(LIST_ENTRIES_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for StatusHistoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: StatusHistoryUuid::from_uuid(row.try_get("uuid")?),
            order: OrderUuid::from_uuid(row.try_get("pesanan_uuid")?),
            kind: parse_column(row, "jenis")?,
            from_status: row.try_get("status_sebelum")?,
            to_status: row.try_get("status_sesudah")?,
            actor: row
                .try_get::<Option<Uuid>, _>("diubah_oleh")?
                .map(ActorUuid::from_uuid),
            note: row.try_get("catatan")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
