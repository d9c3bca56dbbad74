//! Grosir Domain Concerns

use std::str::FromStr;

use sqlx::{Row, postgres::PgRow};

use grosir::values::UnknownValueError;

pub mod catalog;
pub mod coupons;
pub mod history;
pub mod orders;
pub mod payments;

/// Decode a text column holding one of the domain's enum labels.
pub(crate) fn parse_column<T>(row: &PgRow, column: &'static str) -> sqlx::Result<T>
where
    T: FromStr<Err = UnknownValueError>,
{
    let value: String = row.try_get(column)?;

    value.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_i64_from_u64(value: u64, column: &'static str) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_u64_from_i64(value: i64, column: &'static str) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
