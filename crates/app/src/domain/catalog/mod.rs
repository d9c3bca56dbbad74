//! Catalog
//!
//! Read-only view of the external catalog: products with their current price and category, and
//! the category discounts defined against them.

pub mod records;
mod repository;

pub(crate) use repository::PgCatalogRepository;
