//! Remote implementations of the catalog and stock lookups.

pub mod http_catalog;
