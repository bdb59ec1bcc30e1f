//! Storage primitives for the service layer
//!
//! Reusable file-backed stores; the cart's persistent slot is built on these.

pub mod json_map_store;
