//! File-backed implementations of the cart's collaborator traits.

pub mod kv_store;
