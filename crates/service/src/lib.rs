//! Service layer for the storefront cart.
//! - `cart` owns the cart state and the rules for changing it.
//! - `file` and `remote` provide the production collaborators.
//! - `storage` holds the reusable JSON file store they build on.

pub mod errors;
pub mod cart;
pub mod runtime;
pub mod storage;
pub mod file;
pub mod remote;
