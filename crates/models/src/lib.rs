//! Data model for the storefront cart.
//! - `Product` doubles as a cart line: its `amount` is the quantity in the cart.
//! - `Stock` is catalog-side availability.
//! - `Cart` is the ordered, id-unique list of lines.

pub mod errors;
pub mod product;
pub mod stock;
pub mod cart;

pub use cart::Cart;
pub use product::{Product, ProductId};
pub use stock::Stock;
