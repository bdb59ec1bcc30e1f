use models::ProductId;
use thiserror::Error;

/// Why a cart mutation was rejected.
///
/// `Display` is the message shown to the user; the remaining fields are for
/// callers and logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Requested quantity is out of stock")]
    OutOfStock { product_id: ProductId, requested: u32, available: u32 },
    #[error("Product is not in the cart")]
    NotInCart { product_id: ProductId },
    #[error("Failed to add product")]
    AddFailed { product_id: ProductId, reason: String },
    #[error("Failed to remove product")]
    RemoveFailed { product_id: ProductId, reason: String },
    #[error("Failed to update product amount")]
    UpdateFailed { product_id: ProductId, reason: String },
}

impl CartError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            CartError::OutOfStock { .. } => 2001,
            CartError::NotInCart { .. } => 2002,
            CartError::AddFailed { .. } => 2101,
            CartError::RemoveFailed { .. } => 2102,
            CartError::UpdateFailed { .. } => 2103,
        }
    }

    pub fn product_id(&self) -> ProductId {
        match self {
            CartError::OutOfStock { product_id, .. }
            | CartError::NotInCart { product_id }
            | CartError::AddFailed { product_id, .. }
            | CartError::RemoveFailed { product_id, .. }
            | CartError::UpdateFailed { product_id, .. } => *product_id,
        }
    }

    /// Business-rule rejections, as opposed to collaborator failures.
    pub fn is_business_rule(&self) -> bool {
        matches!(self, CartError::OutOfStock { .. } | CartError::NotInCart { .. })
    }
}
