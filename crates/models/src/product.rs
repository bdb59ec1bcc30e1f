use serde::{Deserialize, Serialize};

pub type ProductId = u64;

/// A catalog product, or a cart line when held inside a [`crate::Cart`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub image: String,
    /// Quantity in the cart. The catalog does not send it.
    #[serde(default)]
    pub amount: u32,
}

impl Product {
    pub fn with_amount(&self, amount: u32) -> Self {
        Self { amount, ..self.clone() }
    }

    /// `price * amount` for this line.
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.amount)
    }
}
