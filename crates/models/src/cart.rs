use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ModelError;
use crate::product::{Product, ProductId};

/// Ordered cart lines, unique by product id.
///
/// Every transformation returns a new `Cart`; the receiver is left untouched so
/// a snapshot can be shared while the next one is being built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    lines: Vec<Product>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw lines, dropping lines with `amount < 1` and
    /// repeated ids (the first occurrence wins).
    pub fn from_lines(lines: Vec<Product>) -> Self {
        let mut kept: Vec<Product> = Vec::with_capacity(lines.len());
        for line in lines {
            if line.amount < 1 {
                warn!(product_id = line.id, "dropping cart line with zero amount");
                continue;
            }
            if kept.iter().any(|p| p.id == line.id) {
                warn!(product_id = line.id, "dropping duplicate cart line");
                continue;
            }
            kept.push(line);
        }
        Self { lines: kept }
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let lines: Vec<Product> = serde_json::from_str(raw)?;
        Ok(Self::from_lines(lines))
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(&self.lines)?)
    }

    pub fn lines(&self) -> &[Product] {
        &self.lines
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.lines.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.find(id).is_some()
    }

    /// Number of distinct products.
    pub fn size(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(Product::subtotal).sum()
    }

    /// Append `product` as a new line, or replace the line with the same id in place.
    pub fn with_line(&self, product: Product) -> Result<Self, ModelError> {
        if product.amount < 1 {
            return Err(ModelError::Validation(format!(
                "product {} must have an amount of at least 1",
                product.id
            )));
        }
        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => lines.push(product),
        }
        Ok(Self { lines })
    }

    /// Set the amount of an existing line. `None` if the product is not in the cart.
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Result<Option<Self>, ModelError> {
        match self.find(id) {
            Some(line) => self.with_line(line.with_amount(amount)).map(Some),
            None => Ok(None),
        }
    }

    /// Drop the line for `id`. `None` if the product is not in the cart.
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let lines = self.lines.iter().filter(|p| p.id != id).cloned().collect();
        Some(Self { lines })
    }
}

impl From<Vec<Product>> for Cart {
    fn from(lines: Vec<Product>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: ProductId, amount: u32) -> Product {
        Product { id, name: format!("product {id}"), price: 100.0, image: format!("https://img/{id}.jpg"), amount }
    }

    #[test]
    fn from_lines_drops_zero_amounts_and_duplicates() {
        let cart = Cart::from_lines(vec![line(1, 2), line(2, 0), line(1, 7), line(3, 1)]);
        let ids: Vec<_> = cart.lines().iter().map(|p| (p.id, p.amount)).collect();
        assert_eq!(ids, vec![(1, 2), (3, 1)]);
    }

    #[test]
    fn with_line_appends_then_replaces_in_place() -> anyhow::Result<()> {
        let cart = Cart::from_lines(vec![line(1, 1), line(2, 1)]);
        let appended = cart.with_line(line(3, 1))?;
        assert_eq!(appended.size(), 3);
        let replaced = appended.with_line(line(1, 5))?;
        assert_eq!(replaced.lines()[0].amount, 5);
        assert_eq!(replaced.lines()[2].id, 3);
        // the original snapshot is unchanged
        assert_eq!(cart.size(), 2);
        Ok(())
    }

    #[test]
    fn with_line_rejects_zero_amount() {
        let cart = Cart::new();
        assert!(matches!(cart.with_line(line(1, 0)), Err(ModelError::Validation(_))));
    }

    #[test]
    fn with_amount_and_without_report_missing_lines() -> anyhow::Result<()> {
        let cart = Cart::from_lines(vec![line(1, 1)]);
        assert!(cart.with_amount(9, 2)?.is_none());
        assert!(cart.without(9).is_none());

        let bumped = cart.with_amount(1, 4)?.ok_or_else(|| anyhow::anyhow!("line 1 missing"))?;
        assert_eq!(bumped.find(1).map(|p| p.amount), Some(4));
        let emptied = bumped.without(1).ok_or_else(|| anyhow::anyhow!("line 1 missing"))?;
        assert!(emptied.is_empty());
        Ok(())
    }

    #[test]
    fn json_blob_is_a_plain_array() -> anyhow::Result<()> {
        let cart = Cart::from_lines(vec![line(1, 2), line(4, 1)]);
        let raw = cart.to_json()?;
        assert!(raw.starts_with('['));
        assert_eq!(Cart::from_json(&raw)?, cart);
        let via_serde: Cart = serde_json::from_str(&raw)?;
        assert_eq!(via_serde, cart);
        Ok(())
    }

    #[test]
    fn total_sums_line_subtotals() {
        let mut a = line(1, 2);
        a.price = 10.0;
        let mut b = line(2, 3);
        b.price = 1.5;
        let cart = Cart::from_lines(vec![a, b]);
        assert_eq!(cart.total(), 24.5);
    }
}
