use serde::{Deserialize, Deserializer, Serialize};

use crate::product::ProductId;

/// Units available in the catalog, independent of any cart.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stock {
    pub id: ProductId,
    /// Negative counts from the catalog read as sold out.
    #[serde(deserialize_with = "clamped_amount")]
    pub amount: u32,
}

impl Stock {
    pub fn allows(&self, requested: u32) -> bool {
        requested <= self.amount
    }
}

fn clamped_amount<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(u32::try_from(raw.max(0)).unwrap_or(u32::MAX))
}
