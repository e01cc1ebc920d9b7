//! Strongly-typed identifiers of local inventory records.

use serde::{Deserialize, Serialize};

/// Identifier of a part (the local entity a SKU belongs to).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(u64);

/// Identifier of a stock item (one quantity of a part at one location).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockItemId(u64);

macro_rules! impl_numeric_id {
    ($t:ty) => {
        impl $t {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

impl_numeric_id!(PartId);
impl_numeric_id!(StockItemId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_plain_number() {
        assert_eq!(PartId::new(42).to_string(), "42");
        assert_eq!(StockItemId::new(7).to_string(), "7");
    }

    #[test]
    fn serializes_transparently() {
        assert_eq!(serde_json::to_string(&PartId::new(3)).unwrap(), "3");
    }
}
