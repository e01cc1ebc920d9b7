//! The local entity being reconciled.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::sku::Sku;

/// A SKU together with its locally authoritative quantity.
///
/// Derived on demand from a notification; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSubject {
    sku: Sku,
    authoritative_quantity: f64,
}

impl SyncSubject {
    /// Build a subject. The quantity must be finite and non-negative.
    pub fn new(sku: Sku, authoritative_quantity: f64) -> Result<Self, DomainError> {
        if !authoritative_quantity.is_finite() || authoritative_quantity < 0.0 {
            return Err(DomainError::validation(format!(
                "authoritative quantity must be a non-negative number, got {authoritative_quantity}"
            )));
        }
        Ok(Self {
            sku,
            authoritative_quantity,
        })
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn authoritative_quantity(&self) -> f64 {
        self.authoritative_quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_fractional_quantities() {
        let subject = SyncSubject::new(Sku::new("BOLT-M3").unwrap(), 12.5).unwrap();
        assert_eq!(subject.sku().as_str(), "BOLT-M3");
        assert_eq!(subject.authoritative_quantity(), 12.5);
    }

    #[test]
    fn rejects_negative_and_nan() {
        let sku = Sku::new("BOLT-M3").unwrap();
        assert!(SyncSubject::new(sku.clone(), -1.0).is_err());
        assert!(SyncSubject::new(sku, f64::NAN).is_err());
    }
}
