//! Notification kinds relevant to stock synchronisation.

/// Every notification kind that can change a part's aggregate stock.
///
/// Kinds outside this set are ignored before any lookup or network work.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StockEventKind {
    /// Generic model event: a stock item row was created.
    ItemCreated,
    /// Generic model event: a stock item row was saved.
    ItemSaved,
    /// Generic model event: a stock item row was deleted.
    ItemDeleted,
    QuantityUpdated,
    AssignedToCustomer,
    ReturnedFromCustomer,
    Split,
    Moved,
    Counted,
}

impl StockEventKind {
    pub const ALL: [StockEventKind; 9] = [
        StockEventKind::ItemCreated,
        StockEventKind::ItemSaved,
        StockEventKind::ItemDeleted,
        StockEventKind::QuantityUpdated,
        StockEventKind::AssignedToCustomer,
        StockEventKind::ReturnedFromCustomer,
        StockEventKind::Split,
        StockEventKind::Moved,
        StockEventKind::Counted,
    ];

    /// Wire name used by the host event system.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockEventKind::ItemCreated => "stock_stockitem.created",
            StockEventKind::ItemSaved => "stock_stockitem.saved",
            StockEventKind::ItemDeleted => "stock_stockitem.deleted",
            StockEventKind::QuantityUpdated => "stockitem.quantityupdated",
            StockEventKind::AssignedToCustomer => "stockitem.assignedtocustomer",
            StockEventKind::ReturnedFromCustomer => "stockitem.returnedfromcustomer",
            StockEventKind::Split => "stockitem.split",
            StockEventKind::Moved => "stockitem.moved",
            StockEventKind::Counted => "stockitem.counted",
        }
    }

    /// Map a wire name onto a relevant kind. Pure string match, no allocation.
    pub fn parse(kind: &str) -> Option<Self> {
        let parsed = match kind {
            "stock_stockitem.created" => StockEventKind::ItemCreated,
            "stock_stockitem.saved" => StockEventKind::ItemSaved,
            "stock_stockitem.deleted" => StockEventKind::ItemDeleted,
            "stockitem.quantityupdated" => StockEventKind::QuantityUpdated,
            "stockitem.assignedtocustomer" => StockEventKind::AssignedToCustomer,
            "stockitem.returnedfromcustomer" => StockEventKind::ReturnedFromCustomer,
            "stockitem.split" => StockEventKind::Split,
            "stockitem.moved" => StockEventKind::Moved,
            "stockitem.counted" => StockEventKind::Counted,
            _ => return None,
        };
        Some(parsed)
    }

    pub fn is_relevant(kind: &str) -> bool {
        Self::parse(kind).is_some()
    }

    /// Deletions cannot be re-resolved through the stock item; the payload
    /// has to name the owning part directly.
    pub fn is_deletion(&self) -> bool {
        matches!(self, StockEventKind::ItemDeleted)
    }
}

impl core::fmt::Display for StockEventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for kind in StockEventKind::ALL {
            assert_eq!(StockEventKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn unrelated_kinds_are_not_relevant() {
        assert!(!StockEventKind::is_relevant("part_part.saved"));
        assert!(!StockEventKind::is_relevant("stockitem.QUANTITYUPDATED"));
        assert!(!StockEventKind::is_relevant(""));
        assert!(StockEventKind::is_relevant("stockitem.counted"));
    }

    #[test]
    fn only_deleted_is_a_deletion() {
        let deletions: Vec<_> = StockEventKind::ALL.iter().filter(|k| k.is_deletion()).collect();
        assert_eq!(deletions, vec![&StockEventKind::ItemDeleted]);
    }
}
