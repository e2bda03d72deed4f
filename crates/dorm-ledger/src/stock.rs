// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Warehouse stock ledger: live per-item quantities and derived aggregates.
//!
//! Aggregates (`total_units`, `zero_stock_count`, levels) are recomputed on
//! every read; nothing derived is cached on the ledger.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerError;
use crate::ident::ItemId;

/// Upper bound of the "low stock" band (inclusive).
pub const LOW_STOCK_MAX: u32 = 5;

/// A live warehouse record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    /// Unique item id.
    pub id: ItemId,
    /// Display name, also the join key for issued rows.
    pub name: String,
    /// Units currently on hand.
    pub quantity: u32,
}

/// Visual stock classification of a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// Nothing on hand.
    Empty,
    /// `1..=LOW_STOCK_MAX` units.
    Low,
    /// More than [`LOW_STOCK_MAX`] units.
    Normal,
}

impl StockLevel {
    /// Classify a quantity.
    pub fn of(quantity: u32) -> Self {
        match quantity {
            0 => Self::Empty,
            q if q <= LOW_STOCK_MAX => Self::Low,
            _ => Self::Normal,
        }
    }

    /// Badge text shown next to the item name, if any.
    pub fn badge(self) -> Option<&'static str> {
        match self {
            Self::Empty => Some("0 на складі"),
            Self::Low => Some("мало"),
            Self::Normal => None,
        }
    }
}

/// On-hand versus issued breakdown for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Allocation {
    /// Units owned (on hand + issued).
    pub total: u32,
    /// Units currently issued to residents.
    pub issued: u32,
}

impl Allocation {
    /// Units available for issuing; never negative.
    pub fn available(&self) -> u32 {
        self.total.saturating_sub(self.issued)
    }
}

/// Map caller input onto a stored quantity: negatives become zero, values
/// past `u32::MAX` are rejected.
pub(crate) fn clamp_quantity(value: i64) -> Result<u32, LedgerError> {
    u32::try_from(value.max(0)).map_err(|_| LedgerError::QuantityOutOfRange(value))
}

/// Live per-item stock, in seed order.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    items: Vec<StockItem>,
}

impl StockLedger {
    /// Build a ledger from explicit records.
    pub fn new(items: Vec<StockItem>) -> Self {
        Self { items }
    }

    /// Ledger populated with the fixed warehouse seed.
    pub fn seeded() -> Self {
        Self::new(crate::seed::stock_items())
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    /// Look up an item by id.
    pub fn get(&self, id: ItemId) -> Option<&StockItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Look up an item by exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&StockItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// Replace an item's quantity. Negative input is stored as zero; input
    /// above `u32::MAX` fails with `QuantityOutOfRange` and changes nothing.
    pub fn adjust_quantity(&mut self, id: ItemId, new_quantity: i64) -> Result<u32, LedgerError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(LedgerError::UnknownItem(id))?;
        let stored = clamp_quantity(new_quantity)?;
        debug!(item = %id, name = %item.name, from = item.quantity, to = stored, "stock adjusted");
        item.quantity = stored;
        Ok(stored)
    }

    /// Put returned units back on hand (returns the new quantity).
    pub fn credit(&mut self, name: &str, units: u32) -> Result<u32, LedgerError> {
        let item = self.by_name_mut(name)?;
        let wanted = i64::from(item.quantity) + i64::from(units);
        item.quantity = u32::try_from(wanted).map_err(|_| LedgerError::QuantityOutOfRange(wanted))?;
        Ok(item.quantity)
    }

    /// Take units off hand for issuing. Fails without change when fewer than
    /// `units` are on hand.
    pub fn debit(&mut self, name: &str, units: u32) -> Result<u32, LedgerError> {
        let item = self.by_name_mut(name)?;
        if item.quantity < units {
            return Err(LedgerError::InsufficientStock {
                item: item.name.clone(),
                available: item.quantity,
                requested: units,
            });
        }
        item.quantity -= units;
        Ok(item.quantity)
    }

    fn by_name_mut(&mut self, name: &str) -> Result<&mut StockItem, LedgerError> {
        self.items
            .iter_mut()
            .find(|i| i.name == name)
            .ok_or_else(|| LedgerError::UnknownItemName(name.to_owned()))
    }

    /// Sum of all quantities.
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Number of items with exactly zero units.
    pub fn zero_stock_count(&self) -> usize {
        self.items.iter().filter(|i| i.quantity == 0).count()
    }

    /// Level of a single item.
    pub fn level(&self, id: ItemId) -> Option<StockLevel> {
        self.get(id).map(|i| StockLevel::of(i.quantity))
    }

    /// Per-item allocation given `(item name, units)` pairs currently issued.
    /// Issued names that the ledger does not know are ignored.
    pub fn allocations<'a, I>(&self, issued: I) -> Vec<(&str, Allocation)>
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut out: Vec<(&str, Allocation)> = self
            .items
            .iter()
            .map(|i| {
                (
                    i.name.as_str(),
                    Allocation {
                        total: i.quantity,
                        issued: 0,
                    },
                )
            })
            .collect();
        for (name, units) in issued {
            if let Some((_, alloc)) = out.iter_mut().find(|(n, _)| *n == name) {
                alloc.issued = alloc.issued.saturating_add(units);
                alloc.total = alloc.total.saturating_add(units);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mattress_only() -> StockLedger {
        StockLedger::new(vec![StockItem {
            id: ItemId(1),
            name: "Матрац".into(),
            quantity: 95,
        }])
    }

    #[test]
    fn negative_adjustment_clamps_to_zero() {
        let mut ledger = mattress_only();
        assert_eq!(ledger.adjust_quantity(ItemId(1), -5), Ok(0));
        assert_eq!(ledger.get(ItemId(1)).map(|i| i.quantity), Some(0));
        assert_eq!(ledger.zero_stock_count(), 1);
    }

    #[test]
    fn unknown_item_is_an_error() {
        let mut ledger = mattress_only();
        assert_eq!(
            ledger.adjust_quantity(ItemId(42), 3),
            Err(LedgerError::UnknownItem(ItemId(42)))
        );
    }

    #[test]
    fn levels_follow_thresholds() {
        assert_eq!(StockLevel::of(0), StockLevel::Empty);
        assert_eq!(StockLevel::of(1), StockLevel::Low);
        assert_eq!(StockLevel::of(5), StockLevel::Low);
        assert_eq!(StockLevel::of(6), StockLevel::Normal);
        assert_eq!(StockLevel::Low.badge(), Some("мало"));
    }

    #[test]
    fn credit_and_debit_by_name() {
        let mut ledger = mattress_only();
        assert_eq!(ledger.credit("Матрац", 5), Ok(100));
        assert_eq!(ledger.debit("Матрац", 30), Ok(70));
        assert_eq!(
            ledger.debit("Матрац", 500),
            Err(LedgerError::InsufficientStock {
                item: "Матрац".into(),
                available: 70,
                requested: 500,
            })
        );
        assert_eq!(ledger.get(ItemId(1)).map(|i| i.quantity), Some(70));
        assert!(matches!(
            ledger.credit("Шафа", 1),
            Err(LedgerError::UnknownItemName(_))
        ));
    }

    #[test]
    fn allocations_add_issued_units() {
        let ledger = StockLedger::seeded();
        let allocs = ledger.allocations([("Рушник", 2), ("Рушник", 1), ("Невідоме", 9)]);
        let (_, towel) = allocs.iter().find(|(n, _)| *n == "Рушник").copied().unwrap();
        assert_eq!(towel.issued, 3);
        assert_eq!(towel.total, 183);
        assert_eq!(towel.available(), 180);
        assert_eq!(allocs.len(), ledger.items().len());
    }

    #[test]
    fn out_of_range_input_is_rejected() {
        let mut ledger = mattress_only();
        assert_eq!(
            ledger.adjust_quantity(ItemId(1), 5_000_000_000),
            Err(LedgerError::QuantityOutOfRange(5_000_000_000))
        );
        assert_eq!(ledger.get(ItemId(1)).map(|i| i.quantity), Some(95));
        assert_eq!(
            ledger.adjust_quantity(ItemId(1), i64::from(u32::MAX)),
            Ok(u32::MAX)
        );
        assert_eq!(clamp_quantity(i64::MIN), Ok(0));
        assert!(ledger.credit("Матрац", 1).is_err());
    }

    #[test]
    fn items_serialize_with_plain_ids() {
        let item = StockItem {
            id: ItemId(3),
            name: "Ковдра".into(),
            quantity: 4,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "name": "Ковдра", "quantity": 4}));
        assert_eq!(serde_json::to_value(StockLevel::Low).unwrap(), "low");
    }
}
