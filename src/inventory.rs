use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::error::PetError;
use crate::model::ItemKind;

/// Item id to quantity. Keys with zero quantity are never stored.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<String, u32>);

impl Inventory {
    pub fn add_item(&mut self, catalog: &Catalog, id: &str, qty: u32) -> Result<(), PetError> {
        if catalog.item(id).is_none() {
            return Err(PetError::UnknownItem(id.to_string()));
        }
        if qty == 0 {
            return Ok(());
        }
        let slot = self.0.entry(id.to_string()).or_insert(0);
        *slot = slot.saturating_add(qty);
        Ok(())
    }

    /// Removes up to `qty` and returns how many were actually taken.
    pub fn remove_item(&mut self, id: &str, qty: u32) -> u32 {
        let Some(have) = self.0.get_mut(id) else {
            return 0;
        };
        let taken = qty.min(*have);
        *have -= taken;
        if *have == 0 {
            self.0.remove(id);
        }
        taken
    }

    pub fn quantity(&self, id: &str) -> u32 {
        self.0.get(id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// First held item of `kind`, in id order.
    pub fn first_of_kind(&self, catalog: &Catalog, kind: ItemKind) -> Option<&str> {
        self.0
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .find(|(id, _)| catalog.item(id).is_some_and(|item| item.kind == kind))
            .map(|(id, _)| id.as_str())
    }

    /// Drops zero quantities and ids the catalog no longer knows.
    pub fn sanitize(&mut self, catalog: &Catalog) {
        self.0.retain(|id, qty| *qty > 0 && catalog.item(id).is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_unknown_ids() {
        let c = Catalog::standard();
        let mut inv = Inventory::default();
        assert_eq!(
            inv.add_item(&c, "rocket", 1),
            Err(PetError::UnknownItem("rocket".into()))
        );
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_clamps_and_deletes_empty_keys() {
        let c = Catalog::standard();
        let mut inv = Inventory::default();
        inv.add_item(&c, "soap", 2).unwrap();
        assert_eq!(inv.remove_item("soap", 5), 2);
        assert_eq!(inv.quantity("soap"), 0);
        assert!(inv.is_empty());
        assert_eq!(inv.remove_item("soap", 1), 0);
    }

    #[test]
    fn first_of_kind_uses_id_order() {
        let c = Catalog::standard();
        let mut inv = Inventory::default();
        inv.add_item(&c, "tasty_snack", 1).unwrap();
        inv.add_item(&c, "basic_food", 1).unwrap();
        inv.add_item(&c, "ball", 1).unwrap();
        assert_eq!(inv.first_of_kind(&c, ItemKind::Food), Some("basic_food"));
        assert_eq!(inv.first_of_kind(&c, ItemKind::CleaningSupply), None);
    }

    #[test]
    fn sanitize_drops_stale_entries() {
        let c = Catalog::standard();
        let mut inv: Inventory =
            serde_json::from_str(r#"{"ball":1,"ghost":3,"soap":0}"#).unwrap();
        inv.sanitize(&c);
        assert_eq!(inv.iter().collect::<Vec<_>>(), vec![("ball", 1)]);
    }
}
