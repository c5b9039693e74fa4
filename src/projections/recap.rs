// Copyright 2025 Cowboy AI, LLC.

//! Pricing recap projection

use crate::catalog::{Catalog, Category};
use crate::entity::PairId;
use crate::pair::Pair;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One priced service on a pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog id
    pub service_id: i64,
    /// Service name
    pub name: String,
    /// Catalog price
    pub price: Decimal,
}

/// Priced view of one pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRecap {
    /// Pair identity
    pub pair_id: PairId,
    /// Pair category
    pub category: Option<Category>,
    /// Services found in the catalog, in selection order
    pub line_items: Vec<LineItem>,
    /// Sum of the line item prices
    pub subtotal: Decimal,
    /// Customer note, when one was given
    pub note: Option<String>,
}

/// Priced view of the whole order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recap {
    /// One entry per pair, in pair order
    pub per_pair: Vec<PairRecap>,
    /// Sum of the subtotals
    pub total: Decimal,
}

/// Price one pair; ids missing from the catalog are skipped
pub fn project_pair(pair: &Pair, catalog: &Catalog) -> PairRecap {
    let line_items: Vec<LineItem> = pair
        .selected_services()
        .iter()
        .filter_map(|id| catalog.lookup(*id))
        .map(|service| LineItem {
            service_id: service.id,
            name: service.name.clone(),
            price: service.price,
        })
        .collect();
    let subtotal = line_items.iter().map(|item| item.price).sum();

    PairRecap {
        pair_id: pair.id(),
        category: pair.category(),
        line_items,
        subtotal,
        note: Some(pair.note().to_string()).filter(|n| !n.is_empty()),
    }
}

/// Price every pair and total the order
pub fn project(pairs: &[Pair], catalog: &Catalog) -> Recap {
    let per_pair: Vec<PairRecap> = pairs.iter().map(|p| project_pair(p, catalog)).collect();
    let total = per_pair.iter().map(|p| p.subtotal).sum();
    Recap { per_pair, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Service;
    use crate::pair::PhotoRef;

    fn service(id: i64, cents: i64, category: Category) -> Service {
        Service {
            id,
            name: format!("service {id}"),
            description: None,
            price: Decimal::new(cents, 2),
            category,
            requires_note: false,
        }
    }

    #[test]
    fn test_subtotal_and_total() {
        let catalog = Catalog::from_services(vec![
            service(1, 1000, Category::Women),
            service(2, 1500, Category::Women),
            service(3, 2200, Category::Men),
        ]);

        let mut first = Pair::new();
        first.set_category(Category::Women).unwrap();
        first.toggle_service(1, &catalog).unwrap();
        first.toggle_service(2, &catalog).unwrap();
        first
            .set_photo(PhotoRef {
                url: "u".into(),
                filename: "f".into(),
            })
            .unwrap();

        let mut second = Pair::new();
        second.set_category(Category::Men).unwrap();
        second.toggle_service(3, &catalog).unwrap();

        let recap = project(&[first.clone(), second.clone()], &catalog);
        assert_eq!(recap.per_pair.len(), 2);
        assert_eq!(recap.per_pair[0].pair_id, first.id());
        assert_eq!(recap.per_pair[0].subtotal, Decimal::new(2500, 2));
        assert_eq!(recap.per_pair[1].pair_id, second.id());
        assert_eq!(recap.total, Decimal::new(4700, 2));
    }

    #[test]
    fn test_stale_ids_contribute_nothing() {
        let full = Catalog::from_services(vec![
            service(1, 1000, Category::Men),
            service(2, 500, Category::Men),
        ]);
        let mut pair = Pair::new();
        pair.set_category(Category::Men).unwrap();
        pair.toggle_service(1, &full).unwrap();
        pair.toggle_service(2, &full).unwrap();

        // service 2 was withdrawn since the draft was saved
        let shrunk = Catalog::from_services(vec![service(1, 1000, Category::Men)]);
        let recap = project(std::slice::from_ref(&pair), &shrunk);
        assert_eq!(recap.per_pair[0].line_items.len(), 1);
        assert_eq!(recap.total, Decimal::new(1000, 2));
    }

    #[test]
    fn test_empty_order_totals_zero() {
        let recap = project(&[], &Catalog::default());
        assert!(recap.per_pair.is_empty());
        assert_eq!(recap.total, Decimal::ZERO);
    }
}
