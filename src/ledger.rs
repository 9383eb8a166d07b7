// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Inventory Ledger

use std::collections::HashMap;

use crate::types::{AirportCode, PerClass, ServiceClass};
use crate::world::WorldReference;

/// Approximate kit stock per airport per class.
///
/// Only advanced by the engine's own accounting: seeded from static stock,
/// debited on load, credited when processing jobs mature. Balances may go
/// negative; callers keep them in range by bounding what they consume.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    balances: HashMap<AirportCode, PerClass<i64>>,
}

impl InventoryLedger {
    pub fn seeded(world: &WorldReference) -> Self {
        let mut ledger = Self::default();
        ledger.reseed(world);
        ledger
    }

    /// Replace every balance with the world's initial stock.
    pub fn reseed(&mut self, world: &WorldReference) {
        self.balances = world
            .airports()
            .map(|a| (a.code.clone(), a.stock.map(|_, &q| q as i64)))
            .collect();
    }

    /// Zero for airports the ledger has never seen.
    pub fn balance(&self, airport: &AirportCode, class: ServiceClass) -> i64 {
        self.balances.get(airport).map_or(0, |b| b[class])
    }

    /// Non-negative view of [`balance`](Self::balance).
    pub fn available(&self, airport: &AirportCode, class: ServiceClass) -> u32 {
        self.balance(airport, class).clamp(0, u32::MAX as i64) as u32
    }

    pub fn consume(&mut self, airport: &AirportCode, class: ServiceClass, qty: u32) {
        self.balances.entry(airport.clone()).or_default()[class] -= qty as i64;
    }

    pub fn credit(&mut self, airport: &AirportCode, class: ServiceClass, qty: u32) {
        self.balances.entry(airport.clone()).or_default()[class] += qty as i64;
    }

    pub fn airport_balances(&self, airport: &AirportCode) -> PerClass<i64> {
        self.balances.get(airport).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Airport;

    fn world() -> WorldReference {
        WorldReference::new(
            vec![Airport {
                code: "HUB1".into(),
                processing_time: PerClass::splat(2),
                capacity: PerClass::splat(100),
                stock: PerClass::new(10, 20, 30, 40),
            }],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_seed_and_mutate() {
        let hub = AirportCode::from("HUB1");
        let mut ledger = InventoryLedger::seeded(&world());
        assert_eq!(ledger.balance(&hub, ServiceClass::Business), 20);
        ledger.consume(&hub, ServiceClass::Business, 5);
        ledger.credit(&hub, ServiceClass::Business, 2);
        assert_eq!(ledger.balance(&hub, ServiceClass::Business), 17);
    }

    #[test]
    fn test_negative_balance_tolerated() {
        let hub = AirportCode::from("HUB1");
        let mut ledger = InventoryLedger::seeded(&world());
        ledger.consume(&hub, ServiceClass::First, 15);
        assert_eq!(ledger.balance(&hub, ServiceClass::First), -5);
        assert_eq!(ledger.available(&hub, ServiceClass::First), 0);
    }

    #[test]
    fn test_reseed_restores_static_stock() {
        let w = world();
        let hub = AirportCode::from("HUB1");
        let mut ledger = InventoryLedger::seeded(&w);
        ledger.consume(&hub, ServiceClass::Economy, 40);
        ledger.credit(&"OUT9".into(), ServiceClass::Economy, 3);
        ledger.reseed(&w);
        assert_eq!(ledger.airport_balances(&hub), PerClass::new(10, 20, 30, 40));
        assert_eq!(ledger.balance(&"OUT9".into(), ServiceClass::Economy), 0);
    }
}
