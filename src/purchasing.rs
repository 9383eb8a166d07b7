// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Hub Purchase Planner

//! Per-tick hub replenishment.
//!
//! For each class the planner compares projected hub stock (ledger balance
//! plus kits already maturing inside the horizon) against buffered forecast
//! demand and orders the shortfall, never past hub capacity. Orders that
//! cannot mature before the run ends are suppressed, as is everything while
//! the endgame override is on.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::engine::KitEngine;
use crate::forecast::{Forecaster, WindowStart};
use crate::processing::ProcessingJob;
use crate::types::*;

impl KitEngine {
    /// Decide the hub order for `tick` and enqueue one job per ordered class.
    pub fn decide_purchases(&mut self, tick: Tick) -> PerClass<u32> {
        let orders = PerClass::from_fn(|class| self.order_quantity(tick, class));

        for (class, &qty) in orders.iter().filter(|&(_, &q)| q > 0) {
            let lead_time = self.config.purchase[class].lead_time_hours;
            self.queue.enqueue(ProcessingJob {
                airport: self.config.hub.clone(),
                class,
                quantity: qty,
                ready: tick + lead_time,
                flight: None,
            });
            self.stats.kits_purchased[class] += qty as u64;
            debug!(%tick, %class, quantity = qty, ready = %(tick + lead_time), "hub order");
        }
        orders
    }

    fn order_quantity(&self, tick: Tick, class: ServiceClass) -> u32 {
        if self.endgame {
            return 0;
        }
        let hub = &self.config.hub;
        let tunables = self.config.purchase[class];
        let forecaster = Forecaster::new(&self.registry, &self.queue);

        let demand = forecaster.future_demand(hub, tick, tunables.horizon_hours, WindowStart::Inclusive)[class];
        let incoming = forecaster.incoming_supply(hub, tick, tunables.horizon_hours)[class];
        let projected = self.ledger.balance(hub, class).saturating_add(incoming as i64);
        let target = buffered_target(demand, tunables.buffer, tunables.extra_margin);
        if projected >= target {
            return 0;
        }

        let remaining = tick.hours_until(Tick::from_absolute(self.config.simulation_end_hours));
        if tunables.lead_time_hours >= remaining {
            return 0;
        }
        // Late low-value orders cannot arrive in time to matter.
        if class == ServiceClass::LOWEST_VALUE && remaining < self.config.low_value_cutoff_hours {
            return 0;
        }

        let shortfall = target - projected;
        let headroom = self.world.capacity(hub, class).unwrap_or(0) as i64 - projected;
        shortfall.min(headroom).clamp(0, u32::MAX as i64) as u32
    }
}

/// `floor(demand * (1 + buffer)) + extra`, computed in exact decimal.
pub(crate) fn buffered_target(demand: u64, buffer: Decimal, extra: u32) -> i64 {
    let scaled = (Decimal::from(demand) * (Decimal::ONE + buffer)).floor();
    scaled.to_i64().unwrap_or(i64::MAX).saturating_add(extra as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, EngineConfig};
    use crate::protocol::{FlightEventKind, FlightUpdate};
    use crate::world::{AircraftType, Airport, WorldReference};
    use rust_decimal_macros::dec;

    #[test]
    fn test_buffered_target_is_exact() {
        assert_eq!(buffered_target(50, dec!(0.1), 0), 55);
        assert_eq!(buffered_target(3, dec!(0.1), 0), 3);
        assert_eq!(buffered_target(10, dec!(0.1), 2), 13);
        assert_eq!(buffered_target(0, dec!(0.5), 7), 7);
    }

    fn engine(hub_stock: u32, hub_capacity: u32) -> KitEngine {
        let world = WorldReference::new(
            vec![
                Airport {
                    code: "HUB1".into(),
                    processing_time: PerClass::splat(2),
                    capacity: PerClass::splat(hub_capacity),
                    stock: PerClass::splat(hub_stock),
                },
                Airport {
                    code: "OUT1".into(),
                    processing_time: PerClass::splat(2),
                    capacity: PerClass::splat(1000),
                    stock: PerClass::default(),
                },
            ],
            vec![AircraftType { type_code: "B777".to_string(), kit_capacity: PerClass::splat(400) }],
        )
        .unwrap();
        let mut config = EngineConfig::default();
        for class in ServiceClass::ALL {
            config.purchase[class].buffer = dec!(0.1);
            config.purchase[class].extra_margin = 0;
        }
        KitEngine::new(world, config).unwrap()
    }

    fn hub_departure(id: &str, dep: Tick, pax: PerClass<u32>) -> FlightUpdate {
        FlightUpdate {
            event_type: FlightEventKind::Scheduled,
            flight_id: id.into(),
            flight_number: String::new(),
            origin_airport: "HUB1".to_string(),
            destination_airport: "OUT1".to_string(),
            aircraft_type: "B777".to_string(),
            departure: dep.into(),
            arrival: (dep + 8).into(),
            passengers: pax,
        }
    }

    #[test]
    fn test_no_order_when_projected_covers_target() {
        let mut eng = engine(100, 1000);
        eng.apply_update(&hub_departure("f1", Tick::new(0, 3), PerClass::splat(50)));
        assert!(eng.decide_purchases(Tick::new(0, 0)).is_zero());
        assert_eq!(eng.pending_jobs().count(), 0);
    }

    #[test]
    fn test_order_capped_by_hub_capacity() {
        let mut eng = engine(0, 40);
        eng.apply_update(&hub_departure("f1", Tick::new(0, 3), PerClass::splat(50)));
        let orders = eng.decide_purchases(Tick::new(0, 0));
        assert_eq!(orders, PerClass::splat(40));
    }

    #[test]
    fn test_incoming_supply_counts_toward_projection() {
        let mut eng = engine(0, 1000);
        eng.apply_update(&hub_departure("f1", Tick::new(0, 3), PerClass::new(0, 0, 0, 50)));
        let first = eng.decide_purchases(Tick::new(0, 0));
        assert_eq!(first.economy, 55);
        // Same forecast next hour: the pending order already covers it.
        assert_eq!(eng.decide_purchases(Tick::new(0, 1)).economy, 0);
    }

    #[test]
    fn test_orders_suppressed_near_end() {
        let mut eng = engine(0, 1000);
        let end = eng.config().simulation_end_hours;
        let lead_first = eng.config().purchase.first.lead_time_hours;
        let late = Tick::from_absolute(end - lead_first);
        eng.apply_update(&hub_departure("f1", late + 1, PerClass::splat(50)));
        assert_eq!(eng.decide_purchases(late).first, 0);
    }

    #[test]
    fn test_lowest_class_cutoff() {
        let mut eng = engine(0, 1000);
        for class in ServiceClass::ALL {
            eng.config.purchase[class].lead_time_hours = 1;
        }
        let end = eng.config().simulation_end_hours;
        let tick = Tick::from_absolute(end - 17);
        eng.apply_update(&hub_departure("f1", tick + 1, PerClass::splat(50)));
        let orders = eng.decide_purchases(tick);
        assert_eq!(orders.economy, 0);
        assert_eq!(orders.business, 55);
    }

    #[test]
    fn test_new_buffer_applies_to_next_tick() {
        let mut eng = engine(0, 1000);
        eng.apply_update(&hub_departure("f1", Tick::new(0, 3), PerClass::new(0, 0, 0, 50)));

        let mut tunables = eng.config().purchase;
        tunables.economy.buffer = dec!(0.5);
        tunables.economy.extra_margin = 3;
        eng.set_tunables(tunables).unwrap();

        assert_eq!(eng.decide_purchases(Tick::new(0, 0)).economy, 78);
    }

    #[test]
    fn test_invalid_tunables_rejected() {
        let mut eng = engine(0, 1000);
        let before = eng.config().purchase;
        let mut tunables = before;
        tunables.first.buffer = dec!(-0.2);

        assert!(matches!(
            eng.set_tunables(tunables),
            Err(ConfigError::NegativeBuffer { class: ServiceClass::First, .. })
        ));
        assert_eq!(eng.config().purchase, before);
    }

    #[test]
    fn test_endgame_override_stops_orders() {
        let mut eng = engine(0, 1000);
        eng.apply_update(&hub_departure("f1", Tick::new(0, 3), PerClass::splat(50)));
        eng.set_endgame(true);
        assert!(eng.decide_purchases(Tick::new(0, 0)).is_zero());
        assert_eq!(eng.pending_jobs().count(), 0);

        eng.set_endgame(false);
        assert_eq!(eng.decide_purchases(Tick::new(0, 1)).economy, 55);

        eng.set_endgame(true);
        eng.reset();
        assert!(!eng.endgame());
    }
}
