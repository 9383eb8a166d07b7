// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Allocation
//
// Per-tick kit loads for departing flights. Flights are served in calendar
// order and each deduction is visible to the next flight, so the first
// recorded flight has first claim on shared stock.

use tracing::{debug, warn};

use crate::engine::KitEngine;
use crate::forecast::{Forecaster, WindowStart};
use crate::types::*;

impl KitEngine {
    /// Release matured jobs, then load every flight departing at `tick`.
    ///
    /// Returns one record per departing flight, including all-zero records
    /// for flights that could not be served.
    pub fn decide_kit_loads(&mut self, tick: Tick) -> Vec<FlightLoad> {
        let released = self.queue.release_matured(tick, &mut self.ledger);
        self.stats.jobs_released += released.len() as u64;

        let departing: Vec<FlightId> = self.registry.events_departing(tick).to_vec();
        let mut loads = Vec::with_capacity(departing.len());
        for id in departing {
            let load = match self.registry.get(&id).cloned() {
                Some(flight) => self.load_flight(&flight),
                None => FlightLoad::empty(id),
            };
            loads.push(load);
        }

        self.registry.clear_departed(tick);
        self.stats.flights_allocated += loads.len() as u32;
        loads
    }

    fn load_flight(&mut self, flight: &FlightEvent) -> FlightLoad {
        let Some(kit_capacity) = self.world.aircraft(&flight.aircraft_type).map(|a| a.kit_capacity) else {
            warn!(flight = %flight.id, aircraft = %flight.aircraft_type, "unknown aircraft type, loading nothing");
            self.stats.unknown_aircraft += 1;
            return FlightLoad::empty(flight.id.clone());
        };
        let (Some(_), Some(dest)) = (
            self.world.airport(&flight.origin),
            self.world.airport(&flight.destination),
        ) else {
            warn!(
                flight = %flight.id,
                origin = %flight.origin,
                destination = %flight.destination,
                "unknown airport, loading nothing"
            );
            return FlightLoad::empty(flight.id.clone());
        };
        let dest_capacity = dest.capacity;

        let kits = if flight.origin == self.config.hub {
            self.hub_quantities(flight, &kit_capacity, &dest_capacity)
        } else {
            self.outstation_quantities(flight, &kit_capacity)
        };

        for (class, &qty) in kits.iter().filter(|&(_, &q)| q > 0) {
            let job = self.return_job(flight, class, qty);
            self.queue.enqueue(job);
            self.stats.kits_loaded[class] += qty as u64;
        }

        debug!(
            flight = %flight.id,
            origin = %flight.origin,
            destination = %flight.destination,
            first = kits.first,
            business = kits.business,
            premium_economy = kits.premium_economy,
            economy = kits.economy,
            "loaded kits"
        );
        FlightLoad { flight_id: flight.id.clone(), loaded_kits: kits }
    }

    /// Hub departures may carry a forward buffer for the destination's next
    /// departures, bounded by destination headroom and current passengers.
    fn hub_quantities(
        &mut self,
        flight: &FlightEvent,
        kit_capacity: &PerClass<u32>,
        dest_capacity: &PerClass<u32>,
    ) -> PerClass<u32> {
        let forecast_need = Forecaster::new(&self.registry, &self.queue).future_demand(
            &flight.destination,
            flight.arrival,
            self.config.lookahead_hours,
            WindowStart::Exclusive,
        );

        let mut kits = PerClass::default();
        for class in ServiceClass::ALL {
            let pax = flight.passengers[class] as i64;
            let cap = kit_capacity[class] as i64;
            let stock = self.ledger.balance(&flight.origin, class).max(0);
            let dest_stock = self.ledger.balance(&flight.destination, class);
            let dest_headroom = (dest_capacity[class] as i64 - dest_stock).max(0);
            let required = pax + (forecast_need[class] as i64 - dest_stock).max(0);

            let qty = clamp_u32(cap.min(stock).min(dest_headroom).min(required).min(pax));
            if qty > 0 {
                self.ledger.consume(&flight.origin, class, qty);
            }
            kits[class] = qty;
        }
        kits
    }

    /// Outstations load strictly for the passengers on board.
    fn outstation_quantities(&mut self, flight: &FlightEvent, kit_capacity: &PerClass<u32>) -> PerClass<u32> {
        let mut kits = PerClass::default();
        for class in ServiceClass::ALL {
            let stock = self.ledger.available(&flight.origin, class);
            let qty = flight.passengers[class].min(kit_capacity[class]).min(stock);
            if qty > 0 {
                self.ledger.consume(&flight.origin, class, qty);
            }
            kits[class] = qty;
        }
        kits
    }
}

fn clamp_u32(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}
