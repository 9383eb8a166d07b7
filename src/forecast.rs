// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Demand Forecaster

use crate::processing::ProcessingQueue;
use crate::registry::FlightRegistry;
use crate::types::{AirportCode, PerClass, Tick};

/// How the start of a forecast window is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStart {
    /// `(start, start + hours]`: anchored at an arrival instant.
    Exclusive,
    /// `[start, start + hours]`: anchored at "now".
    Inclusive,
}

/// Read-only queries over known flights and pending processing jobs.
#[derive(Clone, Copy)]
pub struct Forecaster<'a> {
    registry: &'a FlightRegistry,
    queue: &'a ProcessingQueue,
}

impl<'a> Forecaster<'a> {
    pub fn new(registry: &'a FlightRegistry, queue: &'a ProcessingQueue) -> Self {
        Self { registry, queue }
    }

    /// Passengers per class on known flights departing `airport` inside the window.
    pub fn future_demand(
        &self,
        airport: &AirportCode,
        start: Tick,
        hours: u32,
        bound: WindowStart,
    ) -> PerClass<u64> {
        let end = start + hours;
        let mut demand = PerClass::<u64>::default();
        let in_window = |t: Tick| match bound {
            WindowStart::Exclusive => t > start && t <= end,
            WindowStart::Inclusive => t >= start && t <= end,
        };
        for flight in self.registry.flights() {
            if &flight.origin == airport && in_window(flight.departure) {
                for (class, &pax) in flight.passengers.iter() {
                    demand[class] += pax as u64;
                }
            }
        }
        demand
    }

    /// Kits maturing at `airport` with ready tick in `[start, start + hours]`.
    pub fn incoming_supply(&self, airport: &AirportCode, start: Tick, hours: u32) -> PerClass<u64> {
        self.queue.incoming(airport, start, start + hours)
    }
}
