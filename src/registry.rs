// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Flight Registry
//
// Latest known state of every flight, keyed by identifier, plus an ordered
// departure calendar. Calendar order is first-recorded order and decides
// which flight gets first claim on shared stock within a tick.

use std::collections::{BTreeMap, HashMap};

use crate::types::{FlightEvent, FlightId, Tick};

/// What changed when an event was applied to an already known flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recorded {
    /// New arrival tick when it moved and the destination did not.
    pub arrival_moved: Option<Tick>,
    /// Destination differs from the previously known one.
    pub diverted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FlightRegistry {
    flights: HashMap<FlightId, FlightEvent>,
    departures: BTreeMap<Tick, Vec<FlightId>>,
    cleared_through: Option<Tick>,
}

impl FlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a schedule or check-in event. Later events supersede earlier ones.
    pub fn record(&mut self, event: FlightEvent) -> Recorded {
        let recorded = self.compare_with_known(&event);
        if let Some(prev_departure) = self.flights.get(&event.id).map(|f| f.departure) {
            if prev_departure != event.departure {
                self.unindex(&event.id, prev_departure);
            }
        }
        self.index(&event.id, event.departure);
        self.flights.insert(event.id.clone(), event);
        recorded
    }

    /// Apply a landing: report any arrival change, then forget the flight.
    pub fn land(&mut self, event: &FlightEvent) -> Recorded {
        let recorded = self.compare_with_known(event);
        if let Some(prev) = self.flights.remove(&event.id) {
            self.unindex(&prev.id, prev.departure);
        }
        recorded
    }

    pub fn get(&self, id: &FlightId) -> Option<&FlightEvent> {
        self.flights.get(id)
    }

    pub fn flights(&self) -> impl Iterator<Item = &FlightEvent> {
        self.flights.values()
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Identifiers departing at `tick`, in first-recorded order.
    pub fn events_departing(&self, tick: Tick) -> &[FlightId] {
        self.departures.get(&tick).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop the calendar entry for a processed tick. Flights stay known.
    pub fn clear_departed(&mut self, tick: Tick) {
        self.departures.remove(&tick);
        self.cleared_through = Some(self.cleared_through.map_or(tick, |c| c.max(tick)));
    }

    pub fn clear(&mut self) {
        self.flights.clear();
        self.departures.clear();
        self.cleared_through = None;
    }

    fn compare_with_known(&self, event: &FlightEvent) -> Recorded {
        match self.flights.get(&event.id) {
            Some(prev) if prev.destination != event.destination => Recorded {
                arrival_moved: None,
                diverted: true,
            },
            Some(prev) if prev.arrival != event.arrival => Recorded {
                arrival_moved: Some(event.arrival),
                diverted: false,
            },
            _ => Recorded::default(),
        }
    }

    fn index(&mut self, id: &FlightId, tick: Tick) {
        // Already allocated ticks never run again.
        if self.cleared_through.is_some_and(|c| tick <= c) {
            return;
        }
        let ids = self.departures.entry(tick).or_default();
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }

    fn unindex(&mut self, id: &FlightId, tick: Tick) {
        if let Some(ids) = self.departures.get_mut(&tick) {
            ids.retain(|x| x != id);
            if ids.is_empty() {
                self.departures.remove(&tick);
            }
        }
    }
}
