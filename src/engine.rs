// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Engine Core
//
// Owns every piece of mutable state (registry, ledger, processing queue) and
// the static world it mirrors. One instance per run; one tick at a time.

use tracing::{debug, info, warn};

use crate::config::{ConfigError, EngineConfig, PurchaseTunables};
use crate::ledger::InventoryLedger;
use crate::processing::{ProcessingJob, ProcessingQueue};
use crate::protocol::{FlightEventKind, FlightUpdate, RoundResponse};
use crate::registry::{FlightRegistry, Recorded};
use crate::types::*;
use crate::world::{WorldError, WorldReference};

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ─── KitEngine ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct KitEngine {
    pub(crate) world: WorldReference,
    pub(crate) config: EngineConfig,
    pub(crate) registry: FlightRegistry,
    pub(crate) ledger: InventoryLedger,
    pub(crate) queue: ProcessingQueue,
    pub(crate) stats: EngineStats,
    /// Stop all hub purchasing as if the run were over.
    pub(crate) endgame: bool,
}

impl KitEngine {
    pub fn new(world: WorldReference, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        world.require_hub(&config.hub)?;
        let ledger = InventoryLedger::seeded(&world);
        info!(
            hub = %config.hub,
            airports = world.airports().count(),
            end = config.simulation_end_hours,
            "kit engine ready"
        );
        Ok(Self {
            world,
            config,
            registry: FlightRegistry::new(),
            ledger,
            queue: ProcessingQueue::new(),
            stats: EngineStats::default(),
            endgame: false,
        })
    }

    /// Decide loads, then purchases, for one tick.
    pub fn play_tick(&mut self, tick: Tick) -> TickDecision {
        let loads = self.decide_kit_loads(tick);
        let purchases = self.decide_purchases(tick);
        self.stats.ticks_played += 1;
        info!(
            %tick,
            flights = loads.len(),
            purchased = purchases.total(),
            pending_jobs = self.queue.len(),
            "tick decided"
        );
        TickDecision { tick, loads, purchases }
    }

    /// Feed one round response into the registry.
    pub fn update_state(&mut self, response: &RoundResponse) {
        for update in &response.flight_updates {
            self.apply_update(update);
        }
        if !response.penalties.is_empty() {
            debug!(count = response.penalties.len(), "round reported penalties");
        }
    }

    pub fn apply_update(&mut self, update: &FlightUpdate) {
        match update.event_type {
            FlightEventKind::Scheduled | FlightEventKind::CheckedIn => self.on_announced(update),
            FlightEventKind::Landed => self.on_landed(update),
            FlightEventKind::Unknown => {
                debug!(flight = %update.flight_id, "ignoring unknown flight event");
            }
        }
    }

    fn on_announced(&mut self, update: &FlightUpdate) {
        let recorded = self.registry.record(update.to_event());
        self.follow_arrival(&update.flight_id, recorded);
    }

    fn on_landed(&mut self, update: &FlightUpdate) {
        let recorded = self.registry.land(&update.to_event());
        self.follow_arrival(&update.flight_id, recorded);
    }

    fn follow_arrival(&mut self, flight: &FlightId, recorded: Recorded) {
        if recorded.diverted {
            warn!(%flight, "destination changed; queued kits keep their original airport");
        }
        if let Some(arrival) = recorded.arrival_moved {
            let world = &self.world;
            let margin = self.config.safety_margin_hours;
            let moved = self.queue.reschedule(flight, arrival, |airport, class| {
                world.processing_time(airport, class).unwrap_or(0) + margin
            });
            if moved > 0 {
                debug!(%flight, %arrival, jobs = moved, "rescheduled returning kits");
            }
        }
    }

    /// Processing job for kits coming off `flight` at its destination.
    pub(crate) fn return_job(&self, flight: &FlightEvent, class: ServiceClass, quantity: u32) -> ProcessingJob {
        let processing = self.world.processing_time(&flight.destination, class).unwrap_or(0);
        ProcessingJob {
            airport: flight.destination.clone(),
            class,
            quantity,
            ready: flight.arrival + processing + self.config.safety_margin_hours,
            flight: Some(flight.id.clone()),
        }
    }

    // ─── Tuning ──────────────────────────────────────────────────────────

    /// Swap the per-class purchase tunables between ticks. A set that fails
    /// validation is rejected and the current one stays in force.
    pub fn set_tunables(&mut self, purchase: PerClass<PurchaseTunables>) -> Result<(), ConfigError> {
        let candidate = EngineConfig { purchase, ..self.config.clone() };
        candidate.validate()?;
        self.config = candidate;
        info!(
            first = %self.config.purchase.first.buffer,
            economy = %self.config.purchase.economy.buffer,
            "purchase tunables replaced"
        );
        Ok(())
    }

    pub fn set_endgame(&mut self, on: bool) {
        if self.endgame != on {
            info!(endgame = on, "hub purchasing override changed");
        }
        self.endgame = on;
    }

    pub fn endgame(&self) -> bool {
        self.endgame
    }

    // ─── Inspection ──────────────────────────────────────────────────────

    pub fn stock(&self, airport: &AirportCode, class: ServiceClass) -> i64 {
        self.ledger.balance(airport, class)
    }

    /// Every class balance at one airport; zeros for unknown airports.
    pub fn stock_at(&self, airport: &AirportCode) -> PerClass<i64> {
        self.ledger.airport_balances(airport)
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &WorldReference {
        &self.world
    }

    pub fn pending_jobs(&self) -> impl Iterator<Item = &ProcessingJob> {
        self.queue.iter()
    }

    pub fn known_flights(&self) -> usize {
        self.registry.len()
    }

    pub fn flight(&self, id: &FlightId) -> Option<&FlightEvent> {
        self.registry.get(id)
    }

    /// Reseed the ledger from static stock and forget all dynamic state.
    pub fn reset(&mut self) {
        self.ledger.reseed(&self.world);
        self.registry.clear();
        self.queue.clear();
        self.stats = EngineStats::default();
        self.endgame = false;
        info!("kit engine reset");
    }
}
