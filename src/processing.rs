// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Processing Queue
//
// Kits the ledger does not own yet: used kits being turned around after a
// flight lands, and hub purchases still inside their lead time. Ordered by
// ready tick so maturity checks and window sums only touch the range they need.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ledger::InventoryLedger;
use crate::types::{AirportCode, FlightId, PerClass, ServiceClass, Tick};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingJob {
    pub airport: AirportCode,
    pub class: ServiceClass,
    pub quantity: u32,
    pub ready: Tick,
    /// Set for kits returning from a flight; `None` for hub purchases.
    pub flight: Option<FlightId>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessingQueue {
    /// Keyed by (ready tick, enqueue sequence) so equal ready ticks keep FIFO order.
    jobs: BTreeMap<(Tick, u64), ProcessingJob>,
    next_seq: u64,
}

impl ProcessingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, job: ProcessingJob) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.jobs.insert((job.ready, seq), job);
    }

    /// Credit and remove every job with `ready <= tick`. Returns the jobs released.
    pub fn release_matured(&mut self, tick: Tick, ledger: &mut InventoryLedger) -> Vec<ProcessingJob> {
        let pending = self.jobs.split_off(&(tick.next(), 0));
        let matured = std::mem::replace(&mut self.jobs, pending);
        matured
            .into_values()
            .inspect(|job| ledger.credit(&job.airport, job.class, job.quantity))
            .collect()
    }

    /// Move every job tagged with `flight` to `base + delay(airport, class)`.
    /// Untagged jobs and jobs of other flights are untouched.
    pub fn reschedule(
        &mut self,
        flight: &FlightId,
        base: Tick,
        delay: impl Fn(&AirportCode, ServiceClass) -> u32,
    ) -> usize {
        let keys: Vec<(Tick, u64)> = self
            .jobs
            .iter()
            .filter(|(_, job)| job.flight.as_ref() == Some(flight))
            .map(|(&key, _)| key)
            .collect();
        for key in &keys {
            if let Some(mut job) = self.jobs.remove(key) {
                job.ready = base + delay(&job.airport, job.class);
                self.jobs.insert((job.ready, key.1), job);
            }
        }
        keys.len()
    }

    /// Quantities maturing at `airport` with ready tick in `[from, to]`.
    pub fn incoming(&self, airport: &AirportCode, from: Tick, to: Tick) -> PerClass<u64> {
        let mut total = PerClass::<u64>::default();
        if from > to {
            return total;
        }
        for job in self.jobs.range((from, 0)..=(to, u64::MAX)).map(|(_, j)| j) {
            if &job.airport == airport {
                total[job.class] += job.quantity as u64;
            }
        }
        total
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessingJob> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
        self.next_seq = 0;
    }
}
