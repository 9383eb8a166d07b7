// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Rotables Kit Engine - Session Driver
//
// Hour-by-hour loop against the round-submission service. The engine never
// talks to the service itself; a `RoundTransport` does.

use serde::Serialize;
use tracing::{error, info};

use crate::engine::KitEngine;
use crate::protocol::{RoundRequest, RoundResponse};
use crate::types::Tick;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("round D{day}:{hour:02} failed: {reason}")]
    RoundFailed { day: u32, hour: u32, reason: String },
}

impl SessionError {
    pub fn round_failed(tick: Tick, reason: impl Into<String>) -> Self {
        Self::RoundFailed { day: tick.day(), hour: tick.hour(), reason: reason.into() }
    }
}

/// Submits one round and returns the service's answer.
pub trait RoundTransport {
    fn play_round(&mut self, request: &RoundRequest) -> Result<RoundResponse, SessionError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub ticks_played: u32,
    pub total_cost: f64,
    pub penalty_count: usize,
    pub penalty_total: f64,
    pub kits_loaded: u64,
    pub kits_purchased: u64,
}

/// Play every tick in `[start, end)`.
///
/// A failed round stops the run and is returned as-is. The engine is rolled
/// back to its state before the failed tick, so replaying from that tick
/// submits the same decision again.
pub fn run_session<T: RoundTransport>(
    engine: &mut KitEngine,
    transport: &mut T,
    start: Tick,
    end: Tick,
) -> Result<SessionSummary, SessionError> {
    let mut summary = SessionSummary::default();
    let mut tick = start;
    while tick < end {
        let checkpoint = engine.clone();
        let decision = engine.play_tick(tick);
        let loaded = decision.loads.iter().map(|l| l.loaded_kits.total()).sum::<u64>();
        let purchased = decision.purchases.total();

        let request = RoundRequest::new(tick, decision.loads, decision.purchases);
        let response = match transport.play_round(&request) {
            Ok(response) => response,
            Err(e) => {
                error!(%tick, error = %e, "round failed, rolling back tick");
                *engine = checkpoint;
                return Err(e);
            }
        };

        summary.kits_loaded += loaded;
        summary.kits_purchased += purchased;

        engine.update_state(&response);
        summary.ticks_played += 1;
        summary.total_cost = response.total_cost;
        summary.penalty_count += response.penalties.len();
        summary.penalty_total += response.penalties.iter().map(|p| p.penalty).sum::<f64>();
        tick = tick.next();
    }
    info!(
        ticks = summary.ticks_played,
        total_cost = summary.total_cost,
        penalties = summary.penalty_count,
        "session finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::protocol::{FlightEventKind, FlightUpdate, Penalty};
    use crate::types::PerClass;
    use crate::world::{AircraftType, Airport, WorldReference};

    struct Scripted {
        rounds: Vec<RoundRequest>,
        fail_at: Option<Tick>,
    }

    impl RoundTransport for Scripted {
        fn play_round(&mut self, request: &RoundRequest) -> Result<RoundResponse, SessionError> {
            if self.fail_at == Some(request.tick()) {
                return Err(SessionError::round_failed(request.tick(), "503 from service"));
            }
            self.rounds.push(request.clone());
            let mut response = RoundResponse {
                total_cost: 10.0 * self.rounds.len() as f64,
                ..Default::default()
            };
            if request.tick() == Tick::new(0, 0) {
                response.flight_updates.push(FlightUpdate {
                    event_type: FlightEventKind::Scheduled,
                    flight_id: "f1".into(),
                    flight_number: "RK1".to_string(),
                    origin_airport: "HUB1".to_string(),
                    destination_airport: "OUT1".to_string(),
                    aircraft_type: "A320".to_string(),
                    departure: Tick::new(0, 2).into(),
                    arrival: Tick::new(0, 5).into(),
                    passengers: PerClass::new(2, 4, 6, 8),
                });
                response.penalties.push(Penalty { reason: "late".to_string(), penalty: 1.5, ..Default::default() });
            }
            Ok(response)
        }
    }

    fn engine() -> KitEngine {
        crate::logging::init_test();
        let world = WorldReference::new(
            vec![
                Airport {
                    code: "HUB1".into(),
                    processing_time: PerClass::splat(3),
                    capacity: PerClass::splat(1000),
                    stock: PerClass::splat(100),
                },
                Airport {
                    code: "OUT1".into(),
                    processing_time: PerClass::splat(3),
                    capacity: PerClass::splat(1000),
                    stock: PerClass::default(),
                },
            ],
            vec![AircraftType { type_code: "A320".to_string(), kit_capacity: PerClass::splat(50) }],
        )
        .unwrap();
        KitEngine::new(world, EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_session_feeds_responses_back() {
        let mut eng = engine();
        let mut transport = Scripted { rounds: Vec::new(), fail_at: None };
        let summary = run_session(&mut eng, &mut transport, Tick::new(0, 0), Tick::new(0, 4)).unwrap();

        assert_eq!(summary.ticks_played, 4);
        assert_eq!(summary.total_cost, 40.0);
        assert_eq!(summary.penalty_count, 1);
        assert_eq!(summary.penalty_total, 1.5);
        // The flight announced in round 0 is loaded in round 2.
        let loads = &transport.rounds[2].flight_loads;
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].loaded_kits, PerClass::new(2, 4, 6, 8));
        assert_eq!(summary.kits_loaded, 20);
    }

    #[test]
    fn test_failed_round_stops_the_run() {
        let mut eng = engine();
        let mut transport = Scripted { rounds: Vec::new(), fail_at: Some(Tick::new(0, 1)) };
        let err = run_session(&mut eng, &mut transport, Tick::new(0, 0), Tick::new(0, 4)).unwrap_err();

        assert!(matches!(err, SessionError::RoundFailed { day: 0, hour: 1, .. }));
        assert_eq!(transport.rounds.len(), 1);
        assert_eq!(eng.known_flights(), 1);
    }

    #[test]
    fn test_failed_round_rolls_back_the_tick() {
        let mut eng = engine();
        let mut transport = Scripted { rounds: Vec::new(), fail_at: Some(Tick::new(0, 2)) };
        run_session(&mut eng, &mut transport, Tick::new(0, 0), Tick::new(0, 2)).unwrap();
        let hub = eng.stock_at(&"HUB1".into());
        let stats = eng.stats().clone();

        let err = run_session(&mut eng, &mut transport, Tick::new(0, 2), Tick::new(0, 4)).unwrap_err();

        assert!(matches!(err, SessionError::RoundFailed { day: 0, hour: 2, .. }));
        assert_eq!(eng.stock_at(&"HUB1".into()), hub);
        assert_eq!(eng.pending_jobs().count(), 0);
        assert_eq!(*eng.stats(), stats);
        // Still indexed, so a replay of D0:02 loads it.
        let replay = eng.play_tick(Tick::new(0, 2));
        assert_eq!(replay.loads.len(), 1);
        assert_eq!(replay.loads[0].loaded_kits, PerClass::new(2, 4, 6, 8));
    }
}
