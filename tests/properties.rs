//! Property-based tests for the kit engine.
//!
//! Generates random networks and flight schedules, plays them hour by hour,
//! and checks the allocation and inventory invariants after every tick.

use proptest::prelude::*;
use rotables_engine::*;

const AIRPORTS: [&str; 4] = ["HUB1", "A", "B", "C"];
const AIRCRAFT: [&str; 3] = ["S", "L", "UNKNOWN"];

// ===========================================================================
// Generators
// ===========================================================================

#[derive(Debug, Clone)]
struct PlannedFlight {
    origin: usize,
    dest: usize,
    aircraft: usize,
    departure: u32,
    block: u32,
    pax: PerClass<u32>,
}

#[derive(Debug, Clone)]
struct Delay {
    flight: usize,
    at: u32,
    extra: u32,
}

fn arb_pax() -> impl Strategy<Value = PerClass<u32>> {
    (0..15u32, 0..25u32, 0..35u32, 0..60u32).prop_map(|(f, b, p, e)| PerClass::new(f, b, p, e))
}

fn arb_flight() -> impl Strategy<Value = PlannedFlight> {
    (0..4usize, 0..4usize, 0..3usize, 1..48u32, 1..8u32, arb_pax()).prop_map(
        |(origin, dest, aircraft, departure, block, pax)| PlannedFlight {
            origin,
            dest: if dest == origin { (dest + 1) % 4 } else { dest },
            aircraft,
            departure,
            block,
            pax,
        },
    )
}

fn arb_stock() -> impl Strategy<Value = Vec<PerClass<u32>>> {
    proptest::collection::vec((0..50u32, 0..50u32, 0..80u32, 0..200u32), 4)
        .prop_map(|v| v.into_iter().map(|(f, b, p, e)| PerClass::new(f, b, p, e)).collect())
}

fn arb_delays(max: usize) -> impl Strategy<Value = Vec<Delay>> {
    proptest::collection::vec(
        (0..64usize, 0..60u32, 1..6u32).prop_map(|(flight, at, extra)| Delay { flight, at, extra }),
        0..=max,
    )
}

// ===========================================================================
// Harness
// ===========================================================================

fn build_engine(stock: &[PerClass<u32>]) -> KitEngine {
    let airports = AIRPORTS
        .iter()
        .zip(stock)
        .enumerate()
        .map(|(i, (code, &stock))| Airport {
            code: (*code).into(),
            processing_time: PerClass::splat(2 + i as u32),
            capacity: PerClass::splat(400),
            stock,
        })
        .collect();
    let aircraft = vec![
        AircraftType { type_code: "S".to_string(), kit_capacity: PerClass::new(4, 8, 12, 30) },
        AircraftType { type_code: "L".to_string(), kit_capacity: PerClass::new(12, 30, 40, 120) },
    ];
    let config = EngineConfig { simulation_end_hours: 72, ..EngineConfig::default() };
    KitEngine::new(WorldReference::new(airports, aircraft).unwrap(), config).unwrap()
}

fn update(kind: FlightEventKind, idx: usize, f: &PlannedFlight, arrival: Tick) -> FlightUpdate {
    FlightUpdate {
        event_type: kind,
        flight_id: FlightId(format!("F{idx:03}")),
        flight_number: String::new(),
        origin_airport: AIRPORTS[f.origin].to_string(),
        destination_airport: AIRPORTS[f.dest].to_string(),
        aircraft_type: AIRCRAFT[f.aircraft].to_string(),
        departure: Tick::from_absolute(f.departure).into(),
        arrival: arrival.into(),
        passengers: f.pax,
    }
}

fn ledger_total(eng: &KitEngine) -> i64 {
    AIRPORTS
        .iter()
        .flat_map(|a| ServiceClass::ALL.map(|c| eng.stock(&(*a).into(), c)))
        .sum()
}

fn pending_total(eng: &KitEngine) -> i64 {
    eng.pending_jobs().map(|j| j.quantity as i64).sum()
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Loads never exceed kit capacity; outstation loads never exceed passengers.
    #[test]
    fn loads_respect_capacity_and_passengers(
        stock in arb_stock(),
        flights in proptest::collection::vec(arb_flight(), 1..40),
    ) {
        let mut eng = build_engine(&stock);
        for (i, f) in flights.iter().enumerate() {
            let arrival = Tick::from_absolute(f.departure + f.block);
            eng.apply_update(&update(FlightEventKind::Scheduled, i, f, arrival));
        }
        let caps = [PerClass::new(4, 8, 12, 30), PerClass::new(12, 30, 40, 120), PerClass::default()];

        for hour in 0..60 {
            let decision = eng.play_tick(Tick::from_absolute(hour));
            for load in &decision.loads {
                let idx: usize = load.flight_id.0[1..].parse().unwrap();
                let f = &flights[idx];
                for class in ServiceClass::ALL {
                    let qty = load.loaded_kits[class];
                    prop_assert!(qty <= caps[f.aircraft][class]);
                    if AIRPORTS[f.origin] != "HUB1" {
                        prop_assert!(qty <= f.pax[class]);
                    }
                }
            }
        }
    }

    /// Ledger balances never go negative, so no tick deducts more than the
    /// balance at its start.
    #[test]
    fn ledger_never_overdrawn(
        stock in arb_stock(),
        flights in proptest::collection::vec(arb_flight(), 1..40),
    ) {
        let mut eng = build_engine(&stock);
        for (i, f) in flights.iter().enumerate() {
            let arrival = Tick::from_absolute(f.departure + f.block);
            eng.apply_update(&update(FlightEventKind::Scheduled, i, f, arrival));
        }
        for hour in 0..60 {
            eng.play_tick(Tick::from_absolute(hour));
            for airport in AIRPORTS {
                for class in ServiceClass::ALL {
                    prop_assert!(eng.stock(&airport.into(), class) >= 0);
                }
            }
        }
    }

    /// Kits are neither created nor lost: ledger plus queued kits equals seed
    /// stock plus purchases, and the queue only shrinks by released jobs.
    #[test]
    fn every_job_credits_exactly_once(
        stock in arb_stock(),
        flights in proptest::collection::vec(arb_flight(), 1..40),
        delays in arb_delays(12),
    ) {
        let mut eng = build_engine(&stock);
        for (i, f) in flights.iter().enumerate() {
            let arrival = Tick::from_absolute(f.departure + f.block);
            eng.apply_update(&update(FlightEventKind::Scheduled, i, f, arrival));
        }
        let seeded = ledger_total(&eng);

        for hour in 0..60 {
            let before_jobs = eng.pending_jobs().count();
            let before_released = eng.stats().jobs_released;
            let before_purchased: u64 = eng.stats().kits_purchased.iter().map(|(_, &k)| k).sum();

            let decision = eng.play_tick(Tick::from_absolute(hour));

            let released = (eng.stats().jobs_released - before_released) as usize;
            let returns = decision
                .loads
                .iter()
                .flat_map(|l| l.loaded_kits.iter().map(|(_, &q)| q))
                .filter(|&q| q > 0)
                .count();
            let orders = decision.purchases.iter().filter(|&(_, &q)| q > 0).count();
            prop_assert_eq!(eng.pending_jobs().count(), before_jobs - released + returns + orders);

            let purchased: u64 = eng.stats().kits_purchased.iter().map(|(_, &k)| k).sum();
            prop_assert_eq!(purchased - before_purchased, decision.purchases.total());
            prop_assert_eq!(ledger_total(&eng) + pending_total(&eng), seeded + purchased as i64);

            for d in delays.iter().filter(|d| d.at == hour) {
                let idx = d.flight % flights.len();
                let f = &flights[idx];
                let arrival = Tick::from_absolute(f.departure + f.block + d.extra);
                eng.apply_update(&update(FlightEventKind::Landed, idx, f, arrival));
            }
        }
    }

    /// Rescheduling moves exactly the jobs of the delayed flight.
    #[test]
    fn reschedule_touches_only_tagged_jobs(
        stock in arb_stock(),
        flights in proptest::collection::vec(arb_flight(), 2..30),
        pick in 0..30usize,
        extra in 1..10u32,
    ) {
        let mut eng = build_engine(&stock);
        for (i, f) in flights.iter().enumerate() {
            let arrival = Tick::from_absolute(f.departure + f.block);
            eng.apply_update(&update(FlightEventKind::Scheduled, i, f, arrival));
        }
        let target = pick % flights.len();
        let f = &flights[target];
        for hour in 0..=f.departure {
            eng.decide_kit_loads(Tick::from_absolute(hour));
        }

        let id = FlightId(format!("F{target:03}"));
        let others: Vec<_> = eng.pending_jobs().filter(|j| j.flight.as_ref() != Some(&id)).cloned().collect();
        let new_arrival = Tick::from_absolute(f.departure + f.block + extra);
        eng.apply_update(&update(FlightEventKind::CheckedIn, target, f, new_arrival));

        for job in eng.pending_jobs().filter(|j| j.flight.as_ref() == Some(&id)) {
            let processing = 2 + f.dest as u32;
            prop_assert_eq!(job.ready, new_arrival + processing + 2);
        }
        let others_after: Vec<_> = eng.pending_jobs().filter(|j| j.flight.as_ref() != Some(&id)).cloned().collect();
        prop_assert_eq!(others, others_after);
    }
}
