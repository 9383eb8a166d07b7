// Synthetic Round Service — plays the authoritative side of a session
// Holds the true inventory, emits flight events and scores every submitted round

use std::collections::{BTreeMap, HashMap};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rotables_engine::*;
use serde::Serialize;

use crate::scenarios::Scenario;
use crate::traffic::DemandGenerator;

/// Flights are announced this far ahead of departure.
const ANNOUNCE_LEAD_HOURS: u32 = 48;
const CHECK_IN_LEAD_HOURS: u32 = 2;
const TURNAROUND_HOURS: u32 = 2;

const OVERLOAD_PENALTY: f64 = 5_000.0;
const NEGATIVE_STOCK_PENALTY: f64 = 2_000.0;
const OVERFLOW_PENALTY: f64 = 50.0;
const INVALID_LOAD_PENALTY: f64 = 1_000.0;

fn unserved_penalty(class: ServiceClass) -> f64 {
    match class {
        ServiceClass::First => 2_000.0,
        ServiceClass::Business => 1_200.0,
        ServiceClass::PremiumEconomy => 600.0,
        ServiceClass::Economy => 300.0,
    }
}

fn purchase_cost(class: ServiceClass) -> f64 {
    match class {
        ServiceClass::First => 200.0,
        ServiceClass::Business => 120.0,
        ServiceClass::PremiumEconomy => 60.0,
        ServiceClass::Economy => 25.0,
    }
}

fn load_cost(class: ServiceClass) -> f64 {
    match class {
        ServiceClass::First => 5.0,
        ServiceClass::Business => 3.0,
        ServiceClass::PremiumEconomy => 2.0,
        ServiceClass::Economy => 1.0,
    }
}

fn fleet() -> Vec<AircraftType> {
    vec![
        AircraftType { type_code: "A321".to_string(), kit_capacity: PerClass::new(8, 20, 24, 150) },
        AircraftType { type_code: "B787".to_string(), kit_capacity: PerClass::new(16, 36, 40, 210) },
        AircraftType { type_code: "A350".to_string(), kit_capacity: PerClass::new(24, 48, 50, 240) },
    ]
}

// ─── Planned Flights ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct PlannedFlight {
    id: FlightId,
    number: String,
    origin: AirportCode,
    destination: AirportCode,
    aircraft: String,
    departure: Tick,
    arrival: Tick,
    actual_arrival: Tick,
    booked: PerClass<u32>,
    boarded: PerClass<u32>,
    announced: bool,
    checked_in: bool,
    loaded: bool,
    landed: bool,
}

impl PlannedFlight {
    fn update(&self, event_type: FlightEventKind, passengers: PerClass<u32>) -> FlightUpdate {
        FlightUpdate {
            event_type,
            flight_id: self.id.clone(),
            flight_number: self.number.clone(),
            origin_airport: self.origin.0.clone(),
            destination_airport: self.destination.0.clone(),
            aircraft_type: self.aircraft.clone(),
            departure: self.departure.into(),
            arrival: self.arrival.into(),
            passengers,
        }
    }
}

// ─── Score ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkScore {
    pub flights: u32,
    pub passengers: u64,
    pub unserved_passengers: u64,
    pub overloads: u32,
    pub negative_stock_events: u32,
    pub capacity_overflows: u32,
    pub invalid_loads: u32,
    pub kits_purchased: u64,
    pub penalty_cost: f64,
    pub operating_cost: f64,
}

impl NetworkScore {
    pub fn service_rate(&self) -> f64 {
        if self.passengers == 0 {
            return 1.0;
        }
        1.0 - self.unserved_passengers as f64 / self.passengers as f64
    }
}

// ─── Network ────────────────────────────────────────────────────────────────

pub struct SyntheticNetwork {
    world: WorldReference,
    hub: AirportCode,
    airport_codes: Vec<AirportCode>,
    flights: Vec<PlannedFlight>,
    by_id: HashMap<FlightId, usize>,
    departures: BTreeMap<Tick, Vec<usize>>,
    stock: HashMap<AirportCode, PerClass<i64>>,
    arrivals: BTreeMap<(Tick, u64), (AirportCode, ServiceClass, u32)>,
    arrival_seq: u64,
    lead_times: PerClass<u32>,
    expected: Tick,
    total_cost: f64,
    score: NetworkScore,
}

impl SyntheticNetwork {
    pub fn generate(scenario: &Scenario, config: &EngineConfig, seed: u64) -> Result<Self, WorldError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut demand = DemandGenerator::new(ChaCha8Rng::seed_from_u64(seed ^ 0x5eed_cafe), scenario.load_factor);
        let fleet = fleet();

        let hub_economy = 300 * scenario.outstations * scenario.rotations_per_day;
        let hub_capacity = PerClass::new(hub_economy / 8, hub_economy / 5, hub_economy / 5, hub_economy);
        let mut airports = vec![Airport {
            code: config.hub.clone(),
            processing_time: PerClass::new(6, 4, 3, 2),
            capacity: hub_capacity,
            stock: hub_capacity.map(|_, &c| (c as f64 * scenario.hub_stock_share) as u32),
        }];

        let c = scenario.outstation_capacity;
        let mut spokes = Vec::new();
        for i in 1..=scenario.outstations {
            let code = AirportCode(format!("OUT{i:02}"));
            let capacity = PerClass::new(c / 8, c / 5, c / 5, c);
            airports.push(Airport {
                code: code.clone(),
                processing_time: PerClass::from_fn(|_| rng.gen_range(2..=6)),
                capacity,
                stock: capacity.map(|_, &cap| cap / 2),
            });
            let block: u32 = rng.gen_range(2..=9);
            let aircraft = fleet[rng.gen_range(0..fleet.len())].clone();
            spokes.push((code, block, aircraft));
        }

        let end = Tick::from_absolute(scenario.end_hours());
        let mut flights = Vec::new();
        let late = |rng: &mut ChaCha8Rng, arrival: Tick| {
            if scenario.max_delay_hours > 0 && rng.gen::<f64>() < scenario.delay_prob {
                arrival + rng.gen_range(1..=scenario.max_delay_hours)
            } else {
                arrival
            }
        };
        let spacing = 20 / scenario.rotations_per_day.max(1);
        for day in 0..scenario.days {
            for (o, (code, block, aircraft)) in spokes.iter().enumerate() {
                for r in 0..scenario.rotations_per_day {
                    let out_dep = Tick::new(day, 4 + r * spacing + o as u32 % 3);
                    let back_dep = out_dep + *block + TURNAROUND_HOURS;
                    let legs = [
                        (config.hub.clone(), code.clone(), out_dep),
                        (code.clone(), config.hub.clone(), back_dep),
                    ];
                    for (origin, destination, departure) in legs {
                        if departure >= end {
                            continue;
                        }
                        let seq = flights.len();
                        let booked = demand.bookings(&aircraft.kit_capacity);
                        let boarded = demand.check_in(&booked);
                        let arrival = departure + *block;
                        flights.push(PlannedFlight {
                            id: FlightId(format!("FL{seq:05}")),
                            number: format!("RK{}", 100 + seq % 900),
                            origin,
                            destination,
                            aircraft: aircraft.type_code.clone(),
                            departure,
                            arrival,
                            actual_arrival: late(&mut rng, arrival),
                            booked,
                            boarded,
                            announced: false,
                            checked_in: false,
                            loaded: false,
                            landed: false,
                        });
                    }
                }
            }
        }

        let mut by_id = HashMap::new();
        let mut departures: BTreeMap<Tick, Vec<usize>> = BTreeMap::new();
        for (idx, flight) in flights.iter().enumerate() {
            by_id.insert(flight.id.clone(), idx);
            departures.entry(flight.departure).or_default().push(idx);
        }
        let stock = airports
            .iter()
            .map(|a| (a.code.clone(), a.stock.map(|_, &s| s as i64)))
            .collect();
        let mut airport_codes: Vec<AirportCode> = airports.iter().map(|a| a.code.clone()).collect();
        airport_codes.sort();

        let score = NetworkScore { flights: flights.len() as u32, ..Default::default() };
        Ok(Self {
            world: WorldReference::new(airports, fleet)?,
            hub: config.hub.clone(),
            airport_codes,
            flights,
            by_id,
            departures,
            stock,
            arrivals: BTreeMap::new(),
            arrival_seq: 0,
            lead_times: config.purchase.map(|_, t| t.lead_time_hours),
            expected: Tick::default(),
            total_cost: 0.0,
            score,
        })
    }

    pub fn world(&self) -> &WorldReference {
        &self.world
    }

    pub fn score(&self) -> &NetworkScore {
        &self.score
    }

    fn schedule_arrival(&mut self, ready: Tick, airport: AirportCode, class: ServiceClass, qty: u32) {
        self.arrivals.insert((ready, self.arrival_seq), (airport, class, qty));
        self.arrival_seq += 1;
    }

    fn release_arrivals(&mut self, tick: Tick) {
        let later = self.arrivals.split_off(&(tick.next(), 0));
        let matured = std::mem::replace(&mut self.arrivals, later);
        for (airport, class, qty) in matured.into_values() {
            self.stock.entry(airport).or_default()[class] += qty as i64;
        }
    }

    fn apply_loads(&mut self, tick: Tick, loads: &[FlightLoad], penalties: &mut Vec<Penalty>) {
        for load in loads {
            let idx = match self.by_id.get(&load.flight_id) {
                Some(&idx) if self.flights[idx].departure == tick && !self.flights[idx].loaded => idx,
                _ => {
                    self.score.invalid_loads += 1;
                    penalties.push(penalty(
                        "INVALID_FLIGHT_LOAD",
                        Some(&load.flight_id),
                        format!("flight is not departing at {tick}"),
                        INVALID_LOAD_PENALTY,
                    ));
                    continue;
                }
            };
            self.board(idx, &load.loaded_kits, penalties);
        }

        let unloaded: Vec<usize> = self
            .departures
            .get(&tick)
            .map(|ids| ids.iter().copied().filter(|&i| !self.flights[i].loaded).collect())
            .unwrap_or_default();
        for idx in unloaded {
            self.board(idx, &PerClass::default(), penalties);
        }
    }

    fn board(&mut self, idx: usize, kits: &PerClass<u32>, penalties: &mut Vec<Penalty>) {
        self.flights[idx].loaded = true;
        let flight = self.flights[idx].clone();
        let seats = self.world.aircraft(&flight.aircraft).map(|a| a.kit_capacity).unwrap_or_default();

        for class in ServiceClass::ALL {
            let qty = kits[class];
            let pax = flight.boarded[class];
            self.score.passengers += pax as u64;

            if qty > seats[class] {
                self.score.overloads += 1;
                penalties.push(penalty(
                    "PLANE_OVERLOAD",
                    Some(&flight.id),
                    format!("{class}: {qty} kits on board, room for {}", seats[class]),
                    OVERLOAD_PENALTY,
                ));
            }

            if qty > 0 {
                let balance = &mut self.stock.entry(flight.origin.clone()).or_default()[class];
                *balance -= qty as i64;
                let short = (-*balance).clamp(0, qty as i64);
                if short > 0 {
                    self.score.negative_stock_events += 1;
                    penalties.push(penalty(
                        "NEGATIVE_INVENTORY",
                        Some(&flight.id),
                        format!("{} {class} short by {short}", flight.origin),
                        short as f64 * NEGATIVE_STOCK_PENALTY,
                    ));
                }
                let cost = qty as f64 * load_cost(class);
                self.score.operating_cost += cost;
                self.total_cost += cost;

                let processing = self.world.processing_time(&flight.destination, class).unwrap_or(0);
                self.schedule_arrival(flight.actual_arrival + processing, flight.destination.clone(), class, qty);
            }

            let unserved = pax.saturating_sub(qty);
            if unserved > 0 {
                self.score.unserved_passengers += unserved as u64;
                penalties.push(penalty(
                    "UNFULFILLED_PASSENGERS",
                    Some(&flight.id),
                    format!("{unserved} {class} passengers without a kit"),
                    unserved as f64 * unserved_penalty(class),
                ));
            }
        }
    }

    fn apply_purchases(&mut self, tick: Tick, orders: &PerClass<u32>) {
        for (class, &qty) in orders.iter().filter(|&(_, &q)| q > 0) {
            let cost = qty as f64 * purchase_cost(class);
            self.score.operating_cost += cost;
            self.score.kits_purchased += qty as u64;
            self.total_cost += cost;
            self.schedule_arrival(tick + self.lead_times[class], self.hub.clone(), class, qty);
        }
    }

    fn check_capacity(&mut self, penalties: &mut Vec<Penalty>) {
        for code in &self.airport_codes {
            let Some(balances) = self.stock.get(code) else { continue };
            for class in ServiceClass::ALL {
                let capacity = self.world.capacity(code, class).unwrap_or(0) as i64;
                let excess = balances[class] - capacity;
                if excess > 0 {
                    self.score.capacity_overflows += 1;
                    penalties.push(penalty(
                        "INVENTORY_EXCEEDS_CAPACITY",
                        None,
                        format!("{code} {class} over capacity by {excess}"),
                        excess as f64 * OVERFLOW_PENALTY,
                    ));
                }
            }
        }
    }

    /// Events the service reports after round `tick` has been scored.
    fn events_after(&mut self, tick: Tick) -> Vec<FlightUpdate> {
        let announce_until = tick + 1 + ANNOUNCE_LEAD_HOURS;
        let check_in_until = tick + 1 + CHECK_IN_LEAD_HOURS;
        let mut updates = Vec::new();
        for flight in &mut self.flights {
            if !flight.announced && flight.departure > tick && flight.departure <= announce_until {
                flight.announced = true;
                updates.push(flight.update(FlightEventKind::Scheduled, flight.booked));
            }
            if flight.announced && !flight.checked_in && flight.departure > tick && flight.departure <= check_in_until {
                flight.checked_in = true;
                updates.push(flight.update(FlightEventKind::CheckedIn, flight.boarded));
            }
            if flight.loaded && !flight.landed && flight.actual_arrival <= tick {
                flight.landed = true;
                let mut landed = flight.update(FlightEventKind::Landed, flight.boarded);
                landed.arrival = flight.actual_arrival.into();
                updates.push(landed);
            }
        }
        updates
    }
}

impl RoundTransport for SyntheticNetwork {
    fn play_round(&mut self, request: &RoundRequest) -> Result<RoundResponse, SessionError> {
        let tick = request.tick();
        if tick != self.expected {
            return Err(SessionError::round_failed(tick, format!("expected round {}", self.expected)));
        }

        let mut penalties = Vec::new();
        self.release_arrivals(tick);
        self.apply_loads(tick, &request.flight_loads, &mut penalties);
        self.apply_purchases(tick, &request.kit_purchasing_orders);
        self.check_capacity(&mut penalties);

        let round_penalty: f64 = penalties.iter().map(|p| p.penalty).sum();
        self.score.penalty_cost += round_penalty;
        self.total_cost += round_penalty;
        self.expected = tick.next();

        Ok(RoundResponse {
            flight_updates: self.events_after(tick),
            total_cost: self.total_cost,
            penalties,
        })
    }
}

fn penalty(code: &str, flight: Option<&FlightId>, reason: String, amount: f64) -> Penalty {
    Penalty {
        code: Some(code.to_string()),
        flight_id: flight.cloned(),
        reason,
        penalty: amount,
    }
}
