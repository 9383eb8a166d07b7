// Multi-Seed Runner — N sessions per scenario with statistical aggregation
// Each scenario runs N times with seeds base..base+N, one fresh engine per run

use rotables_engine::*;

use crate::network::SyntheticNetwork;
use crate::report::*;
use crate::scenarios::Scenario;

use std::time::Instant;

/// Play one full session of `scenario` against a freshly generated network.
pub fn run_single(scenario: &Scenario, seed: u64) -> BenchResult {
    let start = Instant::now();
    let config = EngineConfig {
        simulation_end_hours: scenario.end_hours(),
        ..EngineConfig::default()
    };

    let mut result = BenchResult {
        scenario: scenario.name.to_string(),
        seed,
        pass: false,
        error: None,
        ticks: 0,
        flights: 0,
        passengers: 0,
        unserved_passengers: 0,
        service_rate: 0.0,
        overloads: 0,
        negative_stock_events: 0,
        capacity_overflows: 0,
        invalid_loads: 0,
        penalty_count: 0,
        penalty_cost: 0.0,
        total_cost: 0.0,
        kits_loaded: 0,
        kits_purchased: 0,
        jobs_released: 0,
        elapsed_ms: 0,
    };

    let mut network = match SyntheticNetwork::generate(scenario, &config, seed) {
        Ok(network) => network,
        Err(e) => {
            result.error = Some(e.to_string());
            return result;
        }
    };
    let mut engine = match KitEngine::new(network.world().clone(), config) {
        Ok(engine) => engine,
        Err(e) => {
            result.error = Some(e.to_string());
            return result;
        }
    };

    let end = Tick::from_absolute(scenario.end_hours());
    match run_session(&mut engine, &mut network, Tick::default(), end) {
        Ok(summary) => {
            result.ticks = summary.ticks_played;
            result.penalty_count = summary.penalty_count;
            result.total_cost = summary.total_cost;
        }
        Err(e) => result.error = Some(e.to_string()),
    }

    let score = network.score();
    let stats = engine.stats();
    result.flights = score.flights;
    result.passengers = score.passengers;
    result.unserved_passengers = score.unserved_passengers;
    result.service_rate = score.service_rate();
    result.overloads = score.overloads;
    result.negative_stock_events = score.negative_stock_events;
    result.capacity_overflows = score.capacity_overflows;
    result.invalid_loads = score.invalid_loads;
    result.penalty_cost = score.penalty_cost;
    result.kits_loaded = stats.kits_loaded.iter().map(|(_, &k)| k).sum();
    result.kits_purchased = score.kits_purchased;
    result.jobs_released = stats.jobs_released;

    let c = &scenario.criteria;
    result.pass = result.error.is_none()
        && score.negative_stock_events <= c.max_negative_stock_events
        && score.overloads <= c.max_overloads
        && score.invalid_loads == 0
        && result.service_rate >= c.min_service_rate;
    result.elapsed_ms = start.elapsed().as_millis();
    result
}

/// Run `n_runs` seeds of a scenario and aggregate.
pub fn run_monte_carlo(scenario: &Scenario, n_runs: usize, base_seed: u64) -> ScenarioReport {
    let results: Vec<BenchResult> = (0..n_runs)
        .map(|i| run_single(scenario, base_seed + i as u64))
        .collect();
    aggregate(scenario, results)
}

fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> ScenarioReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();

    ScenarioReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        n_runs: n,
        pass_rate: if n == 0 { 0.0 } else { passed as f64 / n as f64 },
        service_rate: Stats::of(&results, |r| r.service_rate),
        total_cost: Stats::of(&results, |r| r.total_cost),
        penalty_cost: Stats::of(&results, |r| r.penalty_cost),
        penalty_count: Stats::of(&results, |r| r.penalty_count as f64),
        kits_purchased: Stats::of(&results, |r| r.kits_purchased as f64),
        capacity_overflows: Stats::of(&results, |r| r.capacity_overflows as f64),
        elapsed_ms: Stats::of(&results, |r| r.elapsed_ms as f64),
        individual_runs: results,
    }
}
