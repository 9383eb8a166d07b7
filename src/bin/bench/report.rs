// Benchmark Report Types
// Structured JSON output: per-run results, per-scenario aggregates, suite summary

use serde::Serialize;

// ─── Statistics (per-metric aggregation across seeds) ───────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        Self {
            mean,
            std_dev: variance.sqrt(),
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    pub fn of<T>(runs: &[T], metric: impl Fn(&T) -> f64) -> Self {
        Self::from_samples(&runs.iter().map(metric).collect::<Vec<_>>())
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub seed: u64,
    pub pass: bool,
    pub error: Option<String>,
    pub ticks: u32,
    pub flights: u32,
    pub passengers: u64,
    pub unserved_passengers: u64,
    pub service_rate: f64,
    pub overloads: u32,
    pub negative_stock_events: u32,
    pub capacity_overflows: u32,
    pub invalid_loads: u32,
    pub penalty_count: usize,
    pub penalty_cost: f64,
    pub total_cost: f64,
    pub kits_loaded: u64,
    pub kits_purchased: u64,
    pub jobs_released: u64,
    pub elapsed_ms: u128,
}

// ─── Per-Scenario Report ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario_name: String,
    pub label: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub service_rate: Stats,
    pub total_cost: Stats,
    pub penalty_cost: Stats,
    pub penalty_count: Stats,
    pub kits_purchased: Stats,
    pub capacity_overflows: Stats,
    pub elapsed_ms: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub base_seed: u64,
    pub summary: Summary,
    pub scenarios: Vec<ScenarioReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}
