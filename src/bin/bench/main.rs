// Rotables Benchmark Runner — engine vs seeded synthetic round service
// Multi-seed runs per scenario, ChaCha8Rng schedules, JSON report per suite
//
// Usage:
//   cargo run --release --bin bench                     # Run all scenarios (10 seeds each)
//   cargo run --release --bin bench -- --runs 3         # Quick mode
//   cargo run --release --bin bench -- LATE             # Filter by name
//   cargo run --release --bin bench -- --seed 42        # Custom base seed
//   cargo run --release --bin bench -- --out results    # Report directory

mod monte_carlo;
mod network;
mod report;
mod scenarios;
mod traffic;

use report::*;
use scenarios::*;
use std::error::Error;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    out_dir: PathBuf,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 10,
        seed: 0,
        out_dir: PathBuf::from("benchmark-results"),
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(10);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--out" => {
                i += 1;
                if i < args.len() {
                    cli.out_dir = PathBuf::from(&args[i]);
                }
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    rotables_engine::logging::init_with("warn");
    let cli = parse_args();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    println!("\n  Rotables Benchmark Runner v{}", env!("CARGO_PKG_VERSION"));
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<36} {:>5} {:>9} {:>12} {:>10} {:>9} {:>7}",
        "Scenario", "Pass%", "Service%", "Cost", "Penalties", "Bought", "Time");
    println!("  {}", "-".repeat(96));

    let suite_start = Instant::now();
    let mut reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, cli.runs, cli.seed);
        let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };

        println!("  {:<36} {:>4}% {:>8.2}% {:>12.0} {:>10.1} {:>9.0} {:>5.0}ms  {}",
            report.label,
            (report.pass_rate * 100.0) as u32,
            report.service_rate.mean * 100.0,
            report.total_cost.mean,
            report.penalty_count.mean,
            report.kits_purchased.mean,
            report.elapsed_ms.mean,
            status,
        );

        for run in report.individual_runs.iter().filter(|r| r.error.is_some()) {
            eprintln!("    seed {}: {}", run.seed, run.error.as_deref().unwrap_or_default());
        }
        reports.push(report);
    }

    let total = reports.len();
    let passed = reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(96));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_start.elapsed().as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis().to_string();
    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        base_seed: cli.seed,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: reports,
    };

    std::fs::create_dir_all(&cli.out_dir)?;
    let path = cli.out_dir.join(format!("bench-{}.json", timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
