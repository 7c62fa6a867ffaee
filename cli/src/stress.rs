use std::time::{Instant, SystemTime, UNIX_EPOCH};

use babygc::runtime::gc::InvariantViolation;
use babygc::{Context, GcConfig, GcError};
use clap::{Args, ValueEnum};
use owo_colors::OwoColorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

#[derive(Args, Debug, Clone)]
pub struct StressArgs {
    /// Random seed; defaults to the current UNIX time
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of push/pop rounds per mode
    #[arg(long, default_value_t = 100_000)]
    pub iterations: usize,
    #[arg(long, value_enum, default_value_t = Mode::Both)]
    pub mode: Mode,
    /// Check heap invariants after every round
    #[arg(long, default_value_t = false)]
    pub verify: bool,
    /// Print the reports as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Push a random number of leaves, then pop them all
    Leaves,
    /// Like `leaves`, but pair up every second push
    Pairs,
    Both,
}

#[derive(Debug, Error)]
pub enum StressError {
    #[error("stack capacity must be at least 1")]
    NoStackRoom,

    #[error("round {round}: {source}")]
    Gc {
        round: usize,
        #[source]
        source: GcError,
    },

    #[error("round {round}: heap invariant violated: {source}")]
    Invariant {
        round: usize,
        #[source]
        source: InvariantViolation,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub mode: &'static str,
    pub rounds: usize,
    pub allocations: usize,
    pub collections: usize,
    pub freed: usize,
    pub peak_live: usize,
    pub reclaimed_at_exit: usize,
    pub elapsed_ms: f64,
}

pub fn run(args: &StressArgs, config: GcConfig) -> Result<(), StressError> {
    let seed = args.seed.unwrap_or_else(seed_from_clock);
    if !args.json {
        println!("Testing with a random seed: {seed}\n");
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut reports = Vec::new();
    if matches!(args.mode, Mode::Leaves | Mode::Both) {
        reports.push(run_rounds(&mut rng, args, config, false)?);
    }
    if matches!(args.mode, Mode::Pairs | Mode::Both) {
        reports.push(run_rounds(&mut rng, args, config, true)?);
    }

    if args.json {
        let value = serde_json::json!({
            "seed": seed,
            "config": config,
            "reports": reports,
        });
        println!("{value:#}");
    } else {
        for report in &reports {
            print_report(report);
        }
        println!("\nTested with a random seed: {seed}");
    }
    Ok(())
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// Each round pushes between one and `stack_capacity` leaves and then pops
/// whatever is left on the stack. With `pairs`, every second push also folds
/// the top two entries into a pair.
pub fn run_rounds(
    rng: &mut StdRng,
    args: &StressArgs,
    config: GcConfig,
    pairs: bool,
) -> Result<Report, StressError> {
    let capacity = config.stack_capacity;
    if capacity == 0 {
        return Err(StressError::NoStackRoom);
    }

    let started = Instant::now();
    let mut ctx = Context::with_config(config);
    let mut peak_live = 0;

    for round in 0..args.iterations {
        let gc_err = |source| StressError::Gc { round, source };
        let len = rng.gen_range(1..=capacity);
        let mut folded = 0;

        for j in 0..len {
            ctx.push_leaf((round + j) as i64).map_err(gc_err)?;
            if pairs && j % 2 == 1 {
                ctx.push_pair().map_err(gc_err)?;
                folded += 1;
            }
        }
        peak_live = peak_live.max(ctx.live_object_count());

        if args.verify {
            ctx.verify()
                .map_err(|source| StressError::Invariant { round, source })?;
        }

        for _ in 0..len - folded {
            ctx.pop().map_err(gc_err)?;
        }
    }

    let stats = ctx.stats();
    let final_collection = ctx.destroy();
    Ok(Report {
        mode: if pairs { "pairs" } else { "leaves" },
        rounds: args.iterations,
        allocations: stats.total_allocations,
        collections: stats.total_collections,
        freed: stats.total_freed,
        peak_live,
        reclaimed_at_exit: final_collection.collected,
        elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
    })
}

fn print_report(report: &Report) {
    println!(
        "{} {} rounds, {} allocations",
        format!("[{}]", report.mode).bright_cyan().bold(),
        report.rounds,
        report.allocations
    );
    println!(
        "  {} collection(s), {} freed, peak live {}",
        report.collections, report.freed, report.peak_live
    );
    println!(
        "  {} reclaimed at exit, {}",
        report.reclaimed_at_exit,
        format!("{:.2}ms", report.elapsed_ms).bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(iterations: usize) -> StressArgs {
        StressArgs {
            seed: Some(7),
            iterations,
            mode: Mode::Both,
            verify: true,
            json: false,
        }
    }

    #[test]
    fn leaf_rounds_leave_nothing_behind() {
        let mut rng = StdRng::seed_from_u64(7);
        let report = run_rounds(&mut rng, &args(200), GcConfig::default(), false)
            .expect("stress rounds should succeed");

        assert_eq!(report.allocations, report.freed + report.reclaimed_at_exit);
        assert!(report.collections > 0);
        assert!(report.peak_live <= 2 * GcConfig::default().stack_capacity);
    }

    #[test]
    fn pair_rounds_leave_nothing_behind() {
        let mut rng = StdRng::seed_from_u64(7);
        let report = run_rounds(&mut rng, &args(200), GcConfig::default(), true)
            .expect("stress rounds should succeed");

        assert_eq!(report.allocations, report.freed + report.reclaimed_at_exit);
    }

    #[test]
    fn same_seed_gives_same_allocation_count() {
        let first = run_rounds(&mut StdRng::seed_from_u64(11), &args(50), GcConfig::default(), true)
            .expect("first run");
        let second = run_rounds(&mut StdRng::seed_from_u64(11), &args(50), GcConfig::default(), true)
            .expect("second run");

        assert_eq!(first.allocations, second.allocations);
        assert_eq!(first.collections, second.collections);
    }

    #[test]
    fn zero_capacity_is_refused_before_any_round() {
        let config = GcConfig {
            stack_capacity: 0,
            ..GcConfig::default()
        };
        let result = run_rounds(&mut StdRng::seed_from_u64(1), &args(10), config, false);
        assert!(matches!(result, Err(StressError::NoStackRoom)));
    }

    #[test]
    fn report_serializes_with_elapsed_in_milliseconds() {
        let report = run_rounds(&mut StdRng::seed_from_u64(3), &args(20), GcConfig::default(), false)
            .expect("stress rounds should succeed");
        let value = serde_json::to_value(&report).expect("report should serialize");

        assert_eq!(value["mode"], "leaves");
        assert_eq!(value["rounds"], 20);
        assert_eq!(value["allocations"], report.allocations);
        assert!(value["elapsed_ms"].is_f64());
    }
}
