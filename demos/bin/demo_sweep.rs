//! Parameter Sweep Demo
//!
//! Sweeps the exponent of `X^t` and compares the measured excitation with
//! `sin²(πt/2)`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use qmoment_demos::circuits::{expected_excitation, rabi_circuit};
use qmoment_demos::{
    create_progress_bar, init_tracing, print_circuit, print_header, print_info, print_result,
    print_section, print_success,
};
use qmoment_ir::Qubit;
use qmoment_sim::{Simulator, SimulatorConfig, Sweep, TrialResult};

#[derive(Parser, Debug)]
#[command(name = "demo-sweep")]
#[command(about = "Sweep X^t and sample its excitation")]
struct Args {
    /// Number of sweep points between t = 0 and t = 2
    #[arg(short, long, default_value = "200")]
    points: usize,

    /// Repetitions per point
    #[arg(short, long, default_value = "1000")]
    repetitions: i64,

    /// RNG seed (overrides QMOMENT_SEED)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run sweep points in parallel
    #[arg(long)]
    parallel: bool,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = SimulatorConfig::from_env();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if args.parallel {
        config = config.with_parallel(true);
    }
    let simulator = Simulator::new(config);

    let circuit = rabi_circuit(Qubit::line(0), "t", "m")?;
    let sweep = Sweep::linspace("t", 0.0, 2.0, args.points);
    info!(points = sweep.len(), repetitions = args.repetitions, "starting sweep");

    let results: Vec<TrialResult> = if simulator.config().parallel || args.json {
        simulator.run_sweep(&circuit, &sweep, args.repetitions)?
    } else {
        let run = simulator.sweep_iter(&circuit, &sweep, args.repetitions)?;
        let pb = create_progress_bar(run.total() as u64, "sweeping t");
        let mut results = Vec::with_capacity(run.total());
        for result in run {
            results.push(result?);
            pb.inc(1);
        }
        pb.finish_with_message("done");
        results
    };

    if args.json {
        let json = serde_json::to_string_pretty(&results).context("serializing results")?;
        println!("{json}");
        return Ok(());
    }

    print_header("Parameter Sweep Demo");

    print_section("Circuit");
    print_circuit(&circuit);
    print_result("Sweep", format!("t in [0, 2], {} points", sweep.len()));
    print_result("Repetitions", args.repetitions);
    print_result(
        "Seed",
        simulator
            .config()
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string()),
    );

    print_section("Excitation");
    println!("  {:>8}  {:>9}  {:>9}", "t", "measured", "expected");
    let stride = (results.len() / 10).max(1);
    let mut worst: f64 = 0.0;
    for (i, result) in results.iter().enumerate() {
        let t = result.params().get("t").unwrap_or(0.0);
        let measured = result.fraction_of_ones("m")?;
        let expected = expected_excitation(t);
        worst = worst.max((measured - expected).abs());
        if i % stride == 0 || i + 1 == results.len() {
            println!("  {t:>8.3}  {measured:>9.3}  {expected:>9.3}");
        }
    }
    print_result("Largest deviation", format!("{worst:.3}"));

    println!();
    print_success("Sweep demo complete!");
    print_info("Pass --json to get every point with its raw measurements");
    Ok(())
}
