//! Deutsch's Algorithm Demo
//!
//! Decides whether a one-bit function is constant or balanced with a single
//! oracle query.

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use qmoment_demos::circuits::{Secret, deutsch_circuit};
use qmoment_demos::{
    init_tracing, print_circuit, print_header, print_info, print_result, print_section,
    print_success,
};
use qmoment_sim::{Simulator, SimulatorConfig};

#[derive(Parser, Debug)]
#[command(name = "demo-deutsch")]
#[command(about = "Run Deutsch's algorithm on a secret function")]
struct Args {
    /// f(0); drawn at random unless given with --f1
    #[arg(long, requires = "f1")]
    f0: Option<u8>,

    /// f(1)
    #[arg(long, requires = "f0")]
    f1: Option<u8>,

    /// Repetitions
    #[arg(short, long, default_value = "10")]
    repetitions: i64,

    /// RNG seed for the secret and the simulator
    #[arg(short, long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    print_header("Deutsch's Algorithm Demo");

    let secret = match (args.f0, args.f1) {
        (Some(f0), Some(f1)) => Secret::new(f0 != 0, f1 != 0),
        _ => {
            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            Secret::random(&mut rng)
        }
    };

    let mut config = SimulatorConfig::from_env();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    debug!(?config, "simulator configuration");
    let simulator = Simulator::new(config);

    print_section("Secret Function");
    print_result("Secret", secret);
    print_result(
        "Kind",
        if secret.is_balanced() { "balanced" } else { "constant" },
    );

    print_section("Circuit");
    let circuit = deutsch_circuit(secret)?;
    print_circuit(&circuit);

    print_section("Results");
    let result = simulator.run(&circuit, args.repetitions)?;
    println!("  {result}");
    let histogram = result.histogram("result")?;
    print_result("Histogram", &histogram);
    let verdict = match histogram.most_common() {
        Some((1, _)) => "balanced",
        _ => "constant",
    };
    print_result("Verdict", verdict);

    println!();
    if (verdict == "balanced") == secret.is_balanced() {
        print_success("Deutsch demo complete!");
    } else {
        print_info("Verdict disagrees with the secret");
    }
    Ok(())
}
