//! Circuits and Moments Demo
//!
//! How operations are packed into moments under each insertion strategy.

use anyhow::Result;
use clap::Parser;

use qmoment_demos::{
    init_tracing, print_circuit, print_header, print_info, print_result, print_section,
    print_success,
};
use qmoment_ir::{Circuit, InsertStrategy, Moment, Operation, Qubit, StandardGate};

#[derive(Parser, Debug)]
#[command(name = "demo-circuits")]
#[command(about = "Show moment packing and circuit construction")]
struct Args {
    /// Number of line qubits
    #[arg(short = 'n', long, default_value = "3")]
    qubits: u32,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// A layer of H, a CX ladder, then a final layer of H.
fn layered(qubits: &[Qubit], strategy: InsertStrategy) -> Result<Circuit> {
    let mut ops: Vec<Operation> = Vec::new();
    for q in qubits {
        ops.push(StandardGate::h().on([*q])?);
    }
    for pair in qubits.windows(2) {
        ops.push(StandardGate::cx().on([pair[0], pair[1]])?);
    }
    for q in qubits {
        ops.push(StandardGate::h().on([*q])?);
    }

    let mut circuit = Circuit::new();
    circuit.append(ops, strategy)?;
    Ok(circuit)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    print_header("Circuits and Moments Demo");

    let qubits = Qubit::line_range(args.qubits.max(2));

    print_section("Earliest Insertion");
    let earliest = layered(&qubits, InsertStrategy::Earliest)?;
    print_circuit(&earliest);
    print_result("Moments", earliest.len());
    print_result("Operations", earliest.num_operations());

    print_section("New Moment Insertion");
    let fresh = layered(&qubits, InsertStrategy::NewMoment)?;
    print_circuit(&fresh);
    print_result("Moments", fresh.len());

    print_section("Explicit Moments");
    let grid = Qubit::grid_rect(2, 2);
    let mut first = Moment::new();
    for q in &grid {
        first.add(StandardGate::h().on([*q])?)?;
    }
    let second = Moment::from_operations([
        StandardGate::cz().on([grid[0], grid[1]])?,
        StandardGate::cz().on([grid[2], grid[3]])?,
    ])?;
    let mut explicit = Circuit::from_moments([first, second]);
    explicit.measure(grid.iter().copied(), "grid")?;
    print_circuit(&explicit);
    print_result("Qubits", explicit.all_qubits().len());
    print_result("Measurement keys", explicit.measurement_keys().join(", "));
    print_result("Terminal measurements", explicit.are_all_measurements_terminal());

    print_section("Conflicts");
    let a = qubits[0];
    match Moment::from_operations([StandardGate::x().on([a])?, StandardGate::z().on([a])?]) {
        Ok(m) => print_info(&format!("accepted {m}")),
        Err(e) => print_result("X and Z in one moment", e),
    }

    println!();
    print_success("Circuits demo complete!");
    Ok(())
}
