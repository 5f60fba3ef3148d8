//! Unitaries and Decompositions Demo
//!
//! Composes circuit unitaries, lowers gates into restricted gate sets and
//! devices, and merges single-qubit runs.

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;

use qmoment_compile::{
    Decomposer, DeviceGraph, GateSet, MergeSingleQubitGates, OneQubitBasis, PassManagerBuilder,
    RuleRegistry, allclose_up_to_global_phase, circuit_unitary,
};
use qmoment_demos::{
    format_matrix, init_tracing, print_circuit, print_header, print_result, print_section,
    print_success,
};
use qmoment_ir::{Bindings, Circuit, Device, InsertStrategy, Qubit, StandardGate};

#[derive(Parser, Debug)]
#[command(name = "demo-unitaries")]
#[command(about = "Compose unitaries, decompose gates and merge rotations")]
struct Args {
    /// Single-qubit form produced by the merge step
    #[arg(long, value_enum, default_value = "u3")]
    basis: Basis,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Basis {
    U3,
    Zyz,
}

impl From<Basis> for OneQubitBasis {
    fn from(basis: Basis) -> Self {
        match basis {
            Basis::U3 => OneQubitBasis::U3,
            Basis::Zyz => OneQubitBasis::ZYZ,
        }
    }
}

/// Fail unless `after` implements `before` up to global phase.
fn check_equivalent(before: &Circuit, after: &Circuit) -> Result<()> {
    let empty = Bindings::new();
    let order: Vec<Qubit> = before.all_qubits().into_iter().collect();
    let u_before = qmoment_compile::circuit_unitary_with_order(before, &order, &empty)?;
    let u_after = qmoment_compile::circuit_unitary_with_order(after, &order, &empty)?;
    if !allclose_up_to_global_phase(&u_before, &u_after, 1e-8) {
        bail!("rewritten circuit changed the unitary");
    }
    print_result("Equivalent up to global phase", "yes");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    print_header("Unitaries and Decompositions Demo");
    let [a, b, c] = [Qubit::line(0), Qubit::line(1), Qubit::line(2)];

    print_section("Circuit Unitary");
    let mut bell = Circuit::new();
    bell.h(a)?.cx(a, b)?;
    print_circuit(&bell);
    let u = circuit_unitary(&bell, &Bindings::new())?;
    for line in format_matrix(&u, 3).lines() {
        println!("    {line}");
    }

    print_section("Hadamard into X and Y");
    let decomposer = Decomposer::new(Arc::new(RuleRegistry::standard()), GateSet::xy());
    let h = StandardGate::h().on([a])?;
    let lowered = decomposer.decompose(&h, None)?;
    let rendered: Vec<String> = lowered.iter().map(ToString::to_string).collect();
    print_result("H(q0)", rendered.join(", "));
    check_equivalent(
        &Circuit::from_operations([h])?,
        &Circuit::from_operations(lowered)?,
    )?;

    print_section("Toffoli into CZ and Rotations");
    let mut toffoli = Circuit::new();
    toffoli.append([StandardGate::ccx().on([a, b, c])?], InsertStrategy::Earliest)?;
    let original = toffoli.clone();
    let (pm, mut props) = PassManagerBuilder::new()
        .with_target(GateSet::cz_rotations())
        .with_optimization_level(0)
        .build();
    pm.run(&mut toffoli, &mut props)?;
    let two_qubit = toffoli
        .all_operations()
        .filter(|op| op.num_qubits() == 2)
        .count();
    print_result("Target", GateSet::cz_rotations());
    print_result("Operations", toffoli.num_operations());
    print_result("Two-qubit operations", two_qubit);
    print_result("Moments", toffoli.len());
    check_equivalent(&original, &toffoli)?;

    print_section("Device Without SWAP");
    let device = Arc::new(DeviceGraph::grid(2, 2, GateSet::cz_rotations()));
    let [g00, g01, g11] = [Qubit::grid(0, 0), Qubit::grid(0, 1), Qubit::grid(1, 1)];
    let mut on_device = Circuit::with_device(device.clone());
    on_device.append(
        [
            StandardGate::swap().on([g00, g01])?,
            StandardGate::cx().on([g00, g11])?,
        ],
        InsertStrategy::Earliest,
    )?;
    print_result("Device", device.name());
    print_result("Couplers", device.num_edges());
    print_result("Operations after append", on_device.num_operations());
    print_result(
        "All supported",
        on_device.all_operations().all(|op| device.is_supported(op)),
    );

    print_section("Merging Single-Qubit Runs");
    let merge = MergeSingleQubitGates::with_basis(args.basis.into());
    let merged = merge.optimize(&toffoli)?;
    print_result("Basis", format!("{:?}", merge.basis()));
    print_result("Operations before", toffoli.num_operations());
    print_result("Operations after", merged.num_operations());
    check_equivalent(&original, &merged)?;

    println!();
    print_success("Unitaries demo complete!");
    Ok(())
}
