//! Gates and Operations Demo
//!
//! Named gates, fractional powers and the unitaries behind them.

use anyhow::Result;
use clap::Parser;

use qmoment_compile::{operation_unitary, unitary::is_unitary};
use qmoment_demos::{
    format_matrix, init_tracing, print_header, print_info, print_result, print_section,
    print_success,
};
use qmoment_ir::{Bindings, Gate, Operation, Qubit, StandardGate};

#[derive(Parser, Debug)]
#[command(name = "demo-gates")]
#[command(about = "Show gates, powers and their unitaries")]
struct Args {
    /// Exponent applied to X, Y and ISWAP
    #[arg(short, long, default_value = "0.5")]
    exponent: f64,

    /// Decimals when printing matrices
    #[arg(short, long, default_value = "3")]
    precision: usize,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn show(op: &Operation, precision: usize) -> Result<()> {
    let matrix = operation_unitary(op, &Bindings::new())?;
    print_result("Operation", op);
    print_result("Unitary", if is_unitary(&matrix, 1e-10) { "yes" } else { "no" });
    for line in format_matrix(&matrix, precision).lines() {
        println!("    {line}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    print_header("Gates and Operations Demo");

    let [a, b] = [Qubit::line(0), Qubit::line(1)];
    let g = Qubit::grid(1, 1);

    print_section("Named Gates");
    show(&StandardGate::x().on([a])?, args.precision)?;
    show(&StandardGate::h().on([g])?, args.precision)?;
    show(&StandardGate::cz().on([a, b])?, args.precision)?;

    print_section("Fractional Powers");
    let t = args.exponent;
    show(&StandardGate::x().on([a])?.pow(t)?, args.precision)?;
    show(&StandardGate::y_pow(t).on([g])?, args.precision)?;
    show(&Gate::from(StandardGate::iswap()).pow(t)?.on([a, b])?, args.precision)?;

    print_section("Symbolic Parameters");
    let op = StandardGate::Rx("theta".into()).on([a])?;
    print_result("Operation", &op);
    print_result("Parameterized", op.is_parameterized());
    match op.unitary(&Bindings::new()) {
        Ok(_) => print_info("unexpectedly resolved without bindings"),
        Err(e) => print_result("Without bindings", e),
    }
    let bindings = Bindings::new().with("theta", std::f64::consts::FRAC_PI_2);
    print_result("Bound to", &bindings);
    show(&op.with_bindings(&bindings)?, args.precision)?;

    print_section("Validation");
    match StandardGate::cx().on([a]) {
        Ok(op) => print_info(&format!("accepted {op}")),
        Err(e) => print_result("CX on one qubit", e),
    }
    match StandardGate::cz().on([b, b]) {
        Ok(op) => print_info(&format!("accepted {op}")),
        Err(e) => print_result("CZ on a repeated qubit", e),
    }

    println!();
    print_success("Gates demo complete!");
    Ok(())
}
