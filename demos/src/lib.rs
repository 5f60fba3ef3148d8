//! qmoment Demo Suite
//!
//! Small tutorial programs walking through the qmoment stack:
//!
//! - **Gates and operations**: named gates, powers, unitaries
//! - **Circuits and moments**: insertion strategies and moment packing
//! - **Unitaries and decompositions**: target gate sets, devices, merging
//! - **Parameter sweeps**: Rabi oscillation over a linspace
//! - **Deutsch's algorithm**: one query decides whether `f` is constant
//!
//! The circuit builders live in [`circuits`] so the binaries and the
//! integration tests share them.

pub mod circuits;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use num_complex::Complex64;
use qmoment_ir::Matrix;
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, `warn` by default.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("#>-"));
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print a circuit with one indented line per moment.
pub fn print_circuit(circuit: &qmoment_ir::Circuit) {
    if circuit.is_empty() {
        println!("  (empty)");
    }
    for line in circuit.to_string().lines() {
        println!("  {line}");
    }
}

/// Render a matrix row by row with `precision` decimals.
///
/// Entries with a negligible imaginary part print as plain reals.
pub fn format_matrix(matrix: &Matrix, precision: usize) -> String {
    let cells: Vec<Vec<String>> = matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|z| format_complex(*z, precision)).collect())
        .collect();
    let width = cells
        .iter()
        .flatten()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0);

    cells
        .iter()
        .map(|row| {
            let row: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            format!("[{}]", row.join("  "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_complex(z: Complex64, precision: usize) -> String {
    let eps = 0.5 * 10f64.powi(-i32::try_from(precision).unwrap_or(i32::MAX));
    let clean = |x: f64| if x.abs() < eps { 0.0 } else { x };
    let (re, im) = (clean(z.re), clean(z.im));
    if im == 0.0 {
        format!("{re:.precision$}")
    } else if re == 0.0 {
        format!("{im:.precision$}i")
    } else {
        let sign = if im < 0.0 { '-' } else { '+' };
        format!("{re:.precision$}{sign}{:.precision$}i", im.abs())
    }
}
