//! Sweep-driven state-vector simulator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, instrument};

use qmoment_ir::{Bindings, Circuit, Qubit};

use crate::config::SimulatorConfig;
use crate::error::{SimError, SimResult};
use crate::result::TrialResult;
use crate::statevector::Statevector;
use crate::sweep::Sweep;

/// Odd constant spreading point indices across the seed space.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Cooperative cancellation flag shared between a caller and a running sweep.
///
/// The sweep checks the flag between points; points already finished are
/// returned.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A circuit checked and ready to be run at sweep points.
struct Prepared<'a> {
    circuit: &'a Circuit,
    qubits: Vec<Qubit>,
    repetitions: usize,
    base_seed: u64,
}

impl Prepared<'_> {
    fn rng_for(&self, index: usize) -> StdRng {
        StdRng::seed_from_u64(self.base_seed ^ (index as u64).wrapping_mul(SEED_STRIDE))
    }

    /// Run one sweep point.
    fn run_point(&self, index: usize, params: Bindings) -> SimResult<TrialResult> {
        let resolved = self.circuit.resolve(&params)?;
        let mut rng = self.rng_for(index);

        let measurements = if resolved.are_all_measurements_terminal() {
            self.sample_terminal(&resolved, &mut rng)?
        } else {
            self.sample_per_trial(&resolved, &mut rng)?
        };
        debug!(index, %params, "point done");
        Ok(TrialResult::new(params, self.repetitions, measurements))
    }

    /// Evolve once, then sample every repetition from the final state.
    fn sample_terminal(
        &self,
        circuit: &Circuit,
        rng: &mut StdRng,
    ) -> SimResult<BTreeMap<String, Vec<Vec<bool>>>> {
        let mut state = Statevector::new(self.qubits.clone())?;
        let mut targets = Vec::new();
        for op in circuit.all_operations() {
            match op.measurement_key() {
                Some(key) => targets.push((key.to_string(), state.axes(op.qubits())?)),
                None => state.apply_operation(op)?,
            }
        }

        let mut measurements: BTreeMap<String, Vec<Vec<bool>>> = targets
            .iter()
            .map(|(key, _)| (key.clone(), Vec::with_capacity(self.repetitions)))
            .collect();
        if targets.is_empty() {
            return Ok(measurements);
        }
        for index in state.sample_indices(rng, self.repetitions) {
            for (key, axes) in &targets {
                if let Some(rows) = measurements.get_mut(key) {
                    rows.push(state.bits_of(index, axes));
                }
            }
        }
        Ok(measurements)
    }

    /// Evolve a private state copy per repetition, collapsing at measurements.
    fn sample_per_trial(
        &self,
        circuit: &Circuit,
        rng: &mut StdRng,
    ) -> SimResult<BTreeMap<String, Vec<Vec<bool>>>> {
        let mut measurements: BTreeMap<String, Vec<Vec<bool>>> = circuit
            .measurement_keys()
            .into_iter()
            .map(|k| (k.to_string(), Vec::with_capacity(self.repetitions)))
            .collect();
        let initial = Statevector::new(self.qubits.clone())?;
        for _ in 0..self.repetitions {
            let mut state = initial.clone();
            for op in circuit.all_operations() {
                match op.measurement_key() {
                    Some(key) => {
                        let axes = state.axes(op.qubits())?;
                        let bits = state.measure(&axes, rng);
                        if let Some(rows) = measurements.get_mut(key) {
                            rows.push(bits);
                        }
                    }
                    None => state.apply_operation(op)?,
                }
            }
        }
        Ok(measurements)
    }
}

/// State-vector simulator driven by parameter sweeps.
///
/// ```
/// use qmoment_ir::{Circuit, InsertStrategy, Qubit, StandardGate};
/// use qmoment_sim::{Simulator, SimulatorConfig, Sweep};
///
/// let q = Qubit::line(0);
/// let mut circuit = Circuit::new();
/// circuit.append([StandardGate::x_pow("t").on([q])?], InsertStrategy::Earliest)?;
/// circuit.measure([q], "m")?;
///
/// let sim = Simulator::new(SimulatorConfig::default().with_seed(1));
/// let results = sim.run_sweep(&circuit, &Sweep::points("t", [0.0, 1.0]), 10)?;
/// assert_eq!(results[0].histogram("m")?.get(0), 10);
/// assert_eq!(results[1].histogram("m")?.get(1), 10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run `circuit` once with no parameters.
    pub fn run(&self, circuit: &Circuit, repetitions: i64) -> SimResult<TrialResult> {
        let mut results = self.run_sweep(circuit, &Sweep::Unit, repetitions)?;
        results
            .pop()
            .ok_or_else(|| SimError::InvalidSweep("unit sweep produced no point".into()))
    }

    /// Run `circuit` at every point of `sweep`, in sweep order.
    pub fn run_sweep(
        &self,
        circuit: &Circuit,
        sweep: &Sweep,
        repetitions: i64,
    ) -> SimResult<Vec<TrialResult>> {
        self.run_sweep_with_cancel(circuit, sweep, repetitions, &CancelToken::new())
    }

    /// Like [`run_sweep`](Self::run_sweep), stopping between points once
    /// `cancel` is set and returning the points completed so far.
    #[instrument(skip(self, circuit, sweep, cancel), fields(points = sweep.len(), parallel = self.config.parallel))]
    pub fn run_sweep_with_cancel(
        &self,
        circuit: &Circuit,
        sweep: &Sweep,
        repetitions: i64,
        cancel: &CancelToken,
    ) -> SimResult<Vec<TrialResult>> {
        let start = Instant::now();
        let prepared = self.prepare(circuit, sweep, repetitions)?;

        let results = if self.config.parallel {
            let points: Vec<Bindings> = sweep.bindings().collect();
            let outcomes: Vec<Option<SimResult<TrialResult>>> = points
                .into_par_iter()
                .enumerate()
                .map(|(index, params)| {
                    (!cancel.is_cancelled()).then(|| prepared.run_point(index, params))
                })
                .collect();

            let mut results = Vec::with_capacity(outcomes.len());
            for outcome in outcomes {
                match outcome {
                    Some(result) => results.push(result?),
                    None => break,
                }
            }
            results
        } else {
            let mut results = Vec::with_capacity(sweep.len());
            for (index, params) in sweep.bindings().enumerate() {
                if cancel.is_cancelled() {
                    break;
                }
                results.push(prepared.run_point(index, params)?);
            }
            results
        };

        info!(
            "Sweep finished: {} of {} points in {:?}",
            results.len(),
            sweep.len(),
            start.elapsed()
        );
        Ok(results)
    }

    /// Run the sweep lazily, one point per `next()`.
    ///
    /// Dropping the iterator stops the sweep. Points run sequentially
    /// regardless of [`SimulatorConfig::parallel`], with the same seeds as
    /// [`run_sweep`](Self::run_sweep).
    pub fn sweep_iter<'a>(
        &self,
        circuit: &'a Circuit,
        sweep: &'a Sweep,
        repetitions: i64,
    ) -> SimResult<SweepRun<'a>> {
        let prepared = self.prepare(circuit, sweep, repetitions)?;
        Ok(SweepRun {
            prepared,
            points: sweep.bindings(),
            index: 0,
            total: sweep.len(),
            failed: false,
        })
    }

    /// Final state of `circuit` under `bindings`.
    ///
    /// Mid-circuit measurements collapse the state along one sampled branch.
    pub fn simulate(&self, circuit: &Circuit, bindings: &Bindings) -> SimResult<Statevector> {
        let qubits = self.check_width(circuit)?;
        let resolved = circuit.resolve(bindings)?;
        let mut rng = StdRng::seed_from_u64(self.base_seed());
        let mut state = Statevector::new(qubits)?;
        for op in resolved.all_operations() {
            if op.is_measurement() {
                let axes = state.axes(op.qubits())?;
                state.measure(&axes, &mut rng);
            } else {
                state.apply_operation(op)?;
            }
        }
        Ok(state)
    }

    fn base_seed(&self) -> u64 {
        self.config
            .seed
            .unwrap_or_else(|| rand::thread_rng().r#gen())
    }

    fn check_width(&self, circuit: &Circuit) -> SimResult<Vec<Qubit>> {
        let qubits: Vec<Qubit> = circuit.all_qubits().into_iter().collect();
        let max = self.config.qubit_limit();
        if qubits.len() > max {
            return Err(SimError::TooManyQubits {
                requested: qubits.len(),
                max,
            });
        }
        Ok(qubits)
    }

    fn prepare<'a>(
        &self,
        circuit: &'a Circuit,
        sweep: &Sweep,
        repetitions: i64,
    ) -> SimResult<Prepared<'a>> {
        let repetitions = usize::try_from(repetitions)
            .ok()
            .filter(|&r| r > 0)
            .ok_or(SimError::InvalidRepetitions(repetitions))?;
        sweep.validate()?;
        let qubits = self.check_width(circuit)?;

        let mut seen = FxHashSet::default();
        for key in circuit.all_operations().filter_map(|op| op.measurement_key()) {
            if !seen.insert(key) {
                return Err(SimError::DuplicateMeasurementKey(key.to_string()));
            }
        }

        debug!(
            qubits = qubits.len(),
            repetitions,
            terminal = circuit.are_all_measurements_terminal(),
            "prepared circuit"
        );
        Ok(Prepared {
            circuit,
            qubits,
            repetitions,
            base_seed: self.base_seed(),
        })
    }
}

/// Lazy sweep execution returned by [`Simulator::sweep_iter`].
///
/// Yields one result per point in sweep order and stops after the first
/// error.
pub struct SweepRun<'a> {
    prepared: Prepared<'a>,
    points: Box<dyn Iterator<Item = Bindings> + 'a>,
    index: usize,
    total: usize,
    failed: bool,
}

impl SweepRun<'_> {
    /// Number of points in the whole sweep.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of points yielded so far.
    pub fn completed(&self) -> usize {
        self.index
    }
}

impl Iterator for SweepRun<'_> {
    type Item = SimResult<TrialResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let params = self.points.next()?;
        let result = self.prepared.run_point(self.index, params);
        self.index += 1;
        self.failed = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.total.saturating_sub(self.index);
        (0, Some(remaining))
    }
}
