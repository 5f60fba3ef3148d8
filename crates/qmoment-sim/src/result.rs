//! Results of simulation runs.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use qmoment_ir::Bindings;

use crate::error::{SimError, SimResult};

/// Measurements of one sweep point.
///
/// For every measurement key, one row of bits per repetition, in the
/// measured qubits' order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResult {
    params: Bindings,
    repetitions: usize,
    measurements: BTreeMap<String, Vec<Vec<bool>>>,
}

impl TrialResult {
    pub(crate) fn new(
        params: Bindings,
        repetitions: usize,
        measurements: BTreeMap<String, Vec<Vec<bool>>>,
    ) -> Self {
        Self {
            params,
            repetitions,
            measurements,
        }
    }

    /// The bindings this point was run with.
    pub fn params(&self) -> &Bindings {
        &self.params
    }

    /// Number of repetitions.
    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Measurement keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.measurements.keys().map(String::as_str)
    }

    /// Bit rows recorded under `key`.
    pub fn measurements(&self, key: &str) -> SimResult<&[Vec<bool>]> {
        self.measurements
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| SimError::UnknownMeasurementKey(key.to_string()))
    }

    /// Counts of each outcome under `key`.
    ///
    /// Each row is read as a big-endian integer: the first measured qubit is
    /// the most significant bit.
    pub fn histogram(&self, key: &str) -> SimResult<Histogram> {
        let mut counts = BTreeMap::new();
        for row in self.measurements(key)? {
            let value = row.iter().fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit));
            *counts.entry(value).or_insert(0) += 1;
        }
        Ok(Histogram { counts })
    }

    /// Fraction of repetitions in which the first qubit under `key` read 1.
    pub fn fraction_of_ones(&self, key: &str) -> SimResult<f64> {
        let rows = self.measurements(key)?;
        let ones = rows.iter().filter(|r| r.first().copied().unwrap_or(false)).count();
        #[allow(clippy::cast_precision_loss)]
        Ok(ones as f64 / rows.len().max(1) as f64)
    }
}

impl fmt::Display for TrialResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "params: {}", self.params)?;
        for (key, rows) in &self.measurements {
            let rows: Vec<String> = rows
                .iter()
                .map(|row| row.iter().map(|&b| if b { '1' } else { '0' }).collect())
                .collect();
            write!(f, "\n{key}={}", rows.join(" "))?;
        }
        Ok(())
    }
}

/// Outcome counts for one measurement key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Histogram {
    counts: BTreeMap<u64, usize>,
}

impl Histogram {
    /// Count of `value`, zero if never seen.
    pub fn get(&self, value: u64) -> usize {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Total number of recorded outcomes.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The most frequent outcome, lowest value on ties.
    pub fn most_common(&self) -> Option<(u64, usize)> {
        self.counts
            .iter()
            .map(|(&v, &c)| (v, c))
            .fold(None, |best, (v, c)| match best {
                Some((_, bc)) if bc >= c => best,
                _ => Some((v, c)),
            })
    }

    /// `(value, count)` pairs in value order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.counts.iter().map(|(&v, &c)| (v, c))
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (value, count)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}: {count}")?;
        }
        write!(f, "}}")
    }
}
