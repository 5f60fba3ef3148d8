//! Simulator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::statevector::MAX_SUPPORTED_QUBITS;

fn default_max_qubits() -> usize {
    20
}

/// Settings for a [`Simulator`](crate::Simulator).
///
/// ```
/// use qmoment_sim::SimulatorConfig;
///
/// let config = SimulatorConfig::from_json(r#"{ "seed": 7 }"#).unwrap();
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.max_qubits, 20);
/// assert!(!config.parallel);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Base seed. Without one, every run draws a fresh seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Evaluate sweep points on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,

    /// Widest circuit the simulator accepts, capped at
    /// [`MAX_SUPPORTED_QUBITS`].
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            parallel: false,
            max_qubits: default_max_qubits(),
        }
    }
}

impl SimulatorConfig {
    /// Defaults overridden by environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `QMOMENT_SEED` | `seed` |
    /// | `QMOMENT_PARALLEL` | `parallel` (`1`/`true`/`yes`) |
    /// | `QMOMENT_MAX_QUBITS` | `max_qubits` |
    ///
    /// Values that do not parse are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(seed) = std::env::var("QMOMENT_SEED") {
            if let Ok(val) = seed.parse() {
                config.seed = Some(val);
            }
        }
        if let Ok(parallel) = std::env::var("QMOMENT_PARALLEL") {
            config.parallel = matches!(
                parallel.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
        if let Ok(max) = std::env::var("QMOMENT_MAX_QUBITS") {
            if let Ok(val) = max.parse() {
                config.max_qubits = val;
            }
        }

        config
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Set the base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable parallel sweep evaluation.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the qubit limit.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// The limit actually enforced.
    pub fn qubit_limit(&self) -> usize {
        self.max_qubits.min(MAX_SUPPORTED_QUBITS)
    }
}
