//! `PropertySet` and related types for pass communication.
//!
//! The [`PropertySet`] is the shared context handed to every compilation
//! pass. It carries the target [`GateSet`], an optional device and rule
//! registry, and a type-keyed store for anything else passes want to share.
//!
//! # Examples
//!
//! ```
//! use qmoment_compile::{GateSet, PropertySet};
//!
//! let props = PropertySet::new().with_target(GateSet::cz_rotations());
//! assert!(props.target.as_ref().unwrap().contains_name("cz"));
//! ```
//!
//! ## Custom properties for pass communication
//!
//! ```
//! use qmoment_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Notes {
//!     rewritten: usize,
//! }
//!
//! let mut props = PropertySet::new();
//! props.insert(Notes { rewritten: 4 });
//! assert_eq!(props.get::<Notes>().unwrap().rewritten, 4);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use qmoment_ir::{Device, Gate};

use crate::rules::RuleRegistry;

/// A set of gate family names a circuit may use.
///
/// Families are the lowercase names returned by [`Gate::name`] (`"x"`,
/// `"cz"`, `"rz"`, …). Measurements are members of every gate set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    gates: BTreeSet<String>,
}

impl GateSet {
    /// Create a gate set from family names.
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            gates: gates.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a family is in the set.
    pub fn contains_name(&self, family: &str) -> bool {
        self.gates.contains(family)
    }

    /// Check if a gate's family is in the set.
    pub fn contains(&self, gate: &Gate) -> bool {
        gate.is_measurement() || self.contains_name(gate.name())
    }

    /// Family names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.gates.iter().map(String::as_str)
    }

    /// Add a family.
    #[must_use]
    pub fn with(mut self, family: impl Into<String>) -> Self {
        self.gates.insert(family.into());
        self
    }

    /// Remove a family.
    #[must_use]
    pub fn without(mut self, family: &str) -> Self {
        self.gates.remove(family);
        self
    }

    /// Rotations, Paulis, `U` and `CZ`.
    pub fn cz_rotations() -> Self {
        Self::new(["rx", "ry", "rz", "u", "x", "y", "z", "cz"])
    }

    /// Rotations, Paulis, `U`, `H` and `CX`.
    pub fn cx_rotations() -> Self {
        Self::new(["rx", "ry", "rz", "u", "x", "y", "z", "h", "cx"])
    }

    /// Only `X` and `Y` powers.
    pub fn xy() -> Self {
        Self::new(["x", "y"])
    }
}

impl fmt::Display for GateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, g) in self.gates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{g}")?;
        }
        write!(f, "}}")
    }
}

/// Properties shared between compilation passes.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `target` | [`GateSet`] | Gate families the output may use |
/// | `device` | [`Device`] | Connectivity and native-gate constraints |
/// | `registry` | [`RuleRegistry`] | Rewrite rules for decomposition |
///
/// Passes can also store arbitrary data using the type-safe
/// [`insert`](Self::insert) and [`get`](Self::get) methods. Each type can
/// have at most one value stored.
#[derive(Default)]
pub struct PropertySet {
    /// Gate families the compiled circuit may use.
    pub target: Option<GateSet>,

    /// Device the compiled circuit must run on.
    ///
    /// When unset, passes fall back to the circuit's own device.
    pub device: Option<Arc<dyn Device>>,

    /// Rewrite rules. When unset, passes use [`RuleRegistry::standard`].
    pub registry: Option<Arc<RuleRegistry>>,

    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target gate set.
    #[must_use]
    pub fn with_target(mut self, target: GateSet) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the device.
    #[must_use]
    pub fn with_device(mut self, device: Arc<dyn Device>) -> Self {
        self.device = Some(device);
        self
    }

    /// Set the rule registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}

impl fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySet")
            .field("target", &self.target)
            .field("device", &self.device.as_ref().map(|d| d.name().to_string()))
            .field("registry", &self.registry)
            .field("custom", &self.custom.len())
            .finish()
    }
}
