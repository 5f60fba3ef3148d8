//! Parameter sweeps: finite ordered sequences of bindings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::iter;

use qmoment_ir::Bindings;

use crate::error::{SimError, SimResult};

/// A finite, ordered sequence of parameter bindings.
///
/// ```
/// use qmoment_sim::Sweep;
///
/// let sweep = Sweep::product(vec![
///     Sweep::points("a", [0.0, 1.0]),
///     Sweep::linspace("b", 0.0, 1.0, 3),
/// ])
/// .unwrap();
/// assert_eq!(sweep.len(), 6);
///
/// let first = sweep.bindings().next().unwrap();
/// assert_eq!(first.get("a"), Some(0.0));
/// assert_eq!(first.get("b"), Some(0.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Sweep {
    /// A single empty binding.
    #[default]
    Unit,
    /// Explicit values for one parameter.
    Points {
        /// Parameter name.
        key: String,
        /// Values in order.
        values: Vec<f64>,
    },
    /// `length` evenly spaced values from `start` to `stop`, both included.
    Linspace {
        /// Parameter name.
        key: String,
        /// First value.
        start: f64,
        /// Last value.
        stop: f64,
        /// Number of values.
        length: usize,
    },
    /// Explicit binding sets.
    List(Vec<Bindings>),
    /// Cartesian product; the first factor varies slowest.
    Product(Vec<Sweep>),
    /// Element-wise combination, as long as the shortest factor.
    Zip(Vec<Sweep>),
}

impl Sweep {
    /// Sweep one parameter over explicit values.
    pub fn points(key: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Sweep::Points {
            key: key.into(),
            values: values.into_iter().collect(),
        }
    }

    /// Sweep one parameter over an evenly spaced range.
    pub fn linspace(key: impl Into<String>, start: f64, stop: f64, length: usize) -> Self {
        Sweep::Linspace {
            key: key.into(),
            start,
            stop,
            length,
        }
    }

    /// Sweep over explicit binding sets.
    pub fn list(bindings: impl IntoIterator<Item = Bindings>) -> Self {
        Sweep::List(bindings.into_iter().collect())
    }

    /// Cartesian product of sweeps over disjoint parameters.
    pub fn product(factors: Vec<Sweep>) -> SimResult<Self> {
        check_disjoint(&factors)?;
        Ok(Sweep::Product(factors))
    }

    /// Element-wise combination of sweeps over disjoint parameters.
    pub fn zip(factors: Vec<Sweep>) -> SimResult<Self> {
        check_disjoint(&factors)?;
        Ok(Sweep::Zip(factors))
    }

    /// Parameters assigned by this sweep.
    pub fn keys(&self) -> BTreeSet<String> {
        match self {
            Sweep::Unit => BTreeSet::new(),
            Sweep::Points { key, .. } | Sweep::Linspace { key, .. } => {
                BTreeSet::from([key.clone()])
            }
            Sweep::List(list) => list
                .iter()
                .flat_map(|b| b.keys().map(str::to_string))
                .collect(),
            Sweep::Product(factors) | Sweep::Zip(factors) => {
                factors.iter().flat_map(Sweep::keys).collect()
            }
        }
    }

    /// Number of binding sets.
    pub fn len(&self) -> usize {
        match self {
            Sweep::Unit => 1,
            Sweep::Points { values, .. } => values.len(),
            Sweep::Linspace { length, .. } => *length,
            Sweep::List(list) => list.len(),
            Sweep::Product(factors) => factors.iter().map(Sweep::len).product(),
            Sweep::Zip(factors) => factors.iter().map(Sweep::len).min().unwrap_or(0),
        }
    }

    /// Check if the sweep yields no binding sets.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check structural soundness.
    ///
    /// Fails with [`SimError::DuplicateSweepKey`] if combined factors share a
    /// parameter and [`SimError::InvalidSweep`] on non-finite values.
    pub fn validate(&self) -> SimResult<()> {
        match self {
            Sweep::Unit => Ok(()),
            Sweep::Points { key, values } => {
                if values.iter().all(|v| v.is_finite()) {
                    Ok(())
                } else {
                    Err(SimError::InvalidSweep(format!("non-finite value for '{key}'")))
                }
            }
            Sweep::Linspace {
                key, start, stop, ..
            } => {
                if start.is_finite() && stop.is_finite() {
                    Ok(())
                } else {
                    Err(SimError::InvalidSweep(format!("non-finite range for '{key}'")))
                }
            }
            Sweep::List(list) => match list
                .iter()
                .flat_map(Bindings::iter)
                .find(|(_, v)| !v.is_finite())
            {
                Some((key, _)) => Err(SimError::InvalidSweep(format!(
                    "non-finite value for '{key}'"
                ))),
                None => Ok(()),
            },
            Sweep::Product(factors) | Sweep::Zip(factors) => {
                check_disjoint(factors)?;
                factors.iter().try_for_each(Sweep::validate)
            }
        }
    }

    /// The binding sets, lazily, in sweep order.
    pub fn bindings(&self) -> Box<dyn Iterator<Item = Bindings> + '_> {
        match self {
            Sweep::Unit => Box::new(iter::once(Bindings::new())),
            Sweep::Points { key, values } => Box::new(
                values
                    .iter()
                    .map(move |v| Bindings::new().with(key.clone(), *v)),
            ),
            Sweep::Linspace {
                key,
                start,
                stop,
                length,
            } => {
                let (start, stop, length) = (*start, *stop, *length);
                Box::new((0..length).map(move |i| {
                    Bindings::new().with(key.clone(), linspace_value(start, stop, length, i))
                }))
            }
            Sweep::List(list) => Box::new(list.iter().cloned()),
            Sweep::Product(factors) => product_iter(factors),
            Sweep::Zip(factors) => {
                if factors.is_empty() {
                    return Box::new(iter::empty());
                }
                let mut iters: Vec<_> = factors.iter().map(Sweep::bindings).collect();
                Box::new(iter::from_fn(move || {
                    let mut acc = Bindings::new();
                    for it in &mut iters {
                        acc = acc.merge(&it.next()?);
                    }
                    Some(acc)
                }))
            }
        }
    }
}

impl From<Bindings> for Sweep {
    fn from(bindings: Bindings) -> Self {
        Sweep::List(vec![bindings])
    }
}

fn linspace_value(start: f64, stop: f64, length: usize, i: usize) -> f64 {
    if length <= 1 {
        return start;
    }
    #[allow(clippy::cast_precision_loss)]
    let fraction = i as f64 / (length - 1) as f64;
    start + (stop - start) * fraction
}

fn product_iter(factors: &[Sweep]) -> Box<dyn Iterator<Item = Bindings> + '_> {
    match factors.split_first() {
        None => Box::new(iter::once(Bindings::new())),
        Some((first, rest)) => Box::new(
            first
                .bindings()
                .flat_map(move |outer| product_iter(rest).map(move |inner| outer.merge(&inner))),
        ),
    }
}

fn check_disjoint(factors: &[Sweep]) -> SimResult<()> {
    let mut seen = BTreeSet::new();
    for factor in factors {
        for key in factor.keys() {
            if !seen.insert(key.clone()) {
                return Err(SimError::DuplicateSweepKey(key));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(sweep: &Sweep, key: &str) -> Vec<f64> {
        sweep.bindings().map(|b| b.get(key).unwrap()).collect()
    }

    #[test]
    fn test_unit() {
        let sweep = Sweep::Unit;
        assert_eq!(sweep.len(), 1);
        assert_eq!(sweep.bindings().collect::<Vec<_>>(), vec![Bindings::new()]);
    }

    #[test]
    fn test_linspace_endpoints() {
        let sweep = Sweep::linspace("t", 0.0, 2.0, 5);
        assert_eq!(values(&sweep, "t"), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(values(&Sweep::linspace("t", 3.0, 9.0, 1), "t"), vec![3.0]);
        assert!(Sweep::linspace("t", 0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_product_order() {
        let sweep = Sweep::product(vec![
            Sweep::points("a", [1.0, 2.0]),
            Sweep::points("b", [10.0, 20.0, 30.0]),
        ])
        .unwrap();
        let pairs: Vec<(f64, f64)> = sweep
            .bindings()
            .map(|b| (b.get("a").unwrap(), b.get("b").unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (1.0, 10.0),
                (1.0, 20.0),
                (1.0, 30.0),
                (2.0, 10.0),
                (2.0, 20.0),
                (2.0, 30.0)
            ]
        );
        assert_eq!(sweep.len(), pairs.len());
    }

    #[test]
    fn test_zip_truncates() {
        let sweep = Sweep::zip(vec![
            Sweep::points("a", [1.0, 2.0, 3.0]),
            Sweep::linspace("b", 0.0, 1.0, 2),
        ])
        .unwrap();
        assert_eq!(sweep.len(), 2);
        assert_eq!(values(&sweep, "a"), vec![1.0, 2.0]);
        assert_eq!(values(&sweep, "b"), vec![0.0, 1.0]);
    }

    #[test]
    fn test_empty_combinations() {
        assert_eq!(Sweep::Product(vec![]).len(), 1);
        assert_eq!(Sweep::Product(vec![]).bindings().count(), 1);
        assert_eq!(Sweep::Zip(vec![]).len(), 0);
        assert_eq!(Sweep::Zip(vec![]).bindings().count(), 0);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let err = Sweep::product(vec![
            Sweep::points("a", [1.0]),
            Sweep::linspace("a", 0.0, 1.0, 2),
        ])
        .unwrap_err();
        assert!(matches!(err, SimError::DuplicateSweepKey(k) if k == "a"));

        let nested = Sweep::Zip(vec![Sweep::points("x", [1.0]), Sweep::points("x", [2.0])]);
        assert!(matches!(
            nested.validate(),
            Err(SimError::DuplicateSweepKey(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            Sweep::points("a", [f64::NAN]).validate(),
            Err(SimError::InvalidSweep(_))
        ));
        assert!(matches!(
            Sweep::list([Bindings::new().with("a", f64::INFINITY)]).validate(),
            Err(SimError::InvalidSweep(_))
        ));
        assert!(Sweep::linspace("a", 0.0, 1.0, 4).validate().is_ok());
    }

    #[test]
    fn test_keys() {
        let sweep = Sweep::product(vec![
            Sweep::list([Bindings::new().with("x", 1.0).with("y", 2.0)]),
            Sweep::points("z", [0.0]),
        ])
        .unwrap();
        let keys: Vec<String> = sweep.keys().into_iter().collect();
        assert_eq!(keys, ["x", "y", "z"]);
    }
}
