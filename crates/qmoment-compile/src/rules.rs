//! Rewrite rules for the decomposition engine.
//!
//! A [`RewriteRule`] turns one operation into an equivalent sequence of
//! operations, or declines with `Ok(None)`. Rules live in a
//! [`RuleRegistry`] keyed by gate family, plus an ordered list of fallbacks
//! tried for every family. The first rule that matches wins.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use qmoment_ir::{Bindings, Device, IrError, IrResult, Operation, Qubit, StandardGate};

use crate::property::GateSet;
use crate::unitary::Unitary2x2;

/// What a rule may look at besides the operation itself.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    /// Gate families the rewrite is heading for.
    pub target: &'a GateSet,
    /// Device constraints, if any.
    pub device: Option<&'a dyn Device>,
}

impl<'a> RuleContext<'a> {
    /// Create a context.
    pub fn new(target: &'a GateSet, device: Option<&'a dyn Device>) -> Self {
        Self { target, device }
    }
}

/// A single rewrite step.
pub trait RewriteRule: Send + Sync {
    /// Rule name, for logs and diagnostics.
    fn name(&self) -> &str;

    /// Rewrite `op`, or return `Ok(None)` if the rule does not apply.
    fn rewrite(&self, op: &Operation, ctx: &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>>;
}

type RuleFn = dyn Fn(&Operation, &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>> + Send + Sync;

/// A rule backed by a closure.
pub struct FnRule {
    name: String,
    f: Box<RuleFn>,
}

impl FnRule {
    /// Wrap a closure as a rule.
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&Operation, &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }
}

impl RewriteRule for FnRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn rewrite(&self, op: &Operation, ctx: &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>> {
        (self.f)(op, ctx)
    }
}

// =========================================================================
// Registry
// =========================================================================

/// Rules by gate family, plus fallbacks tried after the family's own rules.
#[derive(Default, Clone)]
pub struct RuleRegistry {
    by_family: FxHashMap<String, Vec<Arc<dyn RewriteRule>>>,
    fallbacks: Vec<Arc<dyn RewriteRule>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rule table.
    ///
    /// | Family | Rules, in priority order |
    /// |--------|--------------------------|
    /// | `swap` | `swap_to_cx` |
    /// | `ccx` | `ccx_to_cx` |
    /// | `cx` | `route`, `cx_to_cz` |
    /// | `cz` | `route`, `cz_to_cx` |
    /// | `iswap` | `route` |
    /// | `h` | `h_to_xy` |
    /// | `cswap` | `cswap_to_ccx` |
    /// | any | `single_qubit_euler` |
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("swap", SwapToCx);
        registry.register("ccx", CcxToCx);
        registry.register("cx", Route);
        registry.register("cx", CxToCz);
        registry.register("cz", Route);
        registry.register("cz", CzToCx);
        registry.register("iswap", Route);
        registry.register("h", HToXy);
        registry.register("cswap", CswapToCcx);
        registry.register_fallback(SingleQubitEuler);
        registry
    }

    /// Append a rule for `family`, after the rules already registered for it.
    pub fn register(&mut self, family: impl Into<String>, rule: impl RewriteRule + 'static) {
        self.by_family
            .entry(family.into())
            .or_default()
            .push(Arc::new(rule));
    }

    /// Append a rule tried for every family.
    pub fn register_fallback(&mut self, rule: impl RewriteRule + 'static) {
        self.fallbacks.push(Arc::new(rule));
    }

    /// Append a closure rule for `family`.
    pub fn register_fn(
        &mut self,
        family: impl Into<String>,
        name: impl Into<String>,
        f: impl Fn(&Operation, &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>>
        + Send
        + Sync
        + 'static,
    ) {
        self.register(family, FnRule::new(name, f));
    }

    /// Rules for `family` in priority order, fallbacks last.
    pub fn rules_for<'a>(&'a self, family: &str) -> impl Iterator<Item = &'a dyn RewriteRule> {
        self.by_family
            .get(family)
            .into_iter()
            .flatten()
            .chain(&self.fallbacks)
            .map(|rule| -> &'a dyn RewriteRule { &**rule })
    }

    /// Apply the first matching rule.
    ///
    /// Returns the rule name with its output, or `None` if nothing matched.
    pub fn apply<'a>(
        &'a self,
        op: &Operation,
        ctx: &RuleContext<'_>,
    ) -> IrResult<Option<(&'a str, Vec<Operation>)>> {
        for rule in self.rules_for(op.name()) {
            if let Some(out) = rule.rewrite(op, ctx)? {
                return Ok(Some((rule.name(), out)));
            }
        }
        Ok(None)
    }

    /// Number of registered rules, fallbacks included.
    pub fn len(&self) -> usize {
        self.by_family.values().map(Vec::len).sum::<usize>() + self.fallbacks.len()
    }

    /// Check if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut families: Vec<_> = self
            .by_family
            .iter()
            .map(|(family, rules)| {
                let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
                (family.as_str(), names)
            })
            .collect();
        families.sort_unstable();
        let fallbacks: Vec<&str> = self.fallbacks.iter().map(|r| r.name()).collect();
        f.debug_struct("RuleRegistry")
            .field("by_family", &families)
            .field("fallbacks", &fallbacks)
            .finish()
    }
}

// =========================================================================
// Standard rules
// =========================================================================

fn standard_of(op: &Operation) -> Option<&StandardGate> {
    op.gate().as_standard()
}

fn is_full_turn(gate: &StandardGate) -> bool {
    gate.exponent().is_some_and(|t| t.is_constant(1.0))
}

/// `SWAP^t(a, b)` → `CX(a, b) CX^t(b, a) CX(a, b)`.
pub struct SwapToCx;

impl RewriteRule for SwapToCx {
    fn name(&self) -> &str {
        "swap_to_cx"
    }

    fn rewrite(&self, op: &Operation, _ctx: &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>> {
        let Some(StandardGate::Swap(t)) = standard_of(op) else {
            return Ok(None);
        };
        let [a, b] = [op.qubits()[0], op.qubits()[1]];
        Ok(Some(vec![
            StandardGate::cx().on([a, b])?,
            StandardGate::CX(t.clone()).on([b, a])?,
            StandardGate::cx().on([a, b])?,
        ]))
    }
}

/// Toffoli → `H`, `T`, `T†` and six `CX`.
pub struct CcxToCx;

impl RewriteRule for CcxToCx {
    fn name(&self) -> &str {
        "ccx_to_cx"
    }

    fn rewrite(&self, op: &Operation, _ctx: &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>> {
        match standard_of(op) {
            Some(g @ StandardGate::CCX(_)) if is_full_turn(g) => {}
            _ => return Ok(None),
        }
        let [a, b, c] = [op.qubits()[0], op.qubits()[1], op.qubits()[2]];
        let h = |q: Qubit| StandardGate::h().on([q]);
        let t = |q: Qubit| StandardGate::t().on([q]);
        let tdg = |q: Qubit| StandardGate::tdg().on([q]);
        let cx = |x: Qubit, y: Qubit| StandardGate::cx().on([x, y]);

        Ok(Some(vec![
            h(c)?,
            cx(b, c)?,
            tdg(c)?,
            cx(a, c)?,
            t(c)?,
            cx(b, c)?,
            tdg(c)?,
            cx(a, c)?,
            t(b)?,
            t(c)?,
            h(c)?,
            cx(a, b)?,
            t(a)?,
            tdg(b)?,
            cx(a, b)?,
        ]))
    }
}

/// `CX^t(c, t)` → `H(t) CZ^t(c, t) H(t)`, when the target has `cz`.
pub struct CxToCz;

impl RewriteRule for CxToCz {
    fn name(&self) -> &str {
        "cx_to_cz"
    }

    fn rewrite(&self, op: &Operation, ctx: &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>> {
        let Some(StandardGate::CX(t)) = standard_of(op) else {
            return Ok(None);
        };
        if !ctx.target.contains_name("cz") {
            return Ok(None);
        }
        let [c, x] = [op.qubits()[0], op.qubits()[1]];
        Ok(Some(vec![
            StandardGate::h().on([x])?,
            StandardGate::CZ(t.clone()).on([c, x])?,
            StandardGate::h().on([x])?,
        ]))
    }
}

/// `CZ^t(a, b)` → `H(b) CX^t(a, b) H(b)`, when the target has `cx`.
pub struct CzToCx;

impl RewriteRule for CzToCx {
    fn name(&self) -> &str {
        "cz_to_cx"
    }

    fn rewrite(&self, op: &Operation, ctx: &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>> {
        let Some(StandardGate::CZ(t)) = standard_of(op) else {
            return Ok(None);
        };
        if !ctx.target.contains_name("cx") {
            return Ok(None);
        }
        let [a, b] = [op.qubits()[0], op.qubits()[1]];
        Ok(Some(vec![
            StandardGate::h().on([b])?,
            StandardGate::CX(t.clone()).on([a, b])?,
            StandardGate::h().on([b])?,
        ]))
    }
}

/// Move the first qubit of a two-qubit operation next to the second.
///
/// Along a shortest device path `p0 … pk` from the first qubit to the
/// second, emits `SWAP(p0, p1) … SWAP(pk-2, pk-1)`, the operation on
/// `(pk-1, pk)`, then the swaps in reverse so every qubit ends where it
/// started. Declines without a device, when the qubits are already adjacent,
/// or when no path exists.
pub struct Route;

impl RewriteRule for Route {
    fn name(&self) -> &str {
        "route"
    }

    fn rewrite(&self, op: &Operation, ctx: &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>> {
        let Some(device) = ctx.device else {
            return Ok(None);
        };
        if op.num_qubits() != 2 || op.is_measurement() {
            return Ok(None);
        }
        let [from, to] = [op.qubits()[0], op.qubits()[1]];
        if device.qubits_adjacent(&from, &to) {
            return Ok(None);
        }
        let Some(path) = device.path(&from, &to) else {
            return Ok(None);
        };
        if path.len() < 3 {
            return Ok(None);
        }

        let swaps = path[..path.len() - 1]
            .windows(2)
            .map(|w| StandardGate::swap().on([w[0], w[1]]))
            .collect::<IrResult<Vec<_>>>()?;
        let last = path[path.len() - 2];

        let mut out = Vec::with_capacity(2 * swaps.len() + 1);
        out.extend(swaps.iter().cloned());
        out.push(op.gate().on([last, to])?);
        out.extend(swaps.into_iter().rev());
        Ok(Some(out))
    }
}

/// `H` → `Y^0.5` then `X`, when the target has `x` and `y`.
///
/// Equal to `H` up to a global phase of `e^{iπ/4}`.
pub struct HToXy;

impl RewriteRule for HToXy {
    fn name(&self) -> &str {
        "h_to_xy"
    }

    fn rewrite(&self, op: &Operation, ctx: &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>> {
        match standard_of(op) {
            Some(g @ StandardGate::H(_)) if is_full_turn(g) => {}
            _ => return Ok(None),
        }
        if !(ctx.target.contains_name("x") && ctx.target.contains_name("y")) {
            return Ok(None);
        }
        let q = op.qubits()[0];
        Ok(Some(vec![
            StandardGate::y_pow(0.5).on([q])?,
            StandardGate::x().on([q])?,
        ]))
    }
}

/// Fredkin `(c, t1, t2)` → `CX(t2, t1) CCX(c, t1, t2) CX(t2, t1)`.
pub struct CswapToCcx;

impl RewriteRule for CswapToCcx {
    fn name(&self) -> &str {
        "cswap_to_ccx"
    }

    fn rewrite(&self, op: &Operation, _ctx: &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>> {
        if !matches!(standard_of(op), Some(StandardGate::CSwap)) {
            return Ok(None);
        }
        let [c, t1, t2] = [op.qubits()[0], op.qubits()[1], op.qubits()[2]];
        Ok(Some(vec![
            StandardGate::cx().on([t2, t1])?,
            StandardGate::ccx().on([c, t1, t2])?,
            StandardGate::cx().on([t2, t1])?,
        ]))
    }
}

/// Any constant single-qubit unitary → Euler angles.
///
/// Emits one `U(β, α, γ)` if the target has `u`, otherwise
/// `Rz(γ) Ry(β) Rz(α)` if it has `rz` and `ry`. Equal to the input up to a
/// global phase.
pub struct SingleQubitEuler;

impl RewriteRule for SingleQubitEuler {
    fn name(&self) -> &str {
        "single_qubit_euler"
    }

    fn rewrite(&self, op: &Operation, ctx: &RuleContext<'_>) -> IrResult<Option<Vec<Operation>>> {
        if op.num_qubits() != 1 || op.is_measurement() || op.is_parameterized() {
            return Ok(None);
        }
        let q = op.qubits()[0];
        if ctx.device.is_some_and(|d| !d.qubits().contains(&q)) {
            return Ok(None);
        }
        let use_u = ctx.target.contains_name("u");
        let use_zyz = ctx.target.contains_name("rz") && ctx.target.contains_name("ry");
        if !use_u && !use_zyz {
            return Ok(None);
        }
        let matrix = match op.unitary(&Bindings::new()) {
            Ok(m) => m,
            Err(IrError::NonUnitary { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let Some(u) = Unitary2x2::from_matrix(&matrix) else {
            return Ok(None);
        };
        let (alpha, beta, gamma, _phase) = u.zyz_decomposition();

        let out = if use_u {
            vec![StandardGate::U(beta.into(), alpha.into(), gamma.into()).on([q])?]
        } else {
            vec![
                StandardGate::Rz(gamma.into()).on([q])?,
                StandardGate::Ry(beta.into()).on([q])?,
                StandardGate::Rz(alpha.into()).on([q])?,
            ]
        };
        Ok(Some(out))
    }
}
