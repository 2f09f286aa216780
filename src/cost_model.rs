//! Machine parameters: per-step costs and the cost-function shapes used by
//! the builtin table.
//!
//! Cost functions operate on argument **sizes** (`size::value_size` and
//! friends), never on full value wrappers, so that charging a builtin's
//! cost never itself allocates.

use hashbrown::HashMap;

use crate::budget::{ExBudget, StepKind};

/// One cost function shape. These are the shapes the reference cost model
/// actually uses; an implementation is not expected to invent others.
#[derive(Debug, Clone, PartialEq)]
pub enum CostFunction {
    Constant(i64),
    /// `intercept + slope * size(arg0)`.
    Linear { intercept: i64, slope: i64 },
    /// `intercept + slope * (size(arg0) + size(arg1))`.
    AddedSizes { intercept: i64, slope: i64 },
    /// `intercept + slope * (size(arg0) * size(arg1))`.
    MultipliedSizes { intercept: i64, slope: i64 },
    /// `intercept + slope * min(size(arg0), size(arg1))`.
    MinSize { intercept: i64, slope: i64 },
    /// `intercept + slope * max(size(arg0), size(arg1))`.
    MaxSize { intercept: i64, slope: i64 },
    /// `intercept + slope * max(size(arg0) - size(arg1), 0)`.
    SubtractedSizes { intercept: i64, slope: i64 },
}

impl CostFunction {
    /// Apply this cost function to the measured sizes of a builtin's
    /// arguments, in argument order.
    pub fn apply(&self, sizes: &[u64]) -> i64 {
        let s = |i: usize| sizes.get(i).copied().unwrap_or(0) as i64;
        match self {
            CostFunction::Constant(c) => *c,
            CostFunction::Linear { intercept, slope } => intercept + slope * s(0),
            CostFunction::AddedSizes { intercept, slope } => intercept + slope * (s(0) + s(1)),
            CostFunction::MultipliedSizes { intercept, slope } => intercept + slope * (s(0) * s(1)),
            CostFunction::MinSize { intercept, slope } => intercept + slope * s(0).min(s(1)),
            CostFunction::MaxSize { intercept, slope } => intercept + slope * s(0).max(s(1)),
            CostFunction::SubtractedSizes { intercept, slope } => {
                intercept + slope * (s(0) - s(1)).max(0)
            }
        }
    }
}

/// A builtin's (cpu, mem) cost function pair.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinCostModel {
    pub cpu: CostFunction,
    pub mem: CostFunction,
}

impl BuiltinCostModel {
    pub fn apply(&self, sizes: &[u64]) -> ExBudget {
        ExBudget::new(self.cpu.apply(sizes), self.mem.apply(sizes))
    }

    pub fn constant(cpu: i64, mem: i64) -> Self {
        BuiltinCostModel {
            cpu: CostFunction::Constant(cpu),
            mem: CostFunction::Constant(mem),
        }
    }

    pub fn linear(cpu: (i64, i64), mem: (i64, i64)) -> Self {
        BuiltinCostModel {
            cpu: CostFunction::Linear {
                intercept: cpu.0,
                slope: cpu.1,
            },
            mem: CostFunction::Linear {
                intercept: mem.0,
                slope: mem.1,
            },
        }
    }

    pub fn added_sizes(cpu: (i64, i64), mem: (i64, i64)) -> Self {
        BuiltinCostModel {
            cpu: CostFunction::AddedSizes {
                intercept: cpu.0,
                slope: cpu.1,
            },
            mem: CostFunction::AddedSizes {
                intercept: mem.0,
                slope: mem.1,
            },
        }
    }

    pub fn max_size(cpu: (i64, i64), mem: (i64, i64)) -> Self {
        BuiltinCostModel {
            cpu: CostFunction::MaxSize {
                intercept: cpu.0,
                slope: cpu.1,
            },
            mem: CostFunction::MaxSize {
                intercept: mem.0,
                slope: mem.1,
            },
        }
    }
}

/// Immutable evaluation configuration: the startup cost, the per-step
/// costs, and (via `crate::builtin::builtin_table`) the per-builtin cost
/// table. `MachineParameters` itself only owns the step-cost side; the
/// builtin cost table is process-wide static data (see `builtin::mod`)
/// since it does not vary per evaluation in this crate's scope.
#[derive(Debug, Clone)]
pub struct MachineParameters {
    pub startup_cost: ExBudget,
    step_costs: HashMap<StepKind, ExBudget>,
}

impl MachineParameters {
    pub fn new(startup_cost: ExBudget, step_costs: HashMap<StepKind, ExBudget>) -> Self {
        MachineParameters {
            startup_cost,
            step_costs,
        }
    }

    pub fn cost_of(&self, kind: StepKind) -> ExBudget {
        self.step_costs.get(&kind).copied().unwrap_or_default()
    }
}

impl Default for MachineParameters {
    /// A representative cost model in the shape of mainnet parameters.
    /// Exact published constants are a protocol-parameter concern outside
    /// this crate's scope; callers that need consensus-exact values
    /// supply their own `MachineParameters`.
    fn default() -> Self {
        let mut step_costs = HashMap::new();
        step_costs.insert(StepKind::StartUp, ExBudget::new(100, 100));
        step_costs.insert(StepKind::Var, ExBudget::new(23_000, 100));
        step_costs.insert(StepKind::Lambda, ExBudget::new(23_000, 100));
        step_costs.insert(StepKind::Apply, ExBudget::new(23_000, 100));
        step_costs.insert(StepKind::Delay, ExBudget::new(23_000, 100));
        step_costs.insert(StepKind::Force, ExBudget::new(23_000, 100));
        step_costs.insert(StepKind::Const, ExBudget::new(23_000, 100));
        step_costs.insert(StepKind::Constr, ExBudget::new(23_000, 100));
        step_costs.insert(StepKind::Case, ExBudget::new(23_000, 100));
        step_costs.insert(StepKind::Builtin, ExBudget::new(23_000, 100));
        MachineParameters {
            startup_cost: ExBudget::new(100, 100),
            step_costs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_cost_function_ignores_sizes() {
        let f = CostFunction::Constant(42);
        assert_eq!(f.apply(&[1, 2, 3]), 42);
    }

    #[test]
    fn linear_cost_function_scales_first_size() {
        let f = CostFunction::Linear {
            intercept: 10,
            slope: 2,
        };
        assert_eq!(f.apply(&[5]), 20);
    }

    #[test]
    fn subtracted_sizes_floors_at_zero() {
        let f = CostFunction::SubtractedSizes {
            intercept: 0,
            slope: 1,
        };
        assert_eq!(f.apply(&[2, 5]), 0);
        assert_eq!(f.apply(&[5, 2]), 3);
    }

    #[test]
    fn default_parameters_cover_every_step_kind() {
        let p = MachineParameters::default();
        assert_eq!(p.cost_of(StepKind::Var), ExBudget::new(23_000, 100));
    }
}
