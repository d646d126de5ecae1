use log::{debug, trace};
use microlp::{ComparisonOp, Error, OptimizationDirection, Problem, Variable};

use crate::error::SolverError;
use crate::problem::LinearProgram;
use crate::solvers::{LpSolution, SolverTrait};

/// In-process simplex solver, backed by the `microlp` crate
#[derive(Debug, Clone, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> MicroLpSolver {
        MicroLpSolver
    }
}

fn add_row(
    problem: &mut Problem,
    vars: &[Variable],
    row: &[f64],
    op: ComparisonOp,
    rhs: f64,
) -> Result<(), SolverError> {
    let terms: Vec<(Variable, f64)> = row
        .iter()
        .zip(vars)
        .filter(|(coefficient, _)| **coefficient != 0.)
        .map(|(&coefficient, &var)| (var, coefficient))
        .collect();
    if terms.is_empty() {
        // `0 <op> rhs` holds or fails whatever x is
        let holds = match op {
            ComparisonOp::Le => 0. <= rhs,
            ComparisonOp::Ge => 0. >= rhs,
            ComparisonOp::Eq => rhs == 0.,
        };
        return if holds {
            Ok(())
        } else {
            Err(SolverError::Infeasible(format!(
                "empty row cannot satisfy 0 {:?} {}",
                op, rhs
            )))
        };
    }
    problem.add_constraint(terms, op, rhs);
    Ok(())
}

impl SolverTrait for MicroLpSolver {
    fn run(&self, lp: &LinearProgram) -> Result<LpSolution, SolverError> {
        debug!(
            "{}: {} variables, {} inequalities, {} equalities",
            lp.name,
            lp.variable_count(),
            lp.a_ub.len(),
            lp.a_eq.len()
        );
        let mut problem = Problem::new(OptimizationDirection::Minimize);
        let bounds = (lp.bounds.lower_or_infinite(), lp.bounds.upper_or_infinite());
        let vars: Vec<Variable> = lp
            .objective
            .iter()
            .map(|&cost| problem.add_var(cost, bounds))
            .collect();
        for (row, &rhs) in lp.a_ub.iter().zip(&lp.b_ub) {
            add_row(&mut problem, &vars, row, ComparisonOp::Le, rhs)?;
        }
        for (row, &rhs) in lp.a_eq.iter().zip(&lp.b_eq) {
            add_row(&mut problem, &vars, row, ComparisonOp::Eq, rhs)?;
        }
        let solution = problem.solve().map_err(|e| match e {
            Error::Infeasible => SolverError::Infeasible(format!("{}: {}", lp.name, e)),
            Error::Unbounded => SolverError::Unbounded(format!("{}: {}", lp.name, e)),
            #[allow(unreachable_patterns)]
            other => SolverError::Internal(format!("{}: {}", lp.name, other)),
        })?;
        let x: Vec<f64> = vars.iter().map(|&var| solution[var]).collect();
        trace!("{}: objective {}", lp.name, solution.objective());
        Ok(LpSolution::from_vector(lp, x))
    }
}
