use std::path::Path;

use log::trace;

use crate::error::{MatchingError, Result, Stage};
use crate::lp_format::LpProblem;
use crate::problem::LinearProgram;
use crate::solvers::{LpSolution, SolverTrait};

/// Hands the LPs of one main-loop round to the solver, optionally keeping a copy
/// of each one in .lp format.
pub struct LpRunner<'a> {
    solver: &'a dyn SolverTrait,
    dump_dir: Option<&'a Path>,
    round: usize,
}

impl<'a> LpRunner<'a> {
    pub fn new(solver: &'a dyn SolverTrait) -> LpRunner<'a> {
        LpRunner {
            solver,
            dump_dir: None,
            round: 0,
        }
    }

    pub fn with_dump_dir(self, dump_dir: Option<&'a Path>) -> LpRunner<'a> {
        LpRunner { dump_dir, ..self }
    }

    pub fn for_round(&self, round: usize) -> LpRunner<'a> {
        LpRunner {
            solver: self.solver,
            dump_dir: self.dump_dir,
            round,
        }
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn solve(&self, problem: &LinearProgram, stage: Stage) -> Result<LpSolution> {
        if let Some(dir) = self.dump_dir {
            let path = dir.join(format!("round{}_{}.lp", self.round, problem.name));
            trace!("writing {}", path.display());
            problem.write_lp_file(&path)?;
        }
        self.solver
            .run(problem)
            .map_err(MatchingError::solver(stage))
    }
}
