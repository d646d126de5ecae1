//! This module provides the interface to the linear programming back-ends.
//!
//! The matching algorithm only needs "minimize `c·x` under `A_ub x <= b_ub`,
//! `A_eq x = b_eq` and shared bounds, give me `x`, `c·x` and the slacks".
//! [MicroLpSolver] does that in process with the pure Rust
//! [`microlp`](https://docs.rs/microlp) crate and is the default.
//! [CbcSolver] writes the problem in the .lp format and calls the `cbc` binary,
//! which needs to be installed on your system.

use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::SolverError;
use crate::lp_format::LpProblem;
use crate::problem::LinearProgram;

pub use self::cbc::*;
pub use self::micro_lp::*;

pub mod cbc;
pub mod micro_lp;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Status {
    Optimal,
    SubOptimal,
    Infeasible,
    Unbounded,
    NotSolved,
}

/// An optimum of a [LinearProgram]
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// One value per variable
    pub x: Vec<f64>,
    /// `c·x`
    pub objective: f64,
    /// `b_ub - A_ub x`, one value per inequality row
    pub slack: Vec<f64>,
}

impl LpSolution {
    /// Complete a solution vector with its objective value and slacks
    pub fn from_vector(problem: &LinearProgram, x: Vec<f64>) -> LpSolution {
        LpSolution {
            objective: problem.objective_value(&x),
            slack: problem.slack(&x),
            x,
        }
    }
}

pub trait SolverTrait {
    /// Solve to optimality, or fail. Anything short of an optimum is an error.
    fn run(&self, problem: &LinearProgram) -> Result<LpSolution, SolverError>;
}

impl<S: SolverTrait + ?Sized> SolverTrait for &S {
    fn run(&self, problem: &LinearProgram) -> Result<LpSolution, SolverError> {
        (**self).run(problem)
    }
}

impl<S: SolverTrait + ?Sized> SolverTrait for Box<S> {
    fn run(&self, problem: &LinearProgram) -> Result<LpSolution, SolverError> {
        (**self).run(problem)
    }
}

/// Turn a status and a vector read back from an external solver into a result
pub fn status_to_result(
    status: Status,
    problem: &LinearProgram,
    x: Vec<f64>,
) -> Result<LpSolution, SolverError> {
    match status {
        Status::Optimal => Ok(LpSolution::from_vector(problem, x)),
        Status::Infeasible => Err(SolverError::Infeasible(problem.name.clone())),
        Status::Unbounded => Err(SolverError::Unbounded(problem.name.clone())),
        Status::SubOptimal | Status::NotSolved => Err(SolverError::Internal(format!(
            "{} stopped before reaching an optimum ({:?})",
            problem.name, status
        ))),
    }
}

pub trait SolverWithSolutionParsing {
    fn read_solution(
        &self,
        temp_solution_file: &Path,
        problem: &LinearProgram,
    ) -> Result<(Status, Vec<f64>), SolverError> {
        match File::open(temp_solution_file) {
            Ok(f) => {
                let res = self.read_specific_solution(&f, problem)?;
                let _ = fs::remove_file(temp_solution_file);
                Ok(res)
            }
            Err(_) => Err(SolverError::Parse("Cannot open file".to_string())),
        }
    }
    fn read_specific_solution(
        &self,
        f: &File,
        problem: &LinearProgram,
    ) -> Result<(Status, Vec<f64>), SolverError>;
}

pub trait WithMaxSeconds<T> {
    fn max_seconds(&self) -> Option<u32>;
    fn with_max_seconds(&self, seconds: u32) -> T;
}

pub trait WithNbThreads<T> {
    fn nb_threads(&self) -> Option<u32>;
    fn with_nb_threads(&self, threads: u32) -> T;
}

/// A solver that runs as a separate program, reading an .lp file and writing a solution file
pub trait SolverProgram {
    fn command_name(&self) -> &str;
    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString>;
    fn preferred_temp_solution_file(&self) -> Option<&Path> {
        None
    }
}

/// Write `problem` to a temporary .lp file, run the program on it and parse its solution
pub fn run_program<T: SolverProgram + SolverWithSolutionParsing>(
    solver: &T,
    problem: &LinearProgram,
) -> Result<LpSolution, SolverError> {
    let lp_file = problem.to_tmp_file()?;
    let temp_solution_file;
    let solution_file = match solver.preferred_temp_solution_file() {
        Some(path) => path,
        None => {
            temp_solution_file = tempfile::Builder::new().suffix(".sol").tempfile()?;
            temp_solution_file.path()
        }
    };
    debug!(
        "running {} on {} ({} variables)",
        solver.command_name(),
        problem.name,
        problem.variable_count()
    );
    let output = Command::new(solver.command_name())
        .args(solver.arguments(lp_file.path(), solution_file))
        .output()?;
    if !output.status.success() {
        return Err(SolverError::Internal(format!(
            "{} exited with {}: {}",
            solver.command_name(),
            output.status,
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    let (status, x) = solver.read_solution(solution_file, problem)?;
    status_to_result(status, problem, x)
}
