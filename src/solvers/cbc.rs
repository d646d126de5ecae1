use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::SolverError;
use crate::problem::LinearProgram;
use crate::solvers::{
    run_program, LpSolution, SolverProgram, SolverTrait, SolverWithSolutionParsing, Status,
    WithMaxSeconds, WithNbThreads,
};

#[derive(Debug, Clone)]
pub struct CbcSolver {
    command_name: String,
    temp_solution_file: Option<PathBuf>,
    threads: Option<u32>,
    seconds: Option<u32>,
}

impl Default for CbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CbcSolver {
    pub fn new() -> CbcSolver {
        CbcSolver {
            command_name: "cbc".to_string(),
            temp_solution_file: None,
            threads: None,
            seconds: None,
        }
    }

    pub fn with_command(&self, command_name: impl Into<String>) -> CbcSolver {
        CbcSolver {
            command_name: command_name.into(),
            ..self.clone()
        }
    }

    pub fn with_temp_solution_file(&self, temp_solution_file: impl Into<PathBuf>) -> CbcSolver {
        CbcSolver {
            temp_solution_file: Some(temp_solution_file.into()),
            ..self.clone()
        }
    }
}

fn variable_index(name: &str) -> Option<usize> {
    name.strip_prefix('x')?.parse().ok()
}

impl SolverWithSolutionParsing for CbcSolver {
    fn read_specific_solution(
        &self,
        f: &File,
        problem: &LinearProgram,
    ) -> Result<(Status, Vec<f64>), SolverError> {
        // CBC keeps only non-zero values from a number of variables
        let mut values = vec![0.; problem.variable_count()];

        let mut file = BufReader::new(f);
        let mut buffer = String::new();
        file.read_line(&mut buffer)?;

        let status = if let Some(status) = buffer.split_whitespace().next() {
            match status {
                "Optimal" => Status::Optimal,
                // Infeasible status is either "Infeasible" or "Integer infeasible"
                "Infeasible" | "Integer" => Status::Infeasible,
                "Unbounded" => Status::Unbounded,
                // "Stopped" can be "on time", "on iterations", "on difficulties" or "on ctrl-c"
                "Stopped" => Status::SubOptimal,
                _ => Status::NotSolved,
            }
        } else {
            return Err(SolverError::Parse("empty solution file".to_string()));
        };
        for line in file.lines() {
            let l = line?;
            let mut result_line: Vec<_> = l.split_whitespace().collect();
            if result_line.is_empty() {
                continue;
            }
            if result_line[0] == "**" {
                result_line.remove(0);
            };
            if result_line.len() != 4 {
                return Err(SolverError::Parse(format!("unexpected line {:?}", l)));
            }
            let index = variable_index(result_line[1])
                .filter(|&i| i < values.len())
                .ok_or_else(|| {
                    SolverError::Parse(format!("unknown variable {}", result_line[1]))
                })?;
            values[index] = result_line[2]
                .parse::<f64>()
                .map_err(|e| SolverError::Parse(e.to_string()))?;
        }
        Ok((status, values))
    }
}

impl WithMaxSeconds<CbcSolver> for CbcSolver {
    fn max_seconds(&self) -> Option<u32> {
        self.seconds
    }
    fn with_max_seconds(&self, seconds: u32) -> CbcSolver {
        CbcSolver {
            seconds: Some(seconds),
            ..(*self).clone()
        }
    }
}
impl WithNbThreads<CbcSolver> for CbcSolver {
    fn nb_threads(&self) -> Option<u32> {
        self.threads
    }
    fn with_nb_threads(&self, threads: u32) -> CbcSolver {
        CbcSolver {
            threads: Some(threads),
            ..(*self).clone()
        }
    }
}

impl SolverProgram for CbcSolver {
    fn command_name(&self) -> &str {
        &self.command_name
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path) -> Vec<OsString> {
        let mut args = vec![lp_file.as_os_str().to_owned()];
        for (name, value) in [
            ("seconds", self.max_seconds()),
            ("threads", self.nb_threads()),
        ]
        .iter()
        {
            if let Some(val) = value {
                args.push(name.into());
                args.push(val.to_string().into());
            }
        }
        args.extend_from_slice(&[
            "solve".into(),
            "solution".into(),
            solution_file.into(),
        ]);
        args
    }

    fn preferred_temp_solution_file(&self) -> Option<&Path> {
        self.temp_solution_file.as_deref()
    }
}

impl SolverTrait for CbcSolver {
    fn run(&self, problem: &LinearProgram) -> Result<LpSolution, SolverError> {
        run_program(self, problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_end_with_the_solution_file() {
        let solver = CbcSolver::new().with_max_seconds(10);
        let args = solver.arguments(Path::new("in.lp"), Path::new("out.sol"));
        let expected: Vec<OsString> = vec![
            "in.lp".into(),
            "seconds".into(),
            "10".into(),
            "solve".into(),
            "solution".into(),
            "out.sol".into(),
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn variable_names_map_to_columns() {
        assert_eq!(variable_index("x12"), Some(12));
        assert_eq!(variable_index("y1"), None);
    }
}
