//! The unperturbed C-P-Matching main loop
use std::fmt;
use std::path::PathBuf;

use log::info;

use crate::cut_family::{CutFamily, Gamma};
use crate::cycles::extract_cycles;
use crate::dual::solve_duals;
use crate::error::{ConfigError, Result};
use crate::graph::{Edge, Graph};
use crate::partition::{check_precision, is_integral};
use crate::primal::solve_primal;
use crate::runner::LpRunner;
use crate::solvers::{MicroLpSolver, SolverTrait};

/// Decimal places kept from every LP solution unless configured otherwise
pub const DEFAULT_PRECISION: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchingConfig {
    precision: u32,
    dump_dir: Option<PathBuf>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            precision: DEFAULT_PRECISION,
            dump_dir: None,
        }
    }
}

impl MatchingConfig {
    pub fn new() -> MatchingConfig {
        MatchingConfig::default()
    }

    /// Number of decimal places intermediate solutions are rounded to. At least 1.
    pub fn with_precision(self, precision: u32) -> MatchingConfig {
        MatchingConfig { precision, ..self }
    }

    /// Write every LP of the run to this directory in the .lp format
    pub fn with_dump_dir(self, dump_dir: impl Into<PathBuf>) -> MatchingConfig {
        MatchingConfig {
            dump_dir: Some(dump_dir.into()),
            ..self
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn dump_dir(&self) -> Option<&PathBuf> {
        self.dump_dir.as_ref()
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_precision(self.precision)
    }
}

/// A minimum-weight perfect matching
#[derive(Debug, Clone, PartialEq)]
pub struct Matching {
    /// 1 for the edges in the matching, 0 for the others, in edge order
    pub x: Vec<u8>,
    /// Total weight of the selected edges
    pub cost: f64,
    /// Number of primal LPs `P_F` solved
    pub rounds: usize,
    /// |F| when the primal became integral
    pub family_size: usize,
    selected: Vec<(usize, Edge)>,
}

impl Matching {
    fn new(graph: &Graph, x: Vec<f64>, rounds: usize, family_size: usize) -> Matching {
        let selected: Vec<(usize, Edge)> = x
            .iter()
            .enumerate()
            .filter(|(_, &value)| value > 0.)
            .map(|(index, _)| (index, *graph.edge(index)))
            .collect();
        Matching {
            cost: selected.iter().map(|(_, e)| e.weight).sum(),
            x: x.iter().map(|&value| value as u8).collect(),
            rounds,
            family_size,
            selected,
        }
    }

    /// Indices of the matched edges
    pub fn edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().map(|(index, _)| *index)
    }
}

impl fmt::Display for Matching {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Edges in solution:")?;
        for (_, edge) in &self.selected {
            writeln!(f, "({}, {}): 1 (cost {})", edge.u, edge.v, edge.weight)?;
        }
        write!(f, "Total cost: {}", self.cost)
    }
}

/// Runs the algorithm with a given LP solver
pub struct CpMatching<S> {
    solver: S,
    config: MatchingConfig,
}

impl Default for CpMatching<MicroLpSolver> {
    fn default() -> Self {
        CpMatching::new(MicroLpSolver::new(), MatchingConfig::default())
    }
}

impl<S: SolverTrait> CpMatching<S> {
    pub fn new(solver: S, config: MatchingConfig) -> Self {
        CpMatching { solver, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Alternate `P_F` and `D*_F`, growing F, until `P_F` has an integral optimum.
    ///
    /// There is no round limit: every fractional round puts the vertex set of each
    /// fractional cycle into F, and there are finitely many vertex subsets.
    pub fn run(&self, graph: &Graph) -> Result<Matching> {
        self.config.validate()?;
        graph.validate()?;
        let precision = self.config.precision;
        let runner =
            LpRunner::new(&self.solver).with_dump_dir(self.config.dump_dir.as_deref());

        let mut family = CutFamily::new();
        let mut gamma = Gamma::zero(graph);
        let mut round = 0;
        loop {
            round += 1;
            let runner = runner.for_round(round);
            let x = solve_primal(graph, &family, precision, &runner)?;
            if is_integral(&x) {
                info!("round {}: integral solution with |F| = {}", round, family.len());
                return Ok(Matching::new(graph, x, round, family.len()));
            }
            let duals = solve_duals(graph, &family, &x, &gamma, precision, &runner)?;
            let cycles = extract_cycles(graph, &x);
            info!(
                "round {}: {} fractional edges in {} cycles, |F| = {}",
                round,
                x.iter().filter(|v| v.fract() != 0.).count(),
                cycles.len(),
                family.len()
            );
            family = family.next(&duals, &cycles);
            gamma = duals;
        }
    }
}

/// Minimum-weight perfect matching of `graph`, one 0/1 value per edge.
///
/// Intermediate LP solutions are rounded to `precision` decimal places, which must be at least 1.
///
/// ```
/// use cp_matching::find_matching;
/// use cp_matching::graph::Graph;
///
/// let square = Graph::from_edges(4, &[(0, 1, 1.), (1, 2, 5.), (2, 3, 1.), (3, 0, 5.)]);
/// assert_eq!(find_matching(&square, 3).unwrap(), vec![1, 0, 1, 0]);
/// ```
pub fn find_matching(graph: &Graph, precision: u32) -> Result<Vec<u8>> {
    let config = MatchingConfig::new().with_precision(precision);
    Ok(CpMatching::new(MicroLpSolver::new(), config).run(graph)?.x)
}
