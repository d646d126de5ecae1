//! Errors raised while validating input or solving the linear programs

use thiserror::Error;

/// Invalid input, detected once before any linear program is built
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("the graph has no vertices")]
    NoVertices,
    #[error("the graph has no edges")]
    NoEdges,
    #[error("edge {edge} has no usable weight; give every edge a finite weight (1 for an unweighted graph)")]
    UnweightedEdge { edge: usize },
    #[error("edge {edge} references vertex {vertex}, but the graph only has {vertex_count} vertices")]
    EndpointOutOfRange {
        edge: usize,
        vertex: usize,
        vertex_count: usize,
    },
    #[error("edge {edge} is a loop on vertex {vertex}")]
    SelfLoop { edge: usize, vertex: usize },
    #[error("vertex {vertex} has no incident edge, so the graph has no perfect matching")]
    IsolatedVertex { vertex: usize },
    #[error("the graph has a connected component of odd size {size}, so it has no perfect matching")]
    OddComponent { size: usize },
    #[error("precision must be at least 1 decimal place (got {0}): half-integral solutions would become indistinguishable from integral ones")]
    Precision(u32),
}

/// Failure reported by a linear programming back-end
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("infeasible: {0}")]
    Infeasible(String),
    #[error("unbounded: {0}")]
    Unbounded(String),
    #[error("solver failure: {0}")]
    Internal(String),
    #[error("could not run the solver: {0}")]
    Io(#[from] std::io::Error),
    #[error("incorrect solution format: {0}")]
    Parse(String),
}

/// The linear program a [SolverError] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// First primal solve, finding the minimum cost
    MinimumCost,
    /// Lexicographic primal solve minimizing the given edge
    Lexicographic { edge: usize },
    /// Dual solve of the given perturbation round
    Dual { round: usize },
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Stage::MinimumCost => write!(f, "minimum cost primal"),
            Stage::Lexicographic { edge } => write!(f, "lexicographic primal for edge {}", edge),
            Stage::Dual { round } => write!(f, "dual round {}", round),
        }
    }
}

/// Crate level error
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A linear program that must be feasible was not. The constraints were built wrong.
    #[error("{stage} LP could not be solved: {source}")]
    Solver {
        stage: Stage,
        #[source]
        source: SolverError,
    },
    #[error("could not write LP dump: {0}")]
    Dump(#[from] std::io::Error),
}

impl MatchingError {
    pub(crate) fn solver(stage: Stage) -> impl FnOnce(SolverError) -> MatchingError {
        move |source| MatchingError::Solver { stage, source }
    }
}

pub type Result<T> = std::result::Result<T, MatchingError>;
