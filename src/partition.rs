//! Classifying edges and cuts with respect to a fractional solution
use crate::cut_family::{Cut, CutFamily};
use crate::error::ConfigError;
use crate::graph::{Edge, Graph};

/// Smallest precision that still tells a half-integral value from an integral one
pub const MIN_PRECISION: u32 = 1;

pub fn check_precision(precision: u32) -> Result<(), ConfigError> {
    if precision < MIN_PRECISION {
        return Err(ConfigError::Precision(precision));
    }
    Ok(())
}

/// Round to `precision` decimal places. Never returns `-0.0`.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor + 0.
}

pub fn is_integral(x: &[f64]) -> bool {
    x.iter().all(|value| value.fract() == 0.)
}

/// Whether exactly one endpoint of `edge` lies in `set`, i.e. `edge ∈ δ(set)`
pub fn edge_crosses_boundary(edge: &Edge, set: &Cut) -> bool {
    set.contains(edge.u) != set.contains(edge.v)
}

/// `x(δ(set))`
pub fn boundary_value(graph: &Graph, set: &Cut, x: &[f64]) -> f64 {
    graph
        .edges()
        .iter()
        .zip(x)
        .filter(|(edge, _)| edge_crosses_boundary(edge, set))
        .map(|(_, value)| value)
        .sum()
}

/// Indices of the edges in the support of `x` and of the others, both in edge order
pub fn partition_support(x: &[f64]) -> (Vec<usize>, Vec<usize>) {
    (0..x.len()).partition(|&index| x[index] != 0.)
}

/// Positions in F of the tight and the untight cuts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TightPartition {
    pub tight: Vec<usize>,
    pub untight: Vec<usize>,
}

impl TightPartition {
    pub fn is_tight(&self, position: usize) -> bool {
        self.tight.binary_search(&position).is_ok()
    }
}

/// A cut is tight when `x(δ(S))`, rounded to `precision` places, is exactly 1
pub fn partition_tight_sets(
    graph: &Graph,
    family: &CutFamily,
    x: &[f64],
    precision: u32,
) -> TightPartition {
    let (tight, untight): (Vec<usize>, Vec<usize>) = (0..family.len()).partition(|&position| {
        round_to(boundary_value(graph, family.get(position), x), precision) == 1.
    });
    TightPartition { tight, untight }
}
