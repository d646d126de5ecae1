//! The primal LP `P_F`: a minimum-cost fractional perfect matching that crosses
//! every cut of F at least once.
//!
//! ```text
//! minimize    Σ_e w(e) x(e)
//! subject to  x(δ(v)) = 1    for every vertex v
//!             x(δ(S)) >= 1   for every S in F
//!             x >= 0
//! ```
//!
//! Ties between optimal vertices are broken lexicographically so that the same
//! `(graph, F)` always yields the same vector, whatever the solver does.
use log::debug;

use crate::cut_family::CutFamily;
use crate::error::{Result, Stage};
use crate::graph::Graph;
use crate::partition::{edge_crosses_boundary, round_to};
use crate::problem::{Bounds, LinearProgram};
use crate::runner::LpRunner;

/// `P_F` with the edge weights as objective
pub fn primal_program(graph: &Graph, family: &CutFamily) -> LinearProgram {
    let m = graph.edge_count();
    let mut lp = LinearProgram::new("primal_min_cost", graph.weights(), Bounds::NON_NEGATIVE);
    // The back-ends only take `<=` rows, so x(δ(S)) >= 1 becomes -x(δ(S)) <= -1
    for cut in family {
        let row = graph
            .edges()
            .iter()
            .map(|e| if edge_crosses_boundary(e, cut) { -1. } else { 0. })
            .collect();
        lp.add_upper_bound(row, -1.);
    }
    for vertex in 0..graph.vertex_count() {
        let row = graph
            .edges()
            .iter()
            .map(|e| if e.touches(vertex) { 1. } else { 0. })
            .collect();
        lp.add_equality(row, 1.);
    }
    debug_assert!(lp.a_eq.iter().all(|row| row.len() == m));
    lp
}

fn unit(length: usize, index: usize) -> Vec<f64> {
    let mut v = vec![0.; length];
    v[index] = 1.;
    v
}

/// The lexicographically smallest optimal solution of `P_F`, rounded to `precision` places
pub fn solve_primal(
    graph: &Graph,
    family: &CutFamily,
    precision: u32,
    runner: &LpRunner,
) -> Result<Vec<f64>> {
    let m = graph.edge_count();
    let mut lp = primal_program(graph, family);
    let optimum = runner.solve(&lp, Stage::MinimumCost)?;
    debug!(
        "round {}: P_F with |F| = {} has minimum cost {}",
        runner.round(),
        family.len(),
        round_to(optimum.objective, precision)
    );

    // Stay on the optimal face, then push each edge as low as it goes, in edge order
    lp.add_equality(graph.weights(), optimum.objective);
    let mut solution = optimum.x;
    for edge in 0..m {
        lp.name = format!("primal_lex_edge{}", edge);
        lp.objective = unit(m, edge);
        solution = runner.solve(&lp, Stage::Lexicographic { edge })?.x;
        lp.add_equality(unit(m, edge), solution[edge]);
    }
    Ok(solution.into_iter().map(|v| round_to(v, precision)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cut_family::Cut;
    use crate::solvers::MicroLpSolver;

    fn solve(graph: &Graph, family: &CutFamily) -> Vec<f64> {
        let solver = MicroLpSolver::new();
        solve_primal(graph, family, 3, &LpRunner::new(&solver)).unwrap()
    }

    fn two_triangles() -> Graph {
        // Cheap triangles joined by an expensive bridge: the LP optimum is two half cycles
        Graph::from_edges(
            6,
            &[
                (0, 1, 1.),
                (1, 2, 1.),
                (2, 0, 1.),
                (3, 4, 1.),
                (4, 5, 1.),
                (5, 3, 1.),
                (2, 3, 10.),
            ],
        )
    }

    #[test]
    fn formulation_shape() {
        let g = two_triangles();
        let family = CutFamily::from_cuts(vec![Cut::new(vec![0, 1, 2])]);
        let lp = primal_program(&g, &family);
        assert_eq!(lp.a_ub, vec![vec![0., 0., 0., 0., 0., 0., -1.]]);
        assert_eq!(lp.b_ub, vec![-1.]);
        assert_eq!(lp.a_eq.len(), 6);
        assert_eq!(lp.a_eq[2], vec![0., 1., 1., 0., 0., 0., 1.]);
    }

    #[test]
    fn unconstrained_optimum_is_half_integral() {
        let x = solve(&two_triangles(), &CutFamily::new());
        assert_eq!(x, vec![0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.]);
    }

    #[test]
    fn a_cut_forces_the_bridge() {
        let family = CutFamily::from_cuts(vec![Cut::new(vec![0, 1, 2])]);
        let x = solve(&two_triangles(), &family);
        assert_eq!(x, vec![1., 0., 0., 0., 1., 0., 1.]);
    }

    #[test]
    fn ties_break_towards_the_smallest_first_edge() {
        // Every edge costs 1: both perfect matchings of the square are optimal
        let g = Graph::from_edges(4, &[(0, 1, 1.), (1, 2, 1.), (2, 3, 1.), (3, 0, 1.)]);
        let x = solve(&g, &CutFamily::new());
        assert_eq!(x, vec![0., 1., 0., 1.]);
        // and again, identically
        assert_eq!(solve(&g, &CutFamily::new()), x);
    }
}
