//! The dual LP `D*_F`, solved once per "fake perturbation" round.
//!
//! Instead of perturbing the edge weights by `ε, ε², ...` and solving one LP, the
//! perturbation is emulated by a sequence of LPs: round 0 uses the real weights,
//! round `k` a unit impulse on edge `k - 1` and zero everywhere else. Each round
//! also stays close to the potentials the previous iteration found for the same
//! round (Gamma), and inequality rows that went slack are dropped for good.
//!
//! Columns: one potential `π(a)` per ground element `a` (vertices, then the cuts
//! of F), followed by one deviation `d(a)` per ground element, `d(a) >= |π(a) - Γ(a)|`.
//!
//! ```text
//! minimize    Σ_v d(v) + Σ_{S tight} d(S) / |S|
//! subject to  π(u) + π(v) + Σ_{S: uv ∈ δ(S)} π(S) =  c(uv)   for uv in supp(x)
//!             π(u) + π(v) + Σ_{S: uv ∈ δ(S)} π(S) <= c(uv)   for uv not in supp(x)
//!             π(S) = 0                                        for S untight
//!             π(S) >= 0                                       for S tight
//!            -π(a) - d(a) <= -Γ(a),  π(a) - d(a) <= Γ(a)      for every a
//! ```
use log::{debug, trace};

use crate::cut_family::{CutFamily, DualAssignment, Gamma, GroundElement, GroundSet};
use crate::error::{Result, Stage};
use crate::graph::{Edge, Graph};
use crate::partition::{edge_crosses_boundary, partition_support, partition_tight_sets, round_to};
use crate::problem::{Bounds, LinearProgram};
use crate::runner::LpRunner;

/// Where the edge coefficients of one round come from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RightHandSide {
    /// The unperturbed problem
    Weights,
    /// 1 on this edge, 0 on every other
    Impulse { edge: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbationRound {
    pub index: usize,
    pub rhs: RightHandSide,
}

impl PerturbationRound {
    /// Round 0 on the weights, then one impulse per edge in edge order
    pub fn sequence(edge_count: usize) -> impl Iterator<Item = PerturbationRound> {
        (0..=edge_count).map(|index| PerturbationRound {
            index,
            rhs: match index {
                0 => RightHandSide::Weights,
                k => RightHandSide::Impulse { edge: k - 1 },
            },
        })
    }

    pub fn edge_coefficient(&self, index: usize, edge: &Edge) -> f64 {
        match self.rhs {
            RightHandSide::Weights => edge.weight,
            RightHandSide::Impulse { edge: pulsed } if pulsed == index => 1.,
            RightHandSide::Impulse { .. } => 0.,
        }
    }
}

/// Stable identity of an inequality row, whatever its current position in the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintId {
    /// `-π(a) - d(a) <= -Γ(a)` for ground element `a`
    BelowGamma(usize),
    /// `π(a) - d(a) <= Γ(a)` for ground element `a`
    AboveGamma(usize),
    /// Edge outside the support of x
    UnusedEdge(usize),
    /// `-π(S) <= 0` for the cut of F at this position
    TightCut(usize),
}

/// `D*_F` for one main-loop iteration, shrinking as rows are pruned
pub struct DualProgram<'a> {
    graph: &'a Graph,
    ground: GroundSet<'a>,
    elements: Vec<GroundElement>,
    support: Vec<usize>,
    untight_count: usize,
    lp: LinearProgram,
    /// `rows[i]` is the identity of the inequality row at position `i` in `lp.a_ub`
    rows: Vec<ConstraintId>,
}

impl<'a> DualProgram<'a> {
    pub fn new(graph: &'a Graph, family: &'a CutFamily, x: &[f64], precision: u32) -> Self {
        let ground = GroundSet::new(graph, family);
        let size = ground.len();
        let n = ground.vertex_count();
        let tightness = partition_tight_sets(graph, family, x, precision);
        let (support, unused) = partition_support(x);

        let mut objective = vec![0.; 2 * size];
        for deviation in &mut objective[size..size + n] {
            *deviation = 1.;
        }
        for &position in &tightness.tight {
            objective[size + ground.cut_index(position)] = 1. / family.get(position).len() as f64;
        }
        let mut lp = LinearProgram::new("dual", objective, Bounds::FREE);

        // Which potentials an edge constraint sums: its endpoints and the cuts it crosses
        let edge_row = |index: usize| {
            let edge = graph.edge(index);
            let mut row = vec![0.; 2 * size];
            row[edge.u] = 1.;
            row[edge.v] = 1.;
            for (position, cut) in family.iter().enumerate() {
                if edge_crosses_boundary(edge, cut) {
                    row[ground.cut_index(position)] = 1.;
                }
            }
            row
        };

        for &index in &support {
            lp.add_equality(edge_row(index), 0.);
        }
        for &position in &tightness.untight {
            let mut row = vec![0.; 2 * size];
            row[ground.cut_index(position)] = 1.;
            lp.add_equality(row, 0.);
        }

        let mut rows = vec![];
        for a in 0..size {
            let mut row = vec![0.; 2 * size];
            row[a] = -1.;
            row[size + a] = -1.;
            lp.add_upper_bound(row, 0.);
            rows.push(ConstraintId::BelowGamma(a));
        }
        for a in 0..size {
            let mut row = vec![0.; 2 * size];
            row[a] = 1.;
            row[size + a] = -1.;
            lp.add_upper_bound(row, 0.);
            rows.push(ConstraintId::AboveGamma(a));
        }
        for &index in &unused {
            lp.add_upper_bound(edge_row(index), 0.);
            rows.push(ConstraintId::UnusedEdge(index));
        }
        for &position in &tightness.tight {
            let mut row = vec![0.; 2 * size];
            row[ground.cut_index(position)] = -1.;
            lp.add_upper_bound(row, 0.);
            rows.push(ConstraintId::TightCut(position));
        }

        DualProgram {
            graph,
            elements: ground.elements().collect(),
            ground,
            support,
            untight_count: tightness.untight.len(),
            lp,
            rows,
        }
    }

    /// Identities of the inequality rows still in the program, in matrix order
    pub fn rows(&self) -> &[ConstraintId] {
        &self.rows
    }

    pub fn program(&self) -> &LinearProgram {
        &self.lp
    }

    fn upper_rhs(&self, id: ConstraintId, round: &PerturbationRound, gamma: &DualAssignment) -> f64 {
        match id {
            ConstraintId::BelowGamma(a) => -gamma.get(&self.elements[a]),
            ConstraintId::AboveGamma(a) => gamma.get(&self.elements[a]),
            ConstraintId::UnusedEdge(index) => round.edge_coefficient(index, self.graph.edge(index)),
            ConstraintId::TightCut(_) => 0.,
        }
    }

    /// Set the right-hand sides of `round`, against the rows still present
    pub fn prepare(&mut self, round: &PerturbationRound, gamma: &DualAssignment) {
        let b_ub = self
            .rows
            .iter()
            .map(|&id| self.upper_rhs(id, round, gamma))
            .collect();
        let b_eq = self
            .support
            .iter()
            .map(|&index| round.edge_coefficient(index, self.graph.edge(index)))
            .chain(std::iter::repeat(0.).take(self.untight_count))
            .collect();
        self.lp.b_ub = b_ub;
        self.lp.b_eq = b_eq;
        self.lp.name = format!("dual_round{}", round.index);
    }

    /// Drop every inequality row whose slack, rounded to `precision`, is positive
    pub fn prune(&mut self, slack: &[f64], precision: u32) -> Vec<ConstraintId> {
        debug_assert_eq!(slack.len(), self.rows.len());
        let mut removed = vec![];
        let mut kept_rows = Vec::with_capacity(self.rows.len());
        let mut kept_a = Vec::with_capacity(self.rows.len());
        let mut kept_b = Vec::with_capacity(self.rows.len());
        let old_a = std::mem::take(&mut self.lp.a_ub);
        let old_b = std::mem::take(&mut self.lp.b_ub);
        for (((id, row), rhs), &s) in self.rows.drain(..).zip(old_a).zip(old_b).zip(slack) {
            if round_to(s, precision) > 0. {
                removed.push(id);
            } else {
                kept_rows.push(id);
                kept_a.push(row);
                kept_b.push(rhs);
            }
        }
        self.rows = kept_rows;
        self.lp.a_ub = kept_a;
        self.lp.b_ub = kept_b;
        removed
    }

    /// Potentials of the ground elements, rounded to `precision`
    pub fn assignment(&self, solution: &[f64], precision: u32) -> DualAssignment {
        self.elements
            .iter()
            .zip(solution)
            .map(|(element, &value)| (element.clone(), round_to(value, precision)))
            .collect()
    }

    pub fn ground(&self) -> &GroundSet<'a> {
        &self.ground
    }
}

/// Solve `D*_F` once per perturbation round and return the potentials of every round.
///
/// `gamma` holds the previous iteration's potentials, one entry per round.
pub fn solve_duals(
    graph: &Graph,
    family: &CutFamily,
    x: &[f64],
    gamma: &Gamma,
    precision: u32,
    runner: &LpRunner,
) -> Result<Gamma> {
    let mut program = DualProgram::new(graph, family, x, precision);
    debug!(
        "round {}: D*_F over {} ground elements, {} perturbation rounds",
        runner.round(),
        program.ground().len(),
        gamma.len()
    );
    let mut duals = Gamma::default();
    for (round, previous) in PerturbationRound::sequence(graph.edge_count()).zip(gamma.iter()) {
        program.prepare(&round, previous);
        let solution = runner.solve(program.program(), Stage::Dual { round: round.index })?;
        duals.push(program.assignment(&solution.x, precision));
        let removed = program.prune(&solution.slack, precision);
        if !removed.is_empty() {
            trace!("dual round {}: pruned {:?}", round.index, removed);
        }
    }
    Ok(duals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cut_family::Cut;
    use crate::solvers::MicroLpSolver;

    fn two_triangles() -> Graph {
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

    const HALVES: [f64; 7] = [0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.];

    #[test]
    fn rounds_start_unperturbed() {
        let rounds: Vec<_> = PerturbationRound::sequence(2).collect();
        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds[0].rhs, RightHandSide::Weights);
        assert_eq!(rounds[2].rhs, RightHandSide::Impulse { edge: 1 });
        let e = Edge::new(0, 1, 7.);
        assert_eq!(rounds[0].edge_coefficient(1, &e), 7.);
        assert_eq!(rounds[2].edge_coefficient(1, &e), 1.);
        assert_eq!(rounds[1].edge_coefficient(1, &e), 0.);
    }

    #[test]
    fn row_identities_follow_matrix_order() {
        let g = two_triangles();
        let family = CutFamily::from_cuts(vec![Cut::new(vec![0, 1, 2])]);
        let x = [1., 0., 0., 0., 1., 0., 1.];
        let program = DualProgram::new(&g, &family, &x, 3);
        let rows = program.rows();
        // 7 ground elements twice, 4 unused edges, 1 tight cut
        assert_eq!(rows.len(), 7 * 2 + 4 + 1);
        assert_eq!(rows[7], ConstraintId::AboveGamma(0));
        assert_eq!(rows[14], ConstraintId::UnusedEdge(1));
        assert_eq!(rows[18], ConstraintId::TightCut(0));
        // the bridge is in the support and crosses the cut
        assert_eq!(program.program().a_eq[2][6], 1.);
        assert_eq!(program.program().a_eq.len(), 3);
    }

    #[test]
    fn pruning_keeps_identities_aligned() {
        let g = two_triangles();
        let family = CutFamily::new();
        let mut program = DualProgram::new(&g, &family, &HALVES, 3);
        let before = program.rows().to_vec();
        let mut slack = vec![0.; before.len()];
        slack[0] = 1.;
        slack[3] = 0.0001;
        slack[before.len() - 1] = 2.;
        let removed = program.prune(&slack, 3);
        assert_eq!(removed, vec![before[0], before[before.len() - 1]]);
        assert_eq!(program.rows().len(), before.len() - 2);
        assert_eq!(program.program().a_ub.len(), program.rows().len());
        assert_eq!(program.rows()[0], before[1]);
    }

    #[test]
    fn fake_perturbations_of_two_triangles() {
        let g = two_triangles();
        let solver = MicroLpSolver::new();
        let duals = solve_duals(
            &g,
            &CutFamily::new(),
            &HALVES,
            &Gamma::zero(&g),
            3,
            &LpRunner::new(&solver),
        )
        .unwrap();
        assert_eq!(duals.len(), 8);
        for v in 0..6 {
            assert_eq!(duals.round(0).get(&GroundElement::Vertex(v)), 0.5);
        }
        // impulse on edge 0-1
        assert_eq!(duals.round(1).get(&GroundElement::Vertex(0)), 0.5);
        assert_eq!(duals.round(1).get(&GroundElement::Vertex(1)), 0.5);
        assert_eq!(duals.round(1).get(&GroundElement::Vertex(2)), -0.5);
        assert_eq!(duals.round(1).get(&GroundElement::Vertex(4)), 0.);
        // the bridge is not in the support, nothing moves
        for v in 0..6 {
            assert_eq!(duals.round(7).get(&GroundElement::Vertex(v)), 0.);
        }
    }
}
