//! Odd-set cuts, the family F of cuts enforced by the primal LP, and the dual
//! potentials that decide how F grows from one round to the next.
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use log::debug;

use crate::graph::Graph;

/// A non-empty set of vertices, kept sorted so equal sets compare and hash equal
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cut(Vec<usize>);

impl Cut {
    pub fn new<I: IntoIterator<Item = usize>>(vertices: I) -> Cut {
        let set: BTreeSet<usize> = vertices.into_iter().collect();
        Cut(set.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.0.binary_search(&vertex).is_ok()
    }

    pub fn vertices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for Cut {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// The family F, in a fixed order for one round.
///
/// Positions are only meaningful for the version they were read from: the next
/// round rebuilds the family, and a cut may move. Identify cuts by value across rounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutFamily {
    cuts: Vec<Cut>,
    version: usize,
}

impl CutFamily {
    /// The empty family of the first round
    pub fn new() -> CutFamily {
        CutFamily::default()
    }

    /// A family holding each distinct non-empty cut once, in sorted order
    pub fn from_cuts<I: IntoIterator<Item = Cut>>(cuts: I) -> CutFamily {
        let set: BTreeSet<Cut> = cuts.into_iter().filter(|c| !c.is_empty()).collect();
        CutFamily {
            cuts: set.into_iter().collect(),
            version: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// How many times the family was rebuilt since the first round
    pub fn version(&self) -> usize {
        self.version
    }

    pub fn get(&self, position: usize) -> &Cut {
        &self.cuts[position]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cut> {
        self.cuts.iter()
    }

    pub fn contains(&self, cut: &Cut) -> bool {
        self.cuts.binary_search(cut).is_ok()
    }

    /// The family of the next round: the cuts some dual round gave a positive
    /// potential, plus one cut per fractional cycle merged with those cuts.
    pub fn next(&self, duals: &Gamma, cycles: &[Vec<usize>]) -> CutFamily {
        let flagged = flagged_cuts(self, duals);
        let merged = merge_cycles(cycles, &flagged);
        debug!(
            "family v{}: {} of {} cuts keep a positive potential, {} cycles",
            self.version,
            flagged.len(),
            self.len(),
            cycles.len()
        );
        let mut next = CutFamily::from_cuts(flagged.into_iter().chain(merged));
        next.version = self.version + 1;
        next
    }
}

impl<'a> IntoIterator for &'a CutFamily {
    type Item = &'a Cut;
    type IntoIter = std::slice::Iter<'a, Cut>;

    fn into_iter(self) -> Self::IntoIter {
        self.cuts.iter()
    }
}

/// Cuts of `family` that at least one dual round assigns a strictly positive potential
pub fn flagged_cuts(family: &CutFamily, duals: &Gamma) -> Vec<Cut> {
    family
        .iter()
        .filter(|cut| {
            let element = GroundElement::Cut((*cut).clone());
            duals.iter().any(|pi| pi.get(&element) > 0.)
        })
        .cloned()
        .collect()
}

/// One cut per cycle: the cycle's vertices together with every flagged cut
/// touching one of them.
///
/// Only cuts met by the cycle itself are absorbed; a cut reached through
/// another absorbed cut is not.
pub fn merge_cycles(cycles: &[Vec<usize>], flagged: &[Cut]) -> Vec<Cut> {
    cycles
        .iter()
        .map(|cycle| {
            let mut vertices: BTreeSet<usize> = cycle.iter().cloned().collect();
            for cut in flagged {
                if cycle.iter().any(|&v| cut.contains(v)) {
                    vertices.extend(cut.vertices());
                }
            }
            Cut::new(vertices)
        })
        .collect()
}

/// What a dual potential is attached to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroundElement {
    Vertex(usize),
    Cut(Cut),
}

/// Vertices `0..n` followed by the cuts of F, for one round.
///
/// Dual LP columns follow this order.
#[derive(Debug, Clone)]
pub struct GroundSet<'a> {
    vertex_count: usize,
    family: &'a CutFamily,
}

impl<'a> GroundSet<'a> {
    pub fn new(graph: &Graph, family: &'a CutFamily) -> GroundSet<'a> {
        GroundSet {
            vertex_count: graph.vertex_count(),
            family,
        }
    }

    pub fn len(&self) -> usize {
        self.vertex_count + self.family.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Position of the cut at `position` in F
    pub fn cut_index(&self, position: usize) -> usize {
        self.vertex_count + position
    }

    pub fn element(&self, index: usize) -> GroundElement {
        if index < self.vertex_count {
            GroundElement::Vertex(index)
        } else {
            GroundElement::Cut(self.family.get(index - self.vertex_count).clone())
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = GroundElement> + '_ {
        (0..self.len()).map(move |index| self.element(index))
    }
}

/// Potentials found by one dual round. Missing elements have potential 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DualAssignment(HashMap<GroundElement, f64>);

impl DualAssignment {
    pub fn new() -> DualAssignment {
        DualAssignment::default()
    }

    pub fn get(&self, element: &GroundElement) -> f64 {
        self.0.get(element).cloned().unwrap_or(0.)
    }

    pub fn insert(&mut self, element: GroundElement, value: f64) {
        self.0.insert(element, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::iter::FromIterator<(GroundElement, f64)> for DualAssignment {
    fn from_iter<I: IntoIterator<Item = (GroundElement, f64)>>(iter: I) -> Self {
        DualAssignment(iter.into_iter().collect())
    }
}

/// The dual assignments of every perturbation round, in round order.
/// One round's output is the next round's input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gamma(Vec<DualAssignment>);

impl Gamma {
    /// All-zero potentials for the `edge_count + 1` rounds of the first iteration
    pub fn zero(graph: &Graph) -> Gamma {
        let zero: DualAssignment = (0..graph.vertex_count())
            .map(|v| (GroundElement::Vertex(v), 0.))
            .collect();
        Gamma(vec![zero; graph.edge_count() + 1])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn round(&self, index: usize) -> &DualAssignment {
        &self.0[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DualAssignment> {
        self.0.iter()
    }

    pub fn push(&mut self, assignment: DualAssignment) {
        self.0.push(assignment);
    }
}

impl From<Vec<DualAssignment>> for Gamma {
    fn from(rounds: Vec<DualAssignment>) -> Self {
        Gamma(rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cut(vertices: &[usize]) -> Cut {
        Cut::new(vertices.iter().cloned())
    }

    fn potentials(values: &[(Cut, f64)]) -> DualAssignment {
        values
            .iter()
            .map(|(c, v)| (GroundElement::Cut(c.clone()), *v))
            .collect()
    }

    #[test]
    fn cuts_are_canonical() {
        assert_eq!(cut(&[3, 1, 2, 1]), cut(&[1, 2, 3]));
        assert!(cut(&[5, 0, 9]).contains(9));
        assert!(!cut(&[5, 0, 9]).contains(4));
    }

    #[test]
    fn family_collapses_duplicates() {
        let f = CutFamily::from_cuts(vec![cut(&[2, 1, 0]), cut(&[0, 1, 2]), cut(&[])]);
        assert_eq!(f.len(), 1);
        assert!(f.contains(&cut(&[0, 1, 2])));
    }

    #[test]
    fn flagged_when_any_round_is_positive() {
        let f = CutFamily::from_cuts(vec![cut(&[0, 1, 2]), cut(&[3, 4, 5])]);
        let duals = Gamma::from(vec![
            potentials(&[(cut(&[0, 1, 2]), 0.), (cut(&[3, 4, 5]), 0.)]),
            potentials(&[(cut(&[0, 1, 2]), 0.5), (cut(&[3, 4, 5]), -1.)]),
        ]);
        assert_eq!(flagged_cuts(&f, &duals), vec![cut(&[0, 1, 2])]);
    }

    #[test]
    fn merge_absorbs_touching_cuts_once() {
        let flagged = vec![cut(&[2, 7, 8]), cut(&[8, 9, 10]), cut(&[20, 21, 22])];
        let merged = merge_cycles(&[vec![0, 1, 2]], &flagged);
        // [8, 9, 10] only touches an absorbed cut, not the cycle
        assert_eq!(merged, vec![cut(&[0, 1, 2, 7, 8])]);
    }

    #[test]
    fn next_family_is_flagged_plus_merged() {
        let f = CutFamily::from_cuts(vec![cut(&[0, 1, 2]), cut(&[6, 7, 8])]);
        let duals = Gamma::from(vec![potentials(&[(cut(&[0, 1, 2]), 1.)])]);
        let next = f.next(&duals, &[vec![2, 3, 4]]);
        assert_eq!(next.version(), 1);
        assert_eq!(
            next.iter().cloned().collect::<Vec<_>>(),
            vec![cut(&[0, 1, 2]), cut(&[0, 1, 2, 3, 4])]
        );
    }

    #[test]
    fn ground_set_lists_vertices_then_cuts() {
        let g = Graph::from_edges(4, &[(0, 1, 1.), (2, 3, 1.)]);
        let f = CutFamily::from_cuts(vec![cut(&[0, 1, 2])]);
        let ground = GroundSet::new(&g, &f);
        assert_eq!(ground.len(), 5);
        assert_eq!(ground.element(3), GroundElement::Vertex(3));
        assert_eq!(ground.element(4), GroundElement::Cut(cut(&[0, 1, 2])));
        assert_eq!(ground.cut_index(0), 4);
    }

    #[test]
    fn zero_gamma_has_one_round_per_edge_plus_one() {
        let g = Graph::from_edges(4, &[(0, 1, 1.), (1, 2, 1.), (2, 3, 1.)]);
        let gamma = Gamma::zero(&g);
        assert_eq!(gamma.len(), 4);
        assert_eq!(gamma.round(0).get(&GroundElement::Vertex(2)), 0.);
    }
}
