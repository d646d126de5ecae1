//! Cycles formed by the fractional edges of a primal solution
use crate::graph::Graph;

/// Every cycle made of edges with `0 < x(e) < 1`, as vertex sequences.
///
/// A cycle is seeded from an unclaimed fractional edge and grown by any edge with
/// exactly one endpoint on it, until a full pass over the remaining edges changes
/// nothing. An edge with both endpoints on the cycle closes it. Orientation is arbitrary.
pub fn extract_cycles(graph: &Graph, x: &[f64]) -> Vec<Vec<usize>> {
    let mut unclaimed: Vec<(usize, usize)> = graph
        .edges()
        .iter()
        .zip(x)
        .filter(|(_, &value)| 0. < value && value < 1.)
        .map(|(edge, _)| edge.endpoints())
        .collect();
    let mut cycles: Vec<Vec<usize>> = vec![];
    while let Some((u, v)) = unclaimed.pop() {
        cycles.push(vec![u, v]);
        let mut progress = true;
        while progress {
            progress = false;
            unclaimed.retain(|&(a, b)| {
                for cycle in cycles.iter_mut() {
                    match (cycle.contains(&a), cycle.contains(&b)) {
                        (true, false) => cycle.push(b),
                        (false, true) => cycle.push(a),
                        (true, true) => {}
                        (false, false) => continue,
                    }
                    progress = true;
                    return false;
                }
                true
            });
        }
    }
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut cycle: Vec<usize>) -> Vec<usize> {
        cycle.sort_unstable();
        cycle
    }

    #[test]
    fn one_fractional_triangle() {
        let g = Graph::from_edges(
            8,
            &[
                (0, 1, 1.),
                (1, 2, 1.),
                (2, 0, 1.),
                (3, 4, 1.),
                (5, 6, 1.),
                (6, 7, 1.),
                (2, 3, 1.),
            ],
        );
        let x = [0.5, 0.5, 0.5, 1., 1., 0., 0.];
        let cycles = extract_cycles(&g, &x);
        assert_eq!(cycles.len(), 1);
        assert_eq!(sorted(cycles[0].clone()), vec![0, 1, 2]);
    }

    #[test]
    fn edges_out_of_order_still_join() {
        // the pentagon 0-1-2-3-4 listed so that a single pass cannot close it
        let g = Graph::from_edges(
            5,
            &[(2, 3, 1.), (3, 4, 1.), (0, 4, 1.), (1, 2, 1.), (0, 1, 1.)],
        );
        let cycles = extract_cycles(&g, &[0.5; 5]);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 5);
        assert_eq!(sorted(cycles[0].clone()), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn disjoint_cycles_are_separate() {
        let g = Graph::from_edges(
            6,
            &[(0, 1, 1.), (1, 2, 1.), (2, 0, 1.), (3, 4, 1.), (4, 5, 1.), (5, 3, 1.)],
        );
        let mut cycles: Vec<_> = extract_cycles(&g, &[0.5; 6]).into_iter().map(sorted).collect();
        cycles.sort();
        assert_eq!(cycles, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn integral_solution_has_no_cycle() {
        let g = Graph::from_edges(4, &[(0, 1, 1.), (1, 2, 1.), (2, 3, 1.), (3, 0, 1.)]);
        assert!(extract_cycles(&g, &[1., 0., 1., 0.]).is_empty());
    }
}
