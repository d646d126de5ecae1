//! Undirected weighted graphs, the input of the matching algorithm
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An undirected edge between two vertices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    /// Cost of putting the edge in the matching
    pub weight: f64,
}

impl Edge {
    pub fn new(u: usize, v: usize, weight: f64) -> Self {
        Edge { u, v, weight }
    }

    pub fn endpoints(&self) -> (usize, usize) {
        (self.u, self.v)
    }

    /// Whether `vertex` is one of the two endpoints
    pub fn touches(&self, vertex: usize) -> bool {
        self.u == vertex || self.v == vertex
    }
}

/// Vertices are numbered `0..vertex_count`, edges by insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(rename = "vertices")]
    vertex_count: usize,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(vertex_count: usize) -> Self {
        Graph {
            vertex_count,
            edges: vec![],
        }
    }

    /// Build a graph from `(u, v, weight)` triples
    ///
    /// ```
    /// use cp_matching::graph::Graph;
    ///
    /// let g = Graph::from_edges(4, &[(0, 1, 1.), (1, 2, 1.), (2, 3, 5.), (3, 0, 5.)]);
    /// assert_eq!(g.edge_count(), 4);
    /// assert_eq!(g.degree(0), 2);
    /// ```
    pub fn from_edges(vertex_count: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut graph = Graph::new(vertex_count);
        for &(u, v, weight) in edges {
            graph.add_edge(u, v, weight);
        }
        graph
    }

    /// Add an edge and return its index
    pub fn add_edge(&mut self, u: usize, v: usize, weight: f64) -> usize {
        self.edges.push(Edge::new(u, v, weight));
        self.edges.len() - 1
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> &Edge {
        &self.edges[index]
    }

    pub fn weights(&self) -> Vec<f64> {
        self.edges.iter().map(|e| e.weight).collect()
    }

    pub fn degree(&self, vertex: usize) -> usize {
        self.edges.iter().filter(|e| e.touches(vertex)).count()
    }

    /// Connected components, each sorted, in order of their smallest vertex
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![vec![]; self.vertex_count];
        for e in &self.edges {
            if e.u < self.vertex_count && e.v < self.vertex_count {
                adjacency[e.u].push(e.v);
                adjacency[e.v].push(e.u);
            }
        }
        let mut seen = vec![false; self.vertex_count];
        let mut components = vec![];
        for start in 0..self.vertex_count {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut component = vec![];
            let mut queue = VecDeque::from(vec![start]);
            while let Some(vertex) = queue.pop_front() {
                component.push(vertex);
                for &next in &adjacency[vertex] {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    /// Reject graphs that cannot have a perfect matching or would feed garbage to the solver
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vertex_count == 0 {
            return Err(ConfigError::NoVertices);
        }
        if self.edges.is_empty() {
            return Err(ConfigError::NoEdges);
        }
        for (index, e) in self.edges.iter().enumerate() {
            if !e.weight.is_finite() {
                return Err(ConfigError::UnweightedEdge { edge: index });
            }
            for &vertex in &[e.u, e.v] {
                if vertex >= self.vertex_count {
                    return Err(ConfigError::EndpointOutOfRange {
                        edge: index,
                        vertex,
                        vertex_count: self.vertex_count,
                    });
                }
            }
            if e.u == e.v {
                return Err(ConfigError::SelfLoop {
                    edge: index,
                    vertex: e.u,
                });
            }
        }
        if let Some(vertex) = (0..self.vertex_count).find(|&v| self.degree(v) == 0) {
            return Err(ConfigError::IsolatedVertex { vertex });
        }
        if let Some(component) = self.components().iter().find(|c| c.len() % 2 == 1) {
            return Err(ConfigError::OddComponent {
                size: component.len(),
            });
        }
        Ok(())
    }

    /// Add `0.5^i` to the weight of the `i`-th edge (counting from 1).
    ///
    /// Makes the minimum-cost perfect matching unique, which is handy to compare
    /// the unperturbed algorithm against a really perturbed instance.
    pub fn perturb_weights(&mut self) {
        let mut delta = 1.;
        for e in self.edges.iter_mut() {
            delta /= 2.;
            e.weight += delta;
        }
    }

    /// Total weight of a (possibly fractional) edge vector
    pub fn cost(&self, x: &[f64]) -> f64 {
        self.edges.iter().zip(x).map(|(e, value)| e.weight * value).sum()
    }
}
