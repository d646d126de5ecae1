//! Minimum-weight perfect matchings in general graphs, computed with the
//! unperturbed C-P-Matching algorithm.
//!
//! The algorithm alternates two kinds of linear programs. The primal `P_F` finds a
//! minimum-cost fractional perfect matching that crosses every cut of a family F
//! at least once. When its optimum is not integral, a sequence of dual LPs `D*_F`
//! (one per "fake perturbation") tells which cuts of F must stay, and the vertex
//! sets of the fractional cycles are added. Once `P_F` is integral, it is a
//! minimum-weight perfect matching.
//!
//! ```
//! use cp_matching::graph::Graph;
//! use cp_matching::{CpMatching, MatchingConfig, solvers::MicroLpSolver};
//!
//! let triangles = Graph::from_edges(6, &[
//!     (0, 1, 1.), (1, 2, 1.), (2, 0, 1.),
//!     (3, 4, 1.), (4, 5, 1.), (5, 3, 1.),
//!     (2, 3, 10.),
//! ]);
//! let matching = CpMatching::new(MicroLpSolver::new(), MatchingConfig::new())
//!     .run(&triangles)
//!     .unwrap();
//! assert_eq!(matching.cost, 12.);
//! ```

pub mod cut_family;
pub mod cycles;
pub mod dual;
pub mod error;
pub mod graph;
pub mod lp_format;
pub mod matching;
pub mod partition;
pub mod primal;
pub mod problem;
pub mod runner;
pub mod solvers;

pub use error::{ConfigError, MatchingError, Result, SolverError};
pub use matching::{find_matching, CpMatching, Matching, MatchingConfig, DEFAULT_PRECISION};
