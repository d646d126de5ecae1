//! Dense linear programs in the form every solver back-end accepts:
//!
//! minimize `c·x` subject to `A_ub x <= b_ub`, `A_eq x = b_eq` and one pair of bounds
//! shared by every variable.
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Formatter;

use crate::lp_format::{AsVariable, Constraint, LpObjective, LpProblem, WriteToLpFileFormat};

/// The same `(low, high)` pair applies to every variable. `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Bounds {
    /// `0 <= x`
    pub const NON_NEGATIVE: Bounds = Bounds {
        lower: Some(0.),
        upper: None,
    };
    /// No bound at all
    pub const FREE: Bounds = Bounds {
        lower: None,
        upper: None,
    };

    pub fn lower_or_infinite(&self) -> f64 {
        self.lower.unwrap_or(f64::NEG_INFINITY)
    }

    pub fn upper_or_infinite(&self) -> f64 {
        self.upper.unwrap_or(f64::INFINITY)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    pub name: String,
    pub objective: Vec<f64>,
    pub a_ub: Vec<Vec<f64>>,
    pub b_ub: Vec<f64>,
    pub a_eq: Vec<Vec<f64>>,
    pub b_eq: Vec<f64>,
    pub bounds: Bounds,
}

impl LinearProgram {
    /// A problem with no constraint yet
    pub fn new(name: impl Into<String>, objective: Vec<f64>, bounds: Bounds) -> Self {
        LinearProgram {
            name: name.into(),
            objective,
            a_ub: vec![],
            b_ub: vec![],
            a_eq: vec![],
            b_eq: vec![],
            bounds,
        }
    }

    pub fn variable_count(&self) -> usize {
        self.objective.len()
    }

    /// Add the row `coefficients · x <= rhs`
    pub fn add_upper_bound(&mut self, coefficients: Vec<f64>, rhs: f64) {
        debug_assert_eq!(coefficients.len(), self.variable_count());
        self.a_ub.push(coefficients);
        self.b_ub.push(rhs);
    }

    /// Add the row `coefficients · x = rhs`
    pub fn add_equality(&mut self, coefficients: Vec<f64>, rhs: f64) {
        debug_assert_eq!(coefficients.len(), self.variable_count());
        self.a_eq.push(coefficients);
        self.b_eq.push(rhs);
    }

    pub fn objective_value(&self, x: &[f64]) -> f64 {
        dot(&self.objective, x)
    }

    /// `b_ub - A_ub x`, one entry per inequality row
    pub fn slack(&self, x: &[f64]) -> Vec<f64> {
        self.a_ub
            .iter()
            .zip(&self.b_ub)
            .map(|(row, rhs)| rhs - dot(row, x))
            .collect()
    }

    /// Name of the `index`-th variable in the .lp format
    pub fn variable_name(index: usize) -> String {
        format!("x{}", index)
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(p, q)| p * q).sum()
}

/// A borrowed row of coefficients, written as `2 x0 - x3 + 0.5 x4`
pub struct RowExpression<'a>(pub &'a [f64]);

impl<'a> WriteToLpFileFormat for RowExpression<'a> {
    fn to_lp_file_format(&self, f: &mut Formatter) -> fmt::Result {
        let mut first = true;
        for (index, &coefficient) in self.0.iter().enumerate() {
            if coefficient == 0. {
                continue;
            }
            let magnitude = coefficient.abs();
            match (first, coefficient < 0.) {
                (true, false) => {}
                (true, true) => write!(f, "-")?,
                (false, false) => write!(f, " + ")?,
                (false, true) => write!(f, " - ")?,
            }
            if magnitude != 1. {
                write!(f, "{} ", magnitude)?;
            }
            write!(f, "{}", LinearProgram::variable_name(index))?;
            first = false;
        }
        if first {
            // the format has no empty expression
            write!(f, "0 {}", LinearProgram::variable_name(0))?;
        }
        Ok(())
    }
}

/// A variable of a [LinearProgram], as seen by the .lp writer
pub struct Column {
    name: String,
    bounds: Bounds,
}

impl AsVariable for Column {
    fn name(&self) -> &str {
        &self.name
    }

    fn lower_bound(&self) -> f64 {
        self.bounds.lower_or_infinite()
    }

    fn upper_bound(&self) -> f64 {
        self.bounds.upper_or_infinite()
    }
}

impl<'a> LpProblem<'a> for LinearProgram {
    type Variable = Column;
    type Expression = RowExpression<'a>;
    type ConstraintIterator = Box<dyn Iterator<Item = Constraint<RowExpression<'a>>> + 'a>;
    type VariableIterator = Box<dyn Iterator<Item = Column> + 'a>;

    fn name(&self) -> &str {
        &self.name
    }

    fn variables(&'a self) -> Self::VariableIterator {
        let bounds = self.bounds;
        Box::new((0..self.variable_count()).map(move |index| Column {
            name: LinearProgram::variable_name(index),
            bounds,
        }))
    }

    fn objective(&'a self) -> Self::Expression {
        RowExpression(&self.objective)
    }

    fn sense(&self) -> LpObjective {
        LpObjective::Minimize
    }

    fn constraints(&'a self) -> Self::ConstraintIterator {
        let upper = self
            .a_ub
            .iter()
            .zip(&self.b_ub)
            .enumerate()
            .map(|(index, (row, &rhs))| Constraint {
                name: format!("u{}", index),
                lhs: RowExpression(row),
                operator: Ordering::Less,
                rhs,
            });
        let equal = self
            .a_eq
            .iter()
            .zip(&self.b_eq)
            .enumerate()
            .map(|(index, (row, &rhs))| Constraint {
                name: format!("e{}", index),
                lhs: RowExpression(row),
                operator: Ordering::Equal,
                rhs,
            });
        Box::new(upper.chain(equal))
    }
}
