//! Provides struct for representing a constraint in an optimization problem
use std::fmt::{Display, Formatter};

/// Represents a linear constraint in an optimization problem
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Represents an equality constraint, where `terms` = `equals`
    Equality {
        /// Identifier of the constraint
        id: String,
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The right hand side of the equality constraint
        equals: f64,
    },
    /// Represents an inequality constraint, `lower_bound` <= `terms` <= `upper_bound`
    Inequality {
        /// Identifier of the constraint
        id: String,
        /// Linear terms which are added together, see [`ConstraintTerm`] for more
        terms: Vec<ConstraintTerm>,
        /// The lowest value the sum of the terms can take, may be `f64::NEG_INFINITY`
        lower_bound: f64,
        /// The highest value the sum of the terms can take, may be `f64::INFINITY`
        upper_bound: f64,
    },
}

impl Constraint {
    /// Create a new equality constraint
    ///
    /// # Parameters
    /// - `id`: Identifier of the constraint
    /// - `terms`: Pairs of (variable index, coefficient)
    /// - `equals`: The right hand side of the equality
    ///
    /// # Examples
    /// ```rust
    /// use aloh_core::optimize::constraint::Constraint;
    /// // Represents 3*x0 + 2*x1 = 6
    /// let cons = Constraint::new_equality("c", &[(0, 3.0), (1, 2.0)], 6.);
    /// assert_eq!(format!("{}", cons), "3*x0 + 2*x1 = 6");
    /// ```
    pub fn new_equality(id: &str, terms: &[(usize, f64)], equals: f64) -> Self {
        Constraint::Equality {
            id: id.to_string(),
            terms: Constraint::zip_into_terms(terms),
            equals,
        }
    }

    /// Create a new inequality constraint
    ///
    /// # Parameters
    /// - `id`: Identifier of the constraint
    /// - `terms`: Pairs of (variable index, coefficient)
    /// - `lower_bound`: The lowest value the constraint can take
    /// - `upper_bound`: The highest value the constraint can take
    pub fn new_inequality(
        id: &str,
        terms: &[(usize, f64)],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Constraint::Inequality {
            id: id.to_string(),
            terms: Constraint::zip_into_terms(terms),
            lower_bound,
            upper_bound,
        }
    }

    /// Identifier of the constraint
    pub fn get_id(&self) -> &str {
        match self {
            Constraint::Equality { id, .. } | Constraint::Inequality { id, .. } => id,
        }
    }

    /// Terms of the constraint
    pub fn terms(&self) -> &[ConstraintTerm] {
        match self {
            Constraint::Equality { terms, .. } | Constraint::Inequality { terms, .. } => terms,
        }
    }

    /// Range the sum of the terms must lie in, as `(lower, upper)`
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Constraint::Equality { equals, .. } => (*equals, *equals),
            Constraint::Inequality {
                lower_bound,
                upper_bound,
                ..
            } => (*lower_bound, *upper_bound),
        }
    }

    /// Value of the left hand side for a dense assignment of variable values
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms()
            .iter()
            .map(|t| t.coefficient * values[t.variable])
            .sum()
    }

    /// How far the assignment lies outside the allowed range, 0 when satisfied
    pub fn violation(&self, values: &[f64]) -> f64 {
        let activity = self.activity(values);
        let (lower, upper) = self.bounds();
        (lower - activity).max(activity - upper).max(0.)
    }

    fn zip_into_terms(terms: &[(usize, f64)]) -> Vec<ConstraintTerm> {
        terms
            .iter()
            .map(|&(variable, coefficient)| ConstraintTerm {
                variable,
                coefficient,
            })
            .collect()
    }

    /// Convert a slice of terms into a String representation
    fn terms_to_string(terms: &[ConstraintTerm]) -> String {
        if terms.is_empty() {
            return "0".to_string();
        }
        terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Equality { terms, equals, .. } => {
                write!(f, "{} = {}", Self::terms_to_string(terms), equals)
            }
            Constraint::Inequality {
                terms,
                lower_bound,
                upper_bound,
                ..
            } => write!(
                f,
                "{} <= {} <= {}",
                lower_bound,
                Self::terms_to_string(terms),
                upper_bound
            ),
        }
    }
}

/// Represents a single term in a constraint, specifically
/// represents the multiplication of the `variable` by the `coefficient`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintTerm {
    /// Index of the variable in the problem
    pub variable: usize,
    /// The coefficient for the variable
    pub coefficient: f64,
}

impl Display for ConstraintTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*x{}", self.coefficient, self.variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inequality_violation() {
        let cons = Constraint::new_inequality("c", &[(0, 1.), (1, -1.)], f64::NEG_INFINITY, 0.);
        assert_eq!(cons.violation(&[1., 2.]), 0.);
        assert!((cons.violation(&[3., 1.]) - 2.).abs() < 1e-12);
        assert_eq!(cons.bounds(), (f64::NEG_INFINITY, 0.));
    }

    #[test]
    fn equality_display() {
        let cons = Constraint::new_equality("balance", &[(2, 1.), (0, -0.5)], 0.);
        assert_eq!(cons.get_id(), "balance");
        assert_eq!(format!("{}", cons), "1*x2 + -0.5*x0 = 0");
        assert!((cons.violation(&[2., 0., 1.]) - 0.).abs() < 1e-12);
    }
}
