//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};

use derive_builder::Builder;

/// A continuous decision variable of a linear problem
///
/// # Examples
/// ```rust
/// use aloh_core::optimize::variable::VariableBuilder;
/// let x = VariableBuilder::default()
///     .id("x")
///     .lower_bound(0.0)
///     .upper_bound(20.)
///     .build()
///     .unwrap();
/// assert_eq!(x.id, "x");
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Variable {
    /// Identifier, unique within a problem
    #[builder(setter(into))]
    pub id: String,
    /// Smallest value the variable can take
    #[builder(default = "0.")]
    pub lower_bound: f64,
    /// Largest value the variable can take, may be `f64::INFINITY`
    #[builder(default = "f64::INFINITY")]
    pub upper_bound: f64,
    /// Position of the variable in the problem, assigned when it is added
    #[builder(setter(skip), default = "0")]
    pub(crate) index: usize,
}

impl Variable {
    /// Position of the variable in its problem
    pub fn index(&self) -> usize {
        self.index
    }

    /// True when the bounds pin the variable to a single value
    pub fn is_fixed(&self) -> bool {
        self.lower_bound == self.upper_bound
    }

    /// Move `value` into `[lower_bound, upper_bound]`
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower_bound).min(self.upper_bound)
    }

    /// Clamp `value` into the bounds, then move it onto a bound it is within `tolerance` of
    pub fn snap(&self, value: f64, tolerance: f64) -> f64 {
        let value = self.clamp(value);
        if value - self.lower_bound <= tolerance {
            self.lower_bound
        } else if self.upper_bound - value <= tolerance {
            self.upper_bound
        } else {
            value
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <= {} <= {}", self.lower_bound, self.id, self.upper_bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let var = VariableBuilder::default().id("x").build().unwrap();
        assert_eq!(var.lower_bound, 0.);
        assert!(var.upper_bound.is_infinite());
        assert!(!var.is_fixed());
    }

    #[test]
    fn clamp_to_bounds() {
        let var = VariableBuilder::default()
            .id("x")
            .lower_bound(1.)
            .upper_bound(2.)
            .build()
            .unwrap();
        assert_eq!(var.clamp(0.5), 1.);
        assert_eq!(var.clamp(1.5), 1.5);
        assert_eq!(var.clamp(3.), 2.);
        assert_eq!(format!("{}", var), "1 <= x <= 2");
    }

    #[test]
    fn snap_to_nearby_bound() {
        let var = VariableBuilder::default()
            .id("x")
            .upper_bound(2.)
            .build()
            .unwrap();
        assert_eq!(var.snap(2. - 4e-10, 1e-9), 2.);
        assert_eq!(var.snap(3e-10, 1e-9), 0.);
        assert_eq!(var.snap(-1., 1e-9), 0.);
        assert_eq!(var.snap(1.5, 1e-9), 1.5);
        assert_eq!(var.snap(2. - 1e-6, 1e-9), 2. - 1e-6);

        let free = VariableBuilder::default().id("y").build().unwrap();
        assert_eq!(free.snap(1e12, 1e-9), 1e12);
    }
}
