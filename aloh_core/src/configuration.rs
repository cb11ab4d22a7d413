//! Settings shared by a planning run
use std::time::Duration;

use crate::catalog::ValidationError;

/// Settings for evaluating an [`OptModel`](crate::planning::model::OptModel)
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Penalty per unit of carried inventory per day, 0 disables holding cost pressure
    pub inventory_weight: f64,
    /// Solved values with a magnitude below this are reported as 0
    pub tolerance: f64,
    /// Backend used to solve the linear problem
    pub solver: SolverBackend,
    /// Wall clock limit handed to the backend
    pub time_limit: Option<Duration>,
    /// Minimum number of planning days, the horizon is never shorter than the latest order
    pub horizon_days: Option<usize>,
    /// Let the backend print its progress
    pub verbose: bool,
    /// Re-solve for the plan with the least production and inventory among the most
    /// profitable ones, so idle products stay idle and ties between days go to the latest
    pub least_activity: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            inventory_weight: 0.,
            tolerance: 1e-9,
            solver: SolverBackend::default(),
            time_limit: None,
            horizon_days: None,
            verbose: false,
            least_activity: true,
        }
    }
}

impl Configuration {
    /// Set the inventory holding penalty
    pub fn with_inventory_weight(mut self, inventory_weight: f64) -> Self {
        self.inventory_weight = inventory_weight;
        self
    }

    /// Set the rounding tolerance applied to solved values
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Choose the solver backend
    pub fn with_solver(mut self, solver: SolverBackend) -> Self {
        self.solver = solver;
        self
    }

    /// Limit the time the backend may spend
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Plan over at least `horizon_days` days
    pub fn with_horizon_days(mut self, horizon_days: usize) -> Self {
        self.horizon_days = Some(horizon_days);
        self
    }

    /// Turn the least activity re-solve on or off
    pub fn with_least_activity(mut self, least_activity: bool) -> Self {
        self.least_activity = least_activity;
        self
    }

    /// Check the settings before they are used to build a problem
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.inventory_weight >= 0.) || !self.inventory_weight.is_finite() {
            return Err(ValidationError::InvalidConfiguration {
                field: "inventory_weight",
                value: self.inventory_weight,
            });
        }
        if !(self.tolerance >= 0.) || !self.tolerance.is_finite() {
            return Err(ValidationError::InvalidConfiguration {
                field: "tolerance",
                value: self.tolerance,
            });
        }
        Ok(())
    }
}

/// Enum used to specify the solver backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    /// Use the Clarabel interior point solver
    Clarabel,
    /// Use the HiGHS solver, requires the highs feature to be enabled
    Highs,
    /// Use the microlp simplex solver, requires the minilp feature to be enabled
    Microlp,
}

impl Default for SolverBackend {
    /// HiGHS, then microlp, then Clarabel, depending on the enabled features
    fn default() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "highs")] {
                SolverBackend::Highs
            } else if #[cfg(feature = "minilp")] {
                SolverBackend::Microlp
            } else {
                SolverBackend::Clarabel
            }
        }
    }
}
