//! Solver parameters.

use serde::{Deserialize, Serialize};

/// Levenberg–Marquardt parameters for [`RelaxGraph::relax_ls`](super::RelaxGraph::relax_ls).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LsConfig {
    /// Maximum accepted steps.
    #[serde(default = "default_ls_max_iterations")]
    pub max_iterations: usize,

    /// Absolute step tolerance.
    #[serde(default = "default_ls_epsabs")]
    pub epsabs: f64,

    /// Relative step tolerance.
    #[serde(default)]
    pub epsrel: f64,

    /// Starting damping.
    #[serde(default = "default_initial_lambda")]
    pub initial_lambda: f64,

    /// Multiplier applied to damping on a rejected step.
    #[serde(default = "default_lambda_factor")]
    pub lambda_factor: f64,

    /// Floor for damping after an accepted step.
    #[serde(default = "default_min_lambda")]
    pub min_lambda: f64,

    /// Damping at which the solver gives up.
    #[serde(default = "default_max_lambda")]
    pub max_lambda: f64,
}

fn default_ls_max_iterations() -> usize {
    100
}

fn default_ls_epsabs() -> f64 {
    1e-4
}

fn default_initial_lambda() -> f64 {
    1e-3
}

fn default_lambda_factor() -> f64 {
    10.0
}

fn default_min_lambda() -> f64 {
    1e-7
}

fn default_max_lambda() -> f64 {
    1e7
}

impl Default for LsConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_ls_max_iterations(),
            epsabs: default_ls_epsabs(),
            epsrel: 0.0,
            initial_lambda: default_initial_lambda(),
            lambda_factor: default_lambda_factor(),
            min_lambda: default_min_lambda(),
            max_lambda: default_max_lambda(),
        }
    }
}

impl LsConfig {
    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the step tolerances.
    pub fn with_tolerances(mut self, epsabs: f64, epsrel: f64) -> Self {
        self.epsabs = epsabs;
        self.epsrel = epsrel;
        self
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.epsabs < 0.0 || self.epsrel < 0.0 {
            return Err("relax.ls tolerances must be non-negative".into());
        }
        if self.lambda_factor <= 1.0 {
            return Err(format!(
                "relax.ls.lambda_factor must be > 1, got {}",
                self.lambda_factor
            ));
        }
        if !(self.min_lambda > 0.0 && self.min_lambda <= self.initial_lambda
            && self.initial_lambda <= self.max_lambda)
        {
            return Err("relax.ls damping must satisfy 0 < min <= initial <= max".into());
        }
        Ok(())
    }
}

/// Conjugate-gradient parameters for [`RelaxGraph::relax_nl`](super::RelaxGraph::relax_nl).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NlConfig {
    /// Maximum conjugate-gradient iterations.
    #[serde(default = "default_nl_max_iterations")]
    pub max_iterations: usize,

    /// Stop once the relative improvement between iterations drops below this.
    #[serde(default = "default_nl_epsabs")]
    pub epsabs: f64,

    /// First trial step length of each line search.
    #[serde(default = "default_step")]
    pub step: f64,

    /// Line search accuracy: target |slope| relative to the starting slope.
    #[serde(default = "default_tol")]
    pub tol: f64,
}

fn default_nl_max_iterations() -> usize {
    1000
}

fn default_nl_epsabs() -> f64 {
    1e-7
}

fn default_step() -> f64 {
    1e-3
}

fn default_tol() -> f64 {
    1e-4
}

impl Default for NlConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_nl_max_iterations(),
            epsabs: default_nl_epsabs(),
            step: default_step(),
            tol: default_tol(),
        }
    }
}

impl NlConfig {
    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the relative-improvement stopping threshold.
    pub fn with_epsabs(mut self, epsabs: f64) -> Self {
        self.epsabs = epsabs;
        self
    }

    /// Set the line search step and accuracy.
    pub fn with_line_search(mut self, step: f64, tol: f64) -> Self {
        self.step = step;
        self.tol = tol;
        self
    }

    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.epsabs < 0.0 {
            return Err("relax.nl.epsabs must be non-negative".into());
        }
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(format!("relax.nl.step must be positive, got {}", self.step));
        }
        if !(self.tol > 0.0 && self.tol < 1.0) {
            return Err(format!("relax.nl.tol must be in (0, 1), got {}", self.tol));
        }
        Ok(())
    }
}

/// Solver parameters for both relaxation forms.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelaxConfig {
    /// Levenberg–Marquardt solver.
    #[serde(default)]
    pub ls: LsConfig,
    /// Conjugate-gradient solver.
    #[serde(default)]
    pub nl: NlConfig,
}

impl RelaxConfig {
    /// Check both solver sections.
    pub fn validate(&self) -> Result<(), String> {
        self.ls.validate()?;
        self.nl.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(RelaxConfig::default().validate().is_ok());
        assert_eq!(LsConfig::default().max_iterations, 100);
        assert_eq!(NlConfig::default().max_iterations, 1000);
    }

    #[test]
    fn test_rejects_bad_values() {
        let ls = LsConfig {
            lambda_factor: 1.0,
            ..LsConfig::default()
        };
        assert!(ls.validate().is_err());
        assert!(NlConfig::default().with_line_search(0.0, 0.1).validate().is_err());
        assert!(NlConfig::default().with_line_search(1e-3, 1.5).validate().is_err());
    }
}
