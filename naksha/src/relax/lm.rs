//! Solver A: Levenberg–Marquardt over the stacked link residuals.

use std::sync::atomic::{AtomicBool, Ordering};

use nalgebra::{DMatrix, DVector};

use super::config::LsConfig;
use super::graph::RelaxGraph;
use super::problem::Problem;

/// Smallest diagonal entry used when scaling the damping term.
const DIAGONAL_FLOOR: f64 = 1e-9;

/// Outcome of [`RelaxGraph::relax_ls`].
#[derive(Clone, Debug, PartialEq)]
pub struct LsReport {
    /// Sum of squared residuals at the returned poses (0 when under-determined).
    pub error: f64,
    /// Accepted steps taken.
    pub iterations: usize,
    /// True if the step tolerance was met.
    pub converged: bool,
    /// More free parameters than links; nothing was solved.
    pub underdetermined: bool,
    /// Stopped by the cancel flag; poses were left untouched.
    pub cancelled: bool,
    /// Damping at exit.
    pub lambda: f64,
}

/// Adaptive damping for the normal equations.
///
/// Good steps (actual reduction close to predicted) shrink lambda, bad ones
/// grow it.
struct AdaptiveLM {
    lambda: f64,
    lambda_factor: f64,
    min_lambda: f64,
    max_lambda: f64,
}

impl AdaptiveLM {
    fn new(config: &LsConfig) -> Self {
        Self {
            lambda: config.initial_lambda,
            lambda_factor: config.lambda_factor,
            min_lambda: config.min_lambda,
            max_lambda: config.max_lambda,
        }
    }

    fn damping(&self) -> f64 {
        self.lambda
    }

    /// `rho` is actual over predicted cost reduction.
    fn update(&mut self, rho: f64) {
        if rho > 0.75 {
            self.lambda = (self.lambda / self.lambda_factor).max(self.min_lambda);
        } else if rho > 0.25 {
            self.lambda = (self.lambda / self.lambda_factor.sqrt()).max(self.min_lambda);
        } else if rho < 0.0 {
            self.lambda = (self.lambda * self.lambda_factor).min(self.max_lambda);
        }
    }

    fn reject_step(&mut self) {
        self.lambda = (self.lambda * self.lambda_factor).min(self.max_lambda);
    }

    fn is_stuck(&self) -> bool {
        self.lambda >= self.max_lambda * 0.99
    }
}

/// Solve `(A + λ·diag(A)) δ = -g`.
fn damped_step(a: &DMatrix<f64>, g: &DVector<f64>, lambda: f64) -> Option<DVector<f64>> {
    let mut damped = a.clone();
    for i in 0..damped.nrows() {
        damped[(i, i)] += lambda * a[(i, i)].max(DIAGONAL_FLOOR);
    }
    let rhs = -g;
    match damped.clone().cholesky() {
        Some(chol) => Some(chol.solve(&rhs)),
        None => damped.lu().solve(&rhs),
    }
}

/// `|δᵢ| < epsabs + epsrel·|xᵢ|` for every component.
fn step_converged(step: &DVector<f64>, x: &DVector<f64>, epsabs: f64, epsrel: f64) -> bool {
    step.iter()
        .zip(x.iter())
        .all(|(d, xi)| d.abs() < epsabs + epsrel * xi.abs())
}

impl RelaxGraph {
    /// Relax the free poses with Levenberg–Marquardt.
    ///
    /// Each link contributes one residual `u` (linear cost form). If the
    /// graph has more free parameters than links the call returns an error
    /// of 0 without iterating. Poses are written back on completion.
    pub fn relax_ls(&mut self, config: &LsConfig) -> LsReport {
        self.relax_ls_cancellable(config, &AtomicBool::new(false))
    }

    /// [`relax_ls`](Self::relax_ls) that stops early once `cancel` is set.
    pub fn relax_ls_cancellable(&mut self, config: &LsConfig, cancel: &AtomicBool) -> LsReport {
        let problem = Problem::build(self);
        let mut lm = AdaptiveLM::new(config);

        if problem.dim() > self.link_count() {
            log::debug!(
                "relax_ls: {} parameters for {} links, skipping",
                problem.dim(),
                self.link_count()
            );
            return LsReport {
                error: 0.0,
                iterations: 0,
                converged: false,
                underdetermined: true,
                cancelled: false,
                lambda: lm.damping(),
            };
        }

        let mut x = problem.initial().clone();
        let (mut r, mut j) = problem.residuals_and_jacobian(&x);
        let mut cost = r.norm_squared();
        let initial_cost = cost;
        let mut iterations = 0;
        let mut converged = false;
        let mut cancelled = false;

        'outer: while iterations < config.max_iterations {
            if cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }

            let a = j.transpose() * &j;
            let g = j.transpose() * &r;

            // Retry with more damping until a step does not increase the cost.
            let step = loop {
                let Some(step) = damped_step(&a, &g, lm.damping()) else {
                    lm.reject_step();
                    if lm.is_stuck() {
                        break 'outer;
                    }
                    continue;
                };

                let candidate = &x + &step;
                let new_cost = problem.residuals(&candidate).norm_squared();
                if new_cost <= cost {
                    let predicted = -(2.0 * step.dot(&g) + step.dot(&(&a * &step)));
                    let rho = if predicted > 0.0 {
                        (cost - new_cost) / predicted
                    } else {
                        1.0
                    };
                    lm.update(rho);
                    x = candidate;
                    (r, j) = problem.residuals_and_jacobian(&x);
                    cost = r.norm_squared();
                    break step;
                }

                lm.reject_step();
                if lm.is_stuck() {
                    log::debug!("relax_ls: damping saturated at {:.1e}", lm.damping());
                    break 'outer;
                }
            };

            iterations += 1;
            log::trace!(
                "relax_ls iter {}: cost={:.6e} |step|={:.3e} lambda={:.1e}",
                iterations,
                cost,
                step.norm(),
                lm.damping()
            );

            if step_converged(&step, &x, config.epsabs, config.epsrel) {
                converged = true;
                break;
            }
        }

        if cancelled {
            log::debug!("relax_ls: cancelled after {} iterations", iterations);
        } else {
            self.write_back(x.as_slice());
            log::debug!(
                "relax_ls: {} links, {} params, cost {:.6e} -> {:.6e} (squared {:.6e}) in {} iterations (converged={})",
                problem.rows(),
                problem.dim(),
                initial_cost,
                cost,
                problem.cost(&x),
                iterations,
                converged
            );
        }

        LsReport {
            error: cost,
            iterations,
            converged,
            underdetermined: false,
            cancelled,
            lambda: lm.damping(),
        }
    }
}
