//! Solver B: Fletcher–Reeves nonlinear conjugate gradient.

use std::sync::atomic::{AtomicBool, Ordering};

use nalgebra::DVector;

use super::config::NlConfig;
use super::graph::RelaxGraph;
use super::problem::Problem;

/// Halvings/doublings allowed while bracketing a line minimum.
const MAX_BRACKET_STEPS: usize = 50;

/// Secant rounds allowed while refining a line minimum.
const MAX_REFINE_STEPS: usize = 20;

/// Outcome of [`RelaxGraph::relax_nl`].
#[derive(Clone, Debug, PartialEq)]
pub struct CgReport {
    /// Total squared-form cost at the returned poses.
    pub error: f64,
    /// Iterations actually used.
    pub iterations: usize,
    /// Gradient norm at exit.
    pub gradient_norm: f64,
    /// Length of the last accepted line step.
    pub step_size: f64,
    /// Times the search direction was reset to steepest descent.
    pub restarts: usize,
    /// Stopped because no line step reduced the cost.
    pub stalled: bool,
    /// Stopped by the cancel flag; poses were left untouched.
    pub cancelled: bool,
}

/// A point evaluated along a search line.
struct LinePoint {
    t: f64,
    x: DVector<f64>,
    cost: f64,
    gradient: DVector<f64>,
}

struct LineSearch<'a> {
    problem: &'a Problem,
    origin: &'a DVector<f64>,
    dir: &'a DVector<f64>,
}

impl LineSearch<'_> {
    fn eval(&self, t: f64) -> LinePoint {
        let x = self.origin + self.dir * t;
        let (cost, gradient) = self.problem.cost_and_gradient(&x);
        LinePoint {
            t,
            x,
            cost,
            gradient,
        }
    }

    fn slope(&self, point: &LinePoint) -> f64 {
        point.gradient.dot(self.dir)
    }

    /// Find a point below `cost0` along the unit direction, then narrow a
    /// slope bracket around the line minimum until the slope at the best
    /// point is within `tol` of the starting slope.
    fn run(&self, cost0: f64, slope0: f64, initial: f64, tol: f64) -> Option<LinePoint> {
        let mut best = self.eval(initial);

        if best.cost >= cost0 {
            let mut found = None;
            let mut t = initial;
            for _ in 0..MAX_BRACKET_STEPS {
                t *= 0.5;
                let p = self.eval(t);
                if p.cost < cost0 {
                    found = Some(p);
                    break;
                }
            }
            best = found?;
        } else {
            for _ in 0..MAX_BRACKET_STEPS {
                let p = self.eval(best.t * 2.0);
                if p.cost < best.cost {
                    best = p;
                } else {
                    break;
                }
            }
        }

        let target = tol * slope0.abs();
        let mut best_slope = self.slope(&best);
        if best_slope.abs() <= target {
            return Some(best);
        }

        // (t, slope) with slope < 0 at `lo` and > 0 at `hi`.
        let (mut lo, mut hi) = if best_slope < 0.0 {
            let beyond = self.eval(best.t * 2.0);
            let beyond_slope = self.slope(&beyond);
            if beyond_slope <= 0.0 {
                return Some(best);
            }
            ((best.t, best_slope), (beyond.t, beyond_slope))
        } else {
            ((0.0, slope0), (best.t, best_slope))
        };

        for _ in 0..MAX_REFINE_STEPS {
            let width = hi.0 - lo.0;
            let secant = lo.0 + width * lo.1 / (lo.1 - hi.1);
            let t = secant.clamp(lo.0 + 0.05 * width, hi.0 - 0.05 * width);
            let p = self.eval(t);
            let slope = self.slope(&p);
            if slope < 0.0 {
                lo = (t, slope);
            } else {
                hi = (t, slope);
            }
            if p.cost < best.cost {
                best = p;
                best_slope = slope;
            }
            if best_slope.abs() <= target {
                break;
            }
        }

        Some(best)
    }
}

impl RelaxGraph {
    /// Relax the free poses by minimising the total squared-form cost with
    /// Fletcher–Reeves conjugate gradient. Poses are written back on
    /// completion.
    pub fn relax_nl(&mut self, config: &NlConfig) -> CgReport {
        self.relax_nl_cancellable(config, &AtomicBool::new(false))
    }

    /// [`relax_nl`](Self::relax_nl) that stops early once `cancel` is set.
    pub fn relax_nl_cancellable(&mut self, config: &NlConfig, cancel: &AtomicBool) -> CgReport {
        let problem = Problem::build(self);
        let dim = problem.dim();

        let mut x = problem.initial().clone();
        let (mut cost, mut gradient) = problem.cost_and_gradient(&x);
        let initial_cost = cost;
        let mut direction = -&gradient;
        let mut step_size = 0.0;
        let mut trial = config.step;
        let mut last_error = f64::MAX / 2.0;
        let mut iterations = 0;
        let mut restarts = 0;
        let mut stalled = false;
        let mut cancelled = false;

        while iterations < config.max_iterations {
            if cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }
            let dir_norm = direction.norm();
            if dim == 0 || dir_norm == 0.0 {
                break;
            }

            let dir = &direction / dir_norm;
            let slope0 = gradient.dot(&dir);
            let search = LineSearch {
                problem: &problem,
                origin: &x,
                dir: &dir,
            };
            let Some(point) = search.run(cost, slope0, trial, config.tol) else {
                stalled = true;
                break;
            };
            iterations += 1;

            let beta = point.gradient.norm_squared() / gradient.norm_squared();
            step_size = point.t;
            trial = point.t;
            x = point.x;
            cost = point.cost;
            gradient = point.gradient;

            direction = if iterations % dim == 0 {
                restarts += 1;
                -&gradient
            } else {
                let d = &direction * beta - &gradient;
                if d.dot(&gradient) < 0.0 {
                    d
                } else {
                    restarts += 1;
                    -&gradient
                }
            };

            log::trace!(
                "relax_nl iter {}: cost={:.6e} step={:.3e} |g|={:.3e}",
                iterations,
                cost,
                step_size,
                gradient.norm()
            );

            if (cost - last_error).abs() / (last_error + 1e-16) < config.epsabs {
                break;
            }
            last_error = cost;
        }

        let gradient_norm = gradient.norm();
        if cancelled {
            log::debug!("relax_nl: cancelled after {} iterations", iterations);
        } else {
            self.write_back(x.as_slice());
            log::debug!(
                "relax_nl: {} links, {} params, cost {:.6e} -> {:.6e} in {} iterations ({} restarts)",
                problem.rows(),
                dim,
                initial_cost,
                cost,
                iterations,
                restarts
            );
        }

        CgReport {
            error: cost,
            iterations,
            gradient_norm,
            step_size,
            restarts,
            stalled,
            cancelled,
        }
    }
}
