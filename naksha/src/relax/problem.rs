//! Flat parameter view of a graph, shared by both solvers.

use nalgebra::{DMatrix, DVector};

use crate::core::Pose2D;

use super::cost::{CostForm, evaluate_link};
use super::graph::{RelaxGraph, RelaxLink};

/// Where a link endpoint's pose comes from during a solve.
#[derive(Clone, Copy, Debug)]
enum Endpoint {
    /// Parameters `offset .. offset + 3`.
    Free(usize),
    /// Held constant.
    Fixed(Pose2D),
}

#[derive(Clone, Debug)]
struct Term {
    link: RelaxLink,
    a: Endpoint,
    b: Endpoint,
}

/// Snapshot of the free poses and of every link touching one.
///
/// Links between two fixed nodes carry no gradient and are left out.
#[derive(Clone, Debug)]
pub(crate) struct Problem {
    terms: Vec<Term>,
    initial: DVector<f64>,
}

impl Problem {
    /// Number the free nodes and snapshot the graph.
    pub(crate) fn build(graph: &mut RelaxGraph) -> Self {
        let free = graph.assign_indices();
        let graph: &RelaxGraph = graph;
        let mut initial = DVector::zeros(3 * free);
        for (_, node) in graph.nodes() {
            if let Some(i) = node.index() {
                initial[3 * i] = node.pose.x;
                initial[3 * i + 1] = node.pose.y;
                initial[3 * i + 2] = node.pose.theta;
            }
        }

        let endpoint = |graph: &RelaxGraph, id| {
            graph.node(id).map(|n| match n.index() {
                Some(i) => Endpoint::Free(3 * i),
                None => Endpoint::Fixed(n.pose),
            })
        };

        let terms = graph
            .links()
            .filter_map(|(_, link)| {
                let a = endpoint(graph, link.node_a)?;
                let b = endpoint(graph, link.node_b)?;
                match (a, b) {
                    (Endpoint::Fixed(_), Endpoint::Fixed(_)) => None,
                    _ => Some(Term {
                        link: link.clone(),
                        a,
                        b,
                    }),
                }
            })
            .collect();

        Self { terms, initial }
    }

    /// Starting parameter vector.
    pub(crate) fn initial(&self) -> &DVector<f64> {
        &self.initial
    }

    /// Number of parameters.
    pub(crate) fn dim(&self) -> usize {
        self.initial.len()
    }

    /// Number of residual rows.
    pub(crate) fn rows(&self) -> usize {
        self.terms.len()
    }

    fn pose(x: &DVector<f64>, endpoint: Endpoint) -> Pose2D {
        match endpoint {
            Endpoint::Free(o) => Pose2D::new(x[o], x[o + 1], x[o + 2]),
            Endpoint::Fixed(pose) => pose,
        }
    }

    /// Per-link linear residuals `u = w·s`.
    pub(crate) fn residuals(&self, x: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(
            self.terms.len(),
            self.terms.iter().map(|t| {
                evaluate_link(&t.link, Self::pose(x, t.a), Self::pose(x, t.b), CostForm::Linear).cost
            }),
        )
    }

    /// Linear residuals and their Jacobian.
    pub(crate) fn residuals_and_jacobian(&self, x: &DVector<f64>) -> (DVector<f64>, DMatrix<f64>) {
        let mut r = DVector::zeros(self.terms.len());
        let mut j = DMatrix::zeros(self.terms.len(), self.dim());
        for (row, t) in self.terms.iter().enumerate() {
            let eval = evaluate_link(&t.link, Self::pose(x, t.a), Self::pose(x, t.b), CostForm::Linear);
            r[row] = eval.cost;
            for (endpoint, grad) in [(t.a, eval.grad_a), (t.b, eval.grad_b)] {
                if let Endpoint::Free(o) = endpoint {
                    for k in 0..3 {
                        j[(row, o + k)] += grad[k];
                    }
                }
            }
        }
        (r, j)
    }

    /// Total squared-form cost.
    pub(crate) fn cost(&self, x: &DVector<f64>) -> f64 {
        self.terms
            .iter()
            .map(|t| {
                evaluate_link(&t.link, Self::pose(x, t.a), Self::pose(x, t.b), CostForm::Squared).cost
            })
            .sum()
    }

    /// Total squared-form cost and its gradient.
    pub(crate) fn cost_and_gradient(&self, x: &DVector<f64>) -> (f64, DVector<f64>) {
        let mut cost = 0.0;
        let mut g = DVector::zeros(self.dim());
        for t in &self.terms {
            let eval = evaluate_link(&t.link, Self::pose(x, t.a), Self::pose(x, t.b), CostForm::Squared);
            cost += eval.cost;
            for (endpoint, grad) in [(t.a, eval.grad_a), (t.b, eval.grad_b)] {
                if let Endpoint::Free(o) = endpoint {
                    for k in 0..3 {
                        g[o + k] += grad[k];
                    }
                }
            }
        }
        (cost, g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point2D;
    use crate::matching::PairGeometry;
    use approx::assert_relative_eq;

    fn origin_pair() -> PairGeometry {
        PairGeometry::PointPoint {
            a: Point2D::ZERO,
            b: Point2D::ZERO,
        }
    }

    #[test]
    fn test_fixed_fixed_links_dropped() {
        let mut graph = RelaxGraph::new();
        let a = graph.add_node(Pose2D::identity(), false);
        let b = graph.add_node(Pose2D::new(1.0, 0.0, 0.0), false);
        let c = graph.add_node(Pose2D::new(2.0, 0.0, 0.0), true);
        graph.add_link(a, b, origin_pair(), 1.0, 10.0).expect("nodes exist");
        graph.add_link(b, c, origin_pair(), 1.0, 10.0).expect("nodes exist");

        let problem = Problem::build(&mut graph);
        assert_eq!(problem.rows(), 1);
        assert_eq!(problem.dim(), 3);
        assert_relative_eq!(problem.initial()[0], 2.0);
    }

    #[test]
    fn test_self_link_accumulates_both_sides() {
        let mut graph = RelaxGraph::new();
        let a = graph.add_node(Pose2D::new(0.0, 0.0, 0.3), true);
        let pair = PairGeometry::PointPoint {
            a: Point2D::new(1.0, 0.0),
            b: Point2D::new(0.0, 1.0),
        };
        graph.add_link(a, a, pair, 1.0, 10.0).expect("node exists");
        let problem = Problem::build(&mut graph);
        let (_, j) = problem.residuals_and_jacobian(problem.initial());
        // Translating both points together leaves the distance unchanged.
        assert_relative_eq!(j[(0, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(j[(0, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_matches_jacobian_of_squared_cost() {
        let mut graph = RelaxGraph::new();
        let a = graph.add_node(Pose2D::identity(), false);
        let b = graph.add_node(Pose2D::new(0.5, 0.2, 0.1), true);
        let pair = PairGeometry::PointPoint {
            a: Point2D::new(1.0, 0.0),
            b: Point2D::new(0.0, 0.0),
        };
        graph.add_link(a, b, pair, 2.0, 10.0).expect("nodes exist");
        let problem = Problem::build(&mut graph);
        let x = problem.initial().clone();

        // For u = w·s, ½·w·s² has gradient s·∂(w·s)/∂x.
        let (r, j) = problem.residuals_and_jacobian(&x);
        let (_, g) = problem.cost_and_gradient(&x);
        let s = r[0] / 2.0;
        for k in 0..3 {
            assert_relative_eq!(g[k], s * j[(0, k)], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cost_matches_graph_total() {
        let mut graph = RelaxGraph::new();
        let a = graph.add_node(Pose2D::identity(), false);
        let b = graph.add_node(Pose2D::new(0.5, 0.2, 0.1), true);
        let c = graph.add_node(Pose2D::new(3.0, 0.0, 0.0), false);
        let pair = PairGeometry::PointPoint {
            a: Point2D::new(1.0, 0.0),
            b: Point2D::new(0.0, 0.0),
        };
        graph.add_link(a, b, pair, 2.0, 10.0).expect("nodes exist");
        graph.add_link(b, c, pair, 0.5, 10.0).expect("nodes exist");
        let problem = Problem::build(&mut graph);
        let x = problem.initial().clone();

        let (with_gradient, _) = problem.cost_and_gradient(&x);
        assert_relative_eq!(problem.cost(&x), with_gradient, epsilon = 1e-12);
        assert_relative_eq!(
            problem.cost(&x),
            graph.total_cost(CostForm::Squared),
            epsilon = 1e-12
        );
    }
}
