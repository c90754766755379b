//! Corridor Relaxation Demo
//!
//! Simulates a robot driving down a closed corridor with drifting odometry,
//! builds one scan group per pose, and alternates correspondence search with
//! pose-graph relaxation to pull the drifted trajectory back onto the truth.
//!
//! Usage:
//!   cargo run --example relax_corridor
//!   cargo run --example relax_corridor -- --drift 0.03 --solver nl
//!   RUST_LOG=debug cargo run --example relax_corridor -- -c configs/naksha.yaml

use clap::{Parser, ValueEnum};
use std::path::Path;

use naksha::core::{Point2D, Pose2D, pose_decompose};
use naksha::matching::{PairGeometry, ScanMatch};
use naksha::relax::{NodeId, RelaxGraph};
use naksha::scan::Scan;
use naksha::solid::ScanGroup;
use naksha::NakshaConfig;

/// Outlier distance for odometry links; large enough never to saturate.
const ODOMETRY_OUTLIER: f64 = 1e6;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Solver {
    /// Levenberg–Marquardt
    Ls,
    /// Conjugate gradient
    Nl,
}

/// Corridor mapping with match/relax rounds
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "configs/naksha.yaml")]
    config: String,

    /// Number of poses along the corridor
    #[arg(short, long, default_value_t = 9)]
    poses: usize,

    /// Distance between poses (meters)
    #[arg(long, default_value_t = 1.0)]
    spacing: f64,

    /// Heading drift added by odometry per step (radians)
    #[arg(long, default_value_t = 0.02)]
    drift: f64,

    /// Odometry distance scale error
    #[arg(long, default_value_t = 0.03)]
    scale_error: f64,

    /// Weight of odometry links
    #[arg(long, default_value_t = 0.1)]
    odometry_weight: f64,

    /// Match/relax rounds
    #[arg(short, long, default_value_t = 5)]
    rounds: usize,

    /// Solver to use
    #[arg(short, long, value_enum, default_value_t = Solver::Ls)]
    solver: Solver,
}

/// Closed corridor `[0, length] × [0, width]`.
struct Corridor {
    length: f64,
    width: f64,
}

impl Corridor {
    fn range(&self, pose: Pose2D, bearing: f64) -> f64 {
        let (sin, cos) = (pose.theta + bearing).sin_cos();
        let mut range = f64::INFINITY;
        if cos > 1e-12 {
            range = range.min((self.length - pose.x) / cos);
        } else if cos < -1e-12 {
            range = range.min(-pose.x / cos);
        }
        if sin > 1e-12 {
            range = range.min((self.width - pose.y) / sin);
        } else if sin < -1e-12 {
            range = range.min(-pose.y / sin);
        }
        range
    }

    fn scan(&self, pose: Pose2D, num_points: usize) -> Vec<(f64, f64)> {
        (0..num_points)
            .map(|i| {
                let bearing =
                    -std::f64::consts::PI + std::f64::consts::TAU * i as f64 / num_points as f64;
                (self.range(pose, bearing), bearing)
            })
            .collect()
    }
}

fn point_pair(a: Point2D, b: Point2D) -> PairGeometry {
    PairGeometry::PointPoint { a, b }
}

fn mean_error(estimate: &[Pose2D], truth: &[Pose2D]) -> f64 {
    let total: f64 = estimate
        .iter()
        .zip(truth)
        .map(|(e, t)| e.position().distance(t.position()))
        .sum();
    total / truth.len() as f64
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config_path = Path::new(&args.config);
    let config = if config_path.exists() {
        NakshaConfig::load(config_path)?
    } else {
        println!("Config not found at {}, using defaults", config_path.display());
        NakshaConfig::default()
    };

    let corridor = Corridor {
        length: 2.0 + args.spacing * args.poses as f64,
        width: 2.5,
    };
    let truth: Vec<Pose2D> = (0..args.poses)
        .map(|i| Pose2D::new(1.0 + i as f64 * args.spacing, 1.25, 0.0))
        .collect();

    // Odometry: each step over-reports distance and turns slightly.
    let step = Pose2D::new(args.spacing * (1.0 + args.scale_error), 0.0, args.drift);
    let mut estimate = vec![truth[0]];
    for i in 1..args.poses {
        let prev = estimate[i - 1];
        estimate.push(prev.compose(step));
    }
    let odometry: Vec<Pose2D> = estimate
        .windows(2)
        .map(|w| pose_decompose(w[1], w[0]))
        .collect();

    let mut groups = Vec::with_capacity(args.poses);
    for &pose in &truth {
        let mut scan = Scan::new(config.scan.clone());
        scan.add_ranges(Pose2D::identity(), &corridor.scan(pose, 360))?;
        let mut group = ScanGroup::new(config.group.clone());
        group.add(Pose2D::identity(), &scan);
        groups.push(group);
    }

    println!(
        "{} poses, corridor {:.1} x {:.1} m, initial mean error {:.3} m",
        args.poses,
        corridor.length,
        corridor.width,
        mean_error(&estimate, &truth)
    );

    for round in 1..=args.rounds {
        let mut graph = RelaxGraph::new();
        let nodes: Vec<NodeId> = estimate
            .iter()
            .enumerate()
            .map(|(i, &pose)| graph.add_node(pose, i > 0))
            .collect();

        for (i, delta) in odometry.iter().enumerate() {
            let heading = delta.transform_point(Point2D::new(1.0, 0.0));
            for (a, b) in [(delta.position(), Point2D::ZERO), (heading, Point2D::new(1.0, 0.0))] {
                graph.add_link(
                    nodes[i],
                    nodes[i + 1],
                    point_pair(a, b),
                    args.odometry_weight,
                    ODOMETRY_OUTLIER,
                )?;
            }
        }

        let mut pair_count = 0;
        for i in 0..args.poses {
            for j in (i + 1)..(i + 3).min(args.poses) {
                let pairs = ScanMatch::new(&groups[i], &groups[j], config.matching.clone())
                    .pairs(estimate[i], estimate[j]);
                pair_count += pairs.len();
                graph.add_pair_links(nodes[i], nodes[j], &pairs, config.matching.outlier_distance)?;
            }
        }

        let (error, iterations) = match args.solver {
            Solver::Ls => {
                let report = graph.relax_ls(&config.relax.ls);
                (report.error, report.iterations)
            }
            Solver::Nl => {
                let report = graph.relax_nl(&config.relax.nl);
                (report.error, report.iterations)
            }
        };

        for (pose, &id) in estimate.iter_mut().zip(&nodes) {
            if let Some(node) = graph.node(id) {
                *pose = node.pose;
            }
        }

        println!(
            "round {}: {} pairs, {} links, cost {:.4e} after {} iterations, mean error {:.3} m",
            round,
            pair_count,
            graph.link_count(),
            error,
            iterations,
            mean_error(&estimate, &truth)
        );
    }

    for (i, (e, t)) in estimate.iter().zip(&truth).enumerate() {
        println!(
            "  pose {:2}: estimate ({:6.3}, {:6.3}, {:6.3})  truth ({:6.3}, {:6.3}, {:6.3})",
            i, e.x, e.y, e.theta, t.x, t.y, t.theta
        );
    }

    Ok(())
}
