//! Per-scan processing: range smoothing, free-space polygon, hit clustering.
//!
//! ```text
//! (range, bearing)[] + pose
//!         │ smoothing, pose_compose
//!         ▼
//!   raw samples ──► free polygon (fewest-hop path approximation)
//!         │
//!         └───────► hits (clustered, decayed inside free space)
//! ```

mod config;
mod error;
mod free_space;
mod hits;
mod range_scan;

pub use config::ScanConfig;
pub use error::ScanError;
pub use free_space::{FreeSpaceParams, approximate_free_space};
pub use hits::{Hit, merge_hit};
pub use range_scan::{RawSample, Scan};
