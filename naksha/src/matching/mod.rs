//! Correspondence generation between scan groups.

mod pair;
mod scan_match;

pub use pair::{CorrespondencePair, PairGeometry, PairKind, PairResidual};
pub use scan_match::{MatchConfig, ScanMatch};
