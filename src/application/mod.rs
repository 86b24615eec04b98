//! Application services - request orchestration and snapshot handling

pub mod router;
pub mod snapshot;

pub use router::{Router, RoutingQuote, RoutingRequest};
pub use snapshot::{GraphCache, PoolSnapshot, PoolSnapshotProvider};
