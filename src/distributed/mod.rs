//! Distributed arrays over a fixed set of locales
//!
//! # Architecture
//!
//! - **Domain**: block partition of a global index range, one contiguous
//!   subdomain per locale
//! - **Array**: a value buffer plus its domain; each locale gets a disjoint
//!   mutable chunk
//! - **Cluster**: runs one task per locale and owns the data-parallel pool
//! - **Collective**: the scan/sum step every locale must join
//!
//! # Modules
//!
//! - `domain`: block partitioning
//! - `array`: distributed arrays and per-locale views
//! - `cluster`: locale execution
//! - `collective`: coordinator protocol for exclusive scans

pub mod array;
pub mod cluster;
pub mod collective;
pub mod domain;

// Re-export key types
pub use array::{DistArray, LocalChunk, LocalView};
pub use cluster::Cluster;
pub use collective::{scan_group, ScanCoordinator, ScanEndpoint, ScanReply};
pub use domain::{BlockDomain, Subdomain};
