//! distrand - Distributed random array generator
//!
//! Generates random numeric arrays and random segmented string arrays
//! partitioned over a fixed set of locales, the way a cluster-wide array
//! backend lays out its data.
//!
//! # Architecture
//!
//! - **Local fill engine** (`fill`): each locale fills its own partition,
//!   optionally remapping draws into a requested range
//! - **Distributed arrays** (`distributed`): block-partitioned arrays, locale
//!   execution and the collective scan
//! - **Segmented strings** (`strings`): offsets plus a terminated byte buffer,
//!   laid out with one collective step
//! - **Request boundary** (`request`): argument validation, symbol table and
//!   textual replies

pub mod config;
pub mod distributed;
pub mod error;
pub mod fill;
pub mod output;
pub mod request;
pub mod strings;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use distributed::{Cluster, DistArray};
pub use error::{GenError, GenResult};
pub use request::{Dtype, Request, SymbolTable};
pub use strings::{CharClass, SegmentedStrings};

/// Result type used by the binary and output layer
pub type Result<T> = anyhow::Result<T>;
