//! Utility modules

pub mod seed;
