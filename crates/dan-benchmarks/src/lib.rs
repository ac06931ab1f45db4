//! Shared setup for the DanWorld benchmarks

pub mod common;

pub use common::*;
