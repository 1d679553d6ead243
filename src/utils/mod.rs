//! Utility functions for vsrc

pub mod cache;

pub use cache::*;
