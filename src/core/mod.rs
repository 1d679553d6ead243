//! Core data types for vsrc

pub mod source;

pub use source::*;
