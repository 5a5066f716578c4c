//! Core types and constants for trace analysis

pub mod types;
pub mod constants;
pub mod trace;

pub use types::*;
pub use constants::*;
pub use trace::Trace;
