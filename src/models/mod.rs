//! Core data models for farm readiness reports.

mod collection;
mod farm;
mod order;
mod readiness;

pub use collection::*;
pub use farm::*;
pub use order::*;
pub use readiness::*;
