//! telemetry/mod.rs
//! Transfer counters and immutable snapshots.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
