//! telemetry/counters.rs
//! Mutable counters collected while a transfer loop runs.
//!
//! Converted into an immutable TransferSnapshot when the transfer ends.
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCounters {
    pub read_calls: u64,
    pub write_calls: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

impl TransferCounters {
    /// Record one read call that returned `n` bytes (0 at EOF).
    pub fn add_read(&mut self, n: usize) {
        self.read_calls += 1;
        self.bytes_read += n as u64;
    }

    /// Record one write call that accepted `n` bytes.
    pub fn add_write(&mut self, n: usize) {
        self.write_calls += 1;
        self.bytes_written += n as u64;
    }
}
