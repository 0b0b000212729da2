use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TransferCounters;

/// Immutable summary of one finished transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferSnapshot {
    pub bytes_transferred: u64,
    pub read_calls: u64,
    pub write_calls: u64,
    pub buffer_size: usize,
    pub elapsed: Duration,
}

impl TransferSnapshot {
    pub fn from(counters: &TransferCounters, buffer_size: usize, elapsed: Duration) -> Self {
        Self {
            bytes_transferred: counters.bytes_written,
            read_calls: counters.read_calls,
            write_calls: counters.write_calls,
            buffer_size,
            elapsed,
        }
    }
}
