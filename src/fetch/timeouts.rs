//! Adaptive timeouts for the archive transfer.

use std::time::Duration;

use crate::config::ArchiveConfig;

/// Limits governing one archive fetch.
#[derive(Debug, Clone)]
pub struct ArchivePolicy {
    /// Total streaming attempts, including the first.
    pub max_attempts: u32,
    /// Assumed minimum throughput for the response timeout, in bytes/s.
    pub min_throughput: u64,
    pub response_buffer: Duration,
    pub response_floor: Duration,
    /// Assumed minimum sustained throughput for the idle timeout, in bytes/s.
    pub idle_throughput: u64,
    pub idle_buffer: Duration,
    pub idle_floor: Duration,
    /// Used when the archive size could not be probed.
    pub unknown_size_response: Duration,
    pub unknown_size_idle: Duration,
    /// How often the watchdog samples idle time.
    pub watchdog_tick: Duration,
}

impl Default for ArchivePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_throughput: 32 * 1024,
            response_buffer: Duration::from_secs(10),
            response_floor: Duration::from_secs(30),
            idle_throughput: 8 * 1024,
            idle_buffer: Duration::from_secs(60),
            idle_floor: Duration::from_secs(60),
            unknown_size_response: Duration::from_secs(90),
            unknown_size_idle: Duration::from_secs(120),
            watchdog_tick: Duration::from_secs(1),
        }
    }
}

/// Timeouts derived for a specific archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveTimeouts {
    /// Deadline for the response headers to arrive.
    pub response: Duration,
    /// Longest allowed gap without a single byte read.
    pub idle: Duration,
}

impl ArchivePolicy {
    pub fn from_config(config: &ArchiveConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            unknown_size_response: Duration::from_secs(config.unknown_size_timeout_secs),
            unknown_size_idle: Duration::from_secs(config.unknown_size_idle_secs),
            ..Default::default()
        }
    }

    /// Derive timeouts from the probed size; `None` or zero means unknown.
    pub fn derive(&self, size: Option<u64>) -> ArchiveTimeouts {
        match size.filter(|&len| len > 0) {
            Some(len) => ArchiveTimeouts {
                response: scaled(len, self.min_throughput, self.response_buffer)
                    .max(self.response_floor),
                idle: scaled(len, self.idle_throughput, self.idle_buffer).max(self.idle_floor),
            },
            None => ArchiveTimeouts {
                response: self.unknown_size_response,
                idle: self.unknown_size_idle,
            },
        }
    }

    #[cfg(test)]
    pub fn fast_for_tests() -> Self {
        Self {
            max_attempts: 3,
            min_throughput: 32 * 1024,
            response_buffer: Duration::ZERO,
            response_floor: Duration::from_secs(2),
            idle_throughput: 8 * 1024,
            idle_buffer: Duration::ZERO,
            idle_floor: Duration::from_millis(300),
            unknown_size_response: Duration::from_secs(2),
            unknown_size_idle: Duration::from_millis(300),
            watchdog_tick: Duration::from_millis(25),
        }
    }
}

/// Whole seconds needed at `rate` bytes/s, plus `buffer`.
fn scaled(len: u64, rate: u64, buffer: Duration) -> Duration {
    Duration::from_secs(len / rate.max(1)) + buffer
}
