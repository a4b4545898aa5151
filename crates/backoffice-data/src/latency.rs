//! # Simulated Latency
//!
//! How long each mock call waits before answering. The defaults mirror a
//! slow-ish API: listing takes a second, single-record calls a few hundred
//! milliseconds.

use std::time::Duration;

/// Per-operation delay applied by the mock services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub get_all: Duration,
    pub get_by_id: Duration,
    pub create: Duration,
    pub delete: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Latency {
            get_all: Duration::from_millis(1000),
            get_by_id: Duration::from_millis(300),
            create: Duration::from_millis(500),
            delete: Duration::from_millis(300),
        }
    }
}

impl Latency {
    /// No delay at all. Calls resolve on their first poll.
    pub const fn none() -> Self {
        Latency::uniform(Duration::ZERO)
    }

    /// The same delay for every operation.
    pub const fn uniform(delay: Duration) -> Self {
        Latency {
            get_all: delay,
            get_by_id: delay,
            create: delay,
            delete: delay,
        }
    }
}

/// Waits out one simulated round trip.
pub(crate) async fn simulate(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
