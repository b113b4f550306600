//! Idle-progress watchdog for streaming transfers.
//!
//! The reader stamps a shared clock after every chunk; a separate task samples
//! the clock on a fixed tick and fires a one-shot signal once the idle time
//! exceeds the limit. The reader is the only writer and the watchdog the only
//! reader of the timestamp.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Monotonic "last progress" timestamp.
#[derive(Debug)]
pub struct ProgressClock {
    origin: Instant,
    last_progress_ms: AtomicU64,
}

impl ProgressClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last_progress_ms: AtomicU64::new(0),
        }
    }

    /// Record progress now.
    pub fn touch(&self) {
        self.last_progress_ms
            .store(self.elapsed_ms(), Ordering::Release);
    }

    /// Time since the last recorded progress (or since creation).
    pub fn idle(&self) -> Duration {
        let last = self.last_progress_ms.load(Ordering::Acquire);
        Duration::from_millis(self.elapsed_ms().saturating_sub(last))
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for ProgressClock {
    fn default() -> Self {
        Self::new()
    }
}

/// A running watchdog. Dropping it stops the sampling task.
#[derive(Debug)]
pub struct Watchdog {
    task: JoinHandle<()>,
    signal: oneshot::Receiver<Duration>,
}

impl Watchdog {
    /// Start sampling `clock` every `tick`, firing once idle exceeds `idle_timeout`.
    pub fn spawn(clock: Arc<ProgressClock>, idle_timeout: Duration, tick: Duration) -> Self {
        let (tx, signal) = oneshot::channel();

        let task = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(tick);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;
                let idle = clock.idle();
                if idle > idle_timeout {
                    tracing::warn!(
                        "No progress for {:?} (limit {:?}), cancelling transfer",
                        idle,
                        idle_timeout
                    );
                    let _ = tx.send(idle);
                    return;
                }
            }
        });

        Self { task, signal }
    }

    /// Resolves once the watchdog has fired; pending forever otherwise.
    pub async fn stalled(&mut self) -> Duration {
        match (&mut self.signal).await {
            Ok(idle) => idle,
            Err(_) => std::future::pending().await,
        }
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fires_when_no_progress() {
        let clock = Arc::new(ProgressClock::new());
        let mut watchdog = Watchdog::spawn(
            Arc::clone(&clock),
            Duration::from_millis(100),
            Duration::from_millis(10),
        );

        let idle = tokio::time::timeout(Duration::from_secs(2), watchdog.stalled())
            .await
            .expect("watchdog should fire");
        assert!(idle > Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_progress_keeps_it_quiet() {
        let clock = Arc::new(ProgressClock::new());
        let mut watchdog = Watchdog::spawn(
            Arc::clone(&clock),
            Duration::from_millis(200),
            Duration::from_millis(10),
        );

        let feeder = {
            let clock = Arc::clone(&clock);
            async move {
                for _ in 0..20 {
                    clock.touch();
                    tokio::time::sleep(Duration::from_millis(25)).await;
                }
            }
        };

        tokio::select! {
            _ = watchdog.stalled() => panic!("watchdog fired while progress was made"),
            _ = feeder => {}
        }
    }

    #[test]
    fn test_touch_resets_idle() {
        let clock = ProgressClock::new();
        std::thread::sleep(Duration::from_millis(20));
        assert!(clock.idle() >= Duration::from_millis(20));
        clock.touch();
        assert!(clock.idle() < Duration::from_millis(20));
    }
}
