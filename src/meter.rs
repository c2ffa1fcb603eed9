//! Frame throughput measurement

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Width of the throughput measurement window.
pub const THROUGHPUT_WINDOW: Duration = Duration::from_secs(1);

/// Counts accepted frames per fixed wall-clock window.
///
/// [`record`](ThroughputMeter::record) is called once per accepted frame;
/// [`next_window`](ThroughputMeter::next_window) completes when the current
/// window closes and yields the count accumulated in it, resetting the
/// counter for the next window. Windows are anchored at meter creation and
/// tick independently of message arrival, so a silent window yields 0.
pub struct ThroughputMeter {
    window: Interval,
    count: u64,
}

impl ThroughputMeter {
    /// Create a meter whose first window ends one `window` duration from now.
    pub fn new(window: Duration) -> Self {
        let mut ticker = interval_at(Instant::now() + window, window);
        // A stalled task must not replay missed windows as a burst
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { window: ticker, count: 0 }
    }

    /// Count one accepted frame in the current window.
    pub fn record(&mut self) {
        self.count += 1;
    }

    /// Wait for the current window to close and take its sample.
    ///
    /// Cancel-safe: the counter is only taken after the tick completes, so
    /// dropping this future inside a `select!` loses no counts.
    pub async fn next_window(&mut self) -> u64 {
        self.window.tick().await;
        std::mem::take(&mut self.count)
    }
}

impl Default for ThroughputMeter {
    fn default() -> Self {
        Self::new(THROUGHPUT_WINDOW)
    }
}
