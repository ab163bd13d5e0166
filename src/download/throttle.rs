//! Fixed pacing between vendor requests.
//!
//! The vendor tolerates one request every few seconds, so every chapter
//! fetch (and every discovery probe) sleeps for a fixed delay. The sleep is
//! raced against a [`CancellationToken`] so Ctrl-C does not have to wait it
//! out.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use chapter_sync_core::download::Throttle;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let throttle = Throttle::new(Duration::from_millis(10));
//! let cancel = CancellationToken::new();
//! assert!(throttle.wait(&cancel).await);
//! # }
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Fixed delay applied before an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    /// Creates a throttle that sleeps `delay` on every [`wait`](Self::wait).
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A throttle that never sleeps (tests).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// Returns true if this throttle never sleeps.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.delay.is_zero()
    }

    /// Sleeps for the delay.
    ///
    /// Returns `false` if `cancel` fired before or during the sleep.
    #[instrument(skip(self, cancel), fields(delay_ms = self.delay.as_millis()))]
    pub async fn wait(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        if self.is_disabled() {
            return true;
        }
        debug!("pacing before request");
        tokio::select! {
            () = cancel.cancelled() => false,
            () = tokio::time::sleep(self.delay) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wait_sleeps_full_delay() {
        tokio::time::pause();
        let throttle = Throttle::new(Duration::from_secs(5));
        let cancel = CancellationToken::new();
        let start = tokio::time::Instant::now();

        assert!(throttle.wait(&cancel).await);
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_wait_returns_false_when_cancelled_mid_sleep() {
        tokio::time::pause();
        let throttle = Throttle::new(Duration::from_secs(60));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let start = tokio::time::Instant::now();
        assert!(!throttle.wait(&cancel).await);
        assert!(start.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_wait_short_circuits_when_already_cancelled() {
        let throttle = Throttle::disabled();
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(!throttle.wait(&cancel).await);
    }

    #[test]
    fn test_disabled_has_zero_delay() {
        assert!(Throttle::disabled().is_disabled());
        assert!(!Throttle::new(Duration::from_millis(1)).is_disabled());
    }
}
