//! Power-word roulette: a short burst of random picks that settles on one word.
//!
//! The spin runs as its own task and only publishes words; it has no access to
//! tracker state.

use rand::seq::IndexedRandom;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Picks after the first one.
pub const DEFAULT_TICKS: u32 = 20;
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(100);

pub struct Spin {
    current: watch::Receiver<Option<String>>,
    handle: JoinHandle<Option<String>>,
}

impl Spin {
    /// The most recent pick, if any yet.
    pub fn current(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    /// Follow picks as they land.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.current.clone()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the spin to stop. `None` if it was cancelled or had no words.
    pub async fn finish(self) -> Option<String> {
        self.handle.await.ok().flatten()
    }
}

/// Start a spin over `words`: one pick immediately, then one every `period`
/// for `ticks` more. Must be called from within a tokio runtime.
pub fn spin(words: Vec<String>, ticks: u32, period: Duration) -> Spin {
    let (tx, rx) = watch::channel(None);

    let handle = tokio::spawn(async move {
        if words.is_empty() {
            return None;
        }
        let mut interval = tokio::time::interval(period);
        let mut last = None;
        for _ in 0..=ticks {
            interval.tick().await;
            let pick = {
                let mut rng = rand::rng();
                words.choose(&mut rng).cloned()
            };
            let _ = tx.send(pick.clone());
            last = pick;
        }
        last
    });

    Spin {
        current: rx,
        handle,
    }
}
