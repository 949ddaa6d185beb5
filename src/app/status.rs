//! Status timer - cancellable auto-clear of the status message

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::StatusMessage;

/// Schedules one clear per status message generation.
///
/// A newer message aborts the pending timer, and the session only clears a
/// message whose generation matches, so two timers never race.
pub struct StatusTimer {
    ttl: Duration,
    expired_tx: mpsc::UnboundedSender<u64>,
    handle: Option<JoinHandle<()>>,
    scheduled: Option<u64>,
}

impl StatusTimer {
    pub fn new(ttl: Duration) -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        let timer = StatusTimer {
            ttl,
            expired_tx,
            handle: None,
            scheduled: None,
        };
        (timer, expired_rx)
    }

    /// Bring the timer in line with the current message
    pub fn sync(&mut self, message: Option<&StatusMessage>) {
        match message {
            Some(message) if self.scheduled == Some(message.generation) => {}
            Some(message) => {
                self.cancel();
                self.scheduled = Some(message.generation);
                if !message.sticky {
                    self.schedule(message.generation);
                }
            }
            None => {
                self.cancel();
                self.scheduled = None;
            }
        }
    }

    fn schedule(&mut self, generation: u64) {
        let ttl = self.ttl;
        let expired_tx = self.expired_tx.clone();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let _ = expired_tx.send(generation);
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for StatusTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
