use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Background periodic tick.
///
/// The callback runs on a dedicated thread once per interval until the ticker
/// is stopped, dropped, or the callback returns `false`. After `stop` returns
/// the callback is guaranteed not to run again.
pub struct Ticker {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if !on_tick() {
                        break;
                    }
                }
                // explicit stop or the owner went away
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        debug!(interval_ms = interval.as_millis() as u64, "ticker started");
        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stops the ticker and waits for its thread. Returns `false` if it was
    /// already stopped.
    pub fn stop(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        if let Some(tx) = self.stop_tx.take() {
            // the thread may already have exited on its own
            let _ = tx.send(());
        }
        let _ = handle.join();
        debug!("ticker stopped");
        true
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
