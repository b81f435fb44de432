use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

/// Shared stop flag. Sleeps taken through it wake up as soon as it is raised.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        let (flag, wakeup) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        wakeup.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks for `duration` unless stopped first.
    /// Returns `true` when the whole duration elapsed.
    pub fn sleep(&self, duration: Duration) -> bool {
        let (flag, wakeup) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = wakeup
            .wait_timeout_while(guard, duration, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        !*guard
    }

    /// Raises the signal on Ctrl-C. Can only be installed once per process.
    pub fn install_ctrlc(&self) -> Result<()> {
        let signal = self.clone();
        ctrlc::set_handler(move || {
            info!("interrupted, stopping");
            signal.stop();
        })
        .context("failed to install Ctrl-C handler")
    }
}
