use crate::prelude::*;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// The cooperative stop flag shared between the allocation loop and the
/// signal handler.
pub struct RunState {
    running: Mutex<bool>,
    waiter: Condvar,
}

impl RunState {
    pub fn new() -> Self {
        RunState {
            running: Mutex::new(true),
            waiter: Condvar::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock().unwrap()
    }

    /// Clears the flag and wakes up anyone sleeping in [`RunState::pause`].
    pub fn stop(&self) {
        *self.running.lock().unwrap() = false;
        self.waiter.notify_all();
    }

    /// Sleeps for `duration`, returning early as soon as the flag is cleared.
    /// Returns whether we're still running afterwards.
    pub fn pause(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut running = self.running.lock().unwrap();
        while *running {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            // Spurious wakeups just loop around and wait for what's left.
            running = self.waiter.wait_timeout(running, deadline - now).unwrap().0;
        }
        *running
    }
}

/// Routes SIGINT and SIGTERM to [`RunState::stop`].
///
/// Both signals are blocked on the calling thread and picked up with
/// `sigwait` on a dedicated thread, so no code ever runs in signal context.
/// Threads spawned later inherit the mask, so this has to be called before
/// any other thread is started. Every other signal keeps its default action.
#[cfg(unix)]
pub fn install_handlers(state: Arc<RunState>) -> Fallible<()> {
    use nix::sys::signal::{SigSet, Signal};

    let mut signals = SigSet::empty();
    signals.add(Signal::SIGINT);
    signals.add(Signal::SIGTERM);
    signals
        .thread_block()
        .context("failed to block the shutdown signals")?;

    std::thread::Builder::new()
        .name("signals".into())
        .spawn(move || loop {
            match signals.wait() {
                Ok(signal) => {
                    eprintln!("\nReceived {}. Shutting down gracefully...", signal.as_str());
                    state.stop();
                }
                Err(err) => debug!("waiting for signals failed: {}", err),
            }
        })
        .context("failed to spawn the signal thread")?;
    Ok(())
}

/// Routes Ctrl+C to [`RunState::stop`].
#[cfg(not(unix))]
pub fn install_handlers(state: Arc<RunState>) -> Fallible<()> {
    ctrlc::set_handler(move || {
        eprintln!("\nReceived Ctrl+C. Shutting down gracefully...");
        state.stop();
    })
    .context("failed to install the Ctrl+C handler")?;
    Ok(())
}
