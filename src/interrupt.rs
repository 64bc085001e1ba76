//! Cancellation for the capture loop.
//!
//! An [`Interrupt`] is a shared flag plus a wake-up for whoever is pausing.
//! With [`Interrupt::ctrl_c`] the flag is raised by the user's Ctrl+C, which
//! tokio delivers on a single-threaded runtime that only runs while the loop
//! is pausing. Signals arriving while a capture is in progress are queued by
//! tokio and observed at the next pause.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::Notify;

/// How a pause ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// The full duration passed
    Elapsed,
    /// The interrupt was raised first
    Interrupted,
}

/// Where interrupts come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    CtrlC,
    Manual,
}

/// Raises an [`Interrupt`] from anywhere, including other threads
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    raised: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl InterruptHandle {
    /// Raise the interrupt and wake a pending pause
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }
}

/// Cancellation flag with an interruptible sleep
pub struct Interrupt {
    handle: InterruptHandle,
    runtime: Runtime,
    source: Source,
}

impl Interrupt {
    /// Interrupt raised by Ctrl+C once [`Interrupt::arm`] is called
    pub fn ctrl_c() -> std::io::Result<Self> {
        Self::with_source(Source::CtrlC)
    }

    /// Interrupt raised only through [`Interrupt::handle`]
    pub fn manual() -> std::io::Result<Self> {
        Self::with_source(Source::Manual)
    }

    fn with_source(source: Source) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            handle: InterruptHandle {
                raised: Arc::new(AtomicBool::new(false)),
                wake: Arc::new(Notify::new()),
            },
            runtime,
            source,
        })
    }

    /// Handle that raises this interrupt
    pub fn handle(&self) -> InterruptHandle {
        self.handle.clone()
    }

    /// Start listening for Ctrl+C.
    ///
    /// Until this is called Ctrl+C keeps its default behavior, so the
    /// confirmation prompt can still be abandoned the usual way.
    pub fn arm(&self) {
        if self.source != Source::CtrlC {
            return;
        }
        let handle = self.handle();
        self.runtime.spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => handle.raise(),
                Err(e) => tracing::warn!(error = %e, "unable to listen for Ctrl+C"),
            }
        });
        // Let the listener register its handler before any capture starts.
        self.runtime.block_on(tokio::task::yield_now());
    }

    /// Whether the interrupt has been raised
    pub fn is_raised(&self) -> bool {
        self.handle.raised.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless the interrupt is raised first
    pub fn pause(&self, duration: Duration) -> Pause {
        if self.is_raised() {
            return Pause::Interrupted;
        }
        let wake = Arc::clone(&self.handle.wake);
        let raised = Arc::clone(&self.handle.raised);
        self.runtime.block_on(async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => {
                    if raised.load(Ordering::SeqCst) { Pause::Interrupted } else { Pause::Elapsed }
                }
                _ = wake.notified() => Pause::Interrupted,
            }
        })
    }
}

impl std::fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interrupt")
            .field("source", &self.source)
            .field("raised", &self.is_raised())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_pause_elapses() {
        let interrupt = Interrupt::manual().unwrap();
        let started = Instant::now();
        assert_eq!(interrupt.pause(Duration::from_millis(50)), Pause::Elapsed);
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(!interrupt.is_raised());
    }

    #[test]
    fn test_raised_before_pause() {
        let interrupt = Interrupt::manual().unwrap();
        interrupt.handle().raise();
        assert!(interrupt.is_raised());
        assert_eq!(interrupt.pause(Duration::from_secs(60)), Pause::Interrupted);
    }

    #[test]
    fn test_raise_cuts_pause_short() {
        let interrupt = Interrupt::manual().unwrap();
        let handle = interrupt.handle();
        let raiser = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            handle.raise();
        });

        let started = Instant::now();
        assert_eq!(interrupt.pause(Duration::from_secs(60)), Pause::Interrupted);
        assert!(started.elapsed() < Duration::from_secs(30));
        raiser.join().unwrap();
    }

    #[test]
    fn test_arm_is_noop_for_manual() {
        let interrupt = Interrupt::manual().unwrap();
        interrupt.arm();
        assert!(!interrupt.is_raised());
    }
}
