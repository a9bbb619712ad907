//! Ctrl-C handling for attached sessions
//!
//! Once tokio installs its SIGINT handler the default "terminate" behaviour
//! is gone for the rest of the process. A single listener owns SIGINT: while
//! a log/stats stream or shell is attached the interrupt is forwarded to that
//! stream, otherwise the process exits. The routing decision is taken under
//! the same lock that the guard clears on drop.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

static ATTACHED: Mutex<Option<Arc<Notify>>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Arc<Notify>>> {
    ATTACHED.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Where an interrupt was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptRoute {
    /// An attached stream received it
    Forwarded,
    /// Nothing was attached; the process should exit
    Exit,
}

/// Marks the process as attached to a stream until dropped
pub struct AttachGuard {
    notify: Arc<Notify>,
}

impl AttachGuard {
    pub fn new() -> Self {
        let notify = Arc::new(Notify::new());
        *slot() = Some(Arc::clone(&notify));
        Self { notify }
    }

    /// Resolves once an interrupt has been routed to this stream
    pub async fn interrupted(&self) {
        self.notify.notified().await
    }
}

impl Default for AttachGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AttachGuard {
    fn drop(&mut self) {
        let mut current = slot();
        if current
            .as_ref()
            .is_some_and(|n| Arc::ptr_eq(n, &self.notify))
        {
            *current = None;
        }
    }
}

/// Whether a stream or shell currently owns the terminal
pub fn is_attached() -> bool {
    slot().is_some()
}

/// Deliver one interrupt to the attached stream, if any
pub fn route_interrupt() -> InterruptRoute {
    match slot().as_ref() {
        Some(notify) => {
            // notify_one stores a permit, so a stream between polls still sees it
            notify.notify_one();
            InterruptRoute::Forwarded
        }
        None => InterruptRoute::Exit,
    }
}

/// Spawn the process-wide Ctrl-C listener.
///
/// Must be called from within a tokio runtime.
pub fn install_exit_on_interrupt(exit_code: i32) {
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                tracing::warn!("Unable to listen for Ctrl-C");
                return;
            }
            match route_interrupt() {
                InterruptRoute::Forwarded => {
                    tracing::debug!("Interrupt forwarded to attached stream");
                }
                InterruptRoute::Exit => {
                    tracing::debug!("Interrupted outside an attached stream, exiting");
                    std::process::exit(exit_code);
                }
            }
        }
    });
}
