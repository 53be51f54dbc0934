//! Shutdown coordination for the gateway.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct ShutdownCoordinator {
    tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// A task's handle on the shutdown signal.
pub struct Shutdown {
    rx: broadcast::Receiver<()>,
}

impl Shutdown {
    /// Completes when shutdown is triggered. Also completes if the
    /// coordinator is dropped, so tasks never outlive the process.
    pub async fn recv(&mut self) {
        let _ = self.rx.recv().await;
    }
}

/// Waits for SIGTERM or Ctrl+C, then triggers shutdown.
pub async fn listen_for_signals(coordinator: &ShutdownCoordinator) {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                let _ = ctrl_c.await;
                coordinator.trigger();
                return;
            }
        };
        tokio::select! {
            _ = ctrl_c => tracing::info!("Ctrl+C received"),
            _ = term.recv() => tracing::info!("SIGTERM received"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        tracing::info!("Ctrl+C received");
    }

    coordinator.trigger();
}
