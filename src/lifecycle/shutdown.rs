//! Shutdown coordination for the server.

use tokio::sync::broadcast;

/// Broadcast handle that stops a running server.
///
/// Cloning shares the same channel; any clone can trigger.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscriber to stop. A no-op when nobody listens.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Resolve when triggered or on Ctrl+C, whichever comes first.
    pub async fn signalled(mut rx: broadcast::Receiver<()>) {
        tokio::select! {
            _ = rx.recv() => {
                tracing::info!("Shutdown triggered");
            }
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                    // Without a signal handler only an explicit trigger can stop us.
                    let _ = rx.recv().await;
                }
                tracing::info!("Shutdown signal received");
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
