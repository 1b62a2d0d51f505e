//! Shutdown signalling for the HTTP server

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::constants::SHUTDOWN_TIMEOUT_SECS;

/// One-shot stop flag shared by the server loop and its signal handlers,
/// plus the grace period granted to in-flight requests once it flips
#[derive(Clone)]
pub struct ShutdownService {
    signal: Arc<watch::Sender<bool>>,
    grace: Duration,
}

impl Default for ShutdownService {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownService {
    pub fn new() -> Self {
        Self::with_grace(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS))
    }

    pub fn with_grace(grace: Duration) -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal: Arc::new(signal),
            grace,
        }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }

    pub fn trigger(&self) {
        self.signal.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.signal.borrow()
    }

    /// Resolves once `trigger` has been called. Owned, so it can go straight
    /// into `with_graceful_shutdown`.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            let _ = rx.wait_for(|stopped| *stopped).await;
        }
    }

    /// Resolves `grace` after the trigger
    pub fn deadline(&self) -> impl Future<Output = ()> + Send + 'static {
        let triggered = self.wait();
        let grace = self.grace;
        async move {
            triggered.await;
            tokio::time::sleep(grace).await;
        }
    }

    /// Spawn a task that triggers on Ctrl+C or SIGTERM
    pub fn install_signal_handlers(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            let source = tokio::select! {
                _ = ctrl_c() => "Ctrl+C",
                _ = terminate() => "SIGTERM",
            };
            tracing::info!(signal = source, "Shutdown requested");
            service.trigger();
        });
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
