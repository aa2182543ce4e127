//! Interrupt handling for configure runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::signal;

/// Wait for Ctrl-C or SIGTERM. The first one raises `cancel` so the run stops
/// before its next file write; the second exits immediately.
pub async fn watch(cancel: Arc<AtomicBool>) {
    next_signal().await;
    tracing::warn!("interrupt received, stopping before the next file write");
    cancel.store(true, Ordering::SeqCst);

    next_signal().await;
    tracing::warn!("second interrupt received, exiting");
    std::process::exit(1);
}

/// Never resolves if neither handler could be installed.
async fn next_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "could not install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::debug!("received SIGINT"),
        () = terminate => tracing::debug!("received SIGTERM"),
    }
}
