//! OS signal handling.
//!
//! # Responsibilities
//! - Register SIGINT/SIGTERM handlers once per process
//! - Translate the first signal into a triggered [`Shutdown`]
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The handler task is installed lazily, on first request
//! - A handler that cannot be registered is logged and never fires

use std::sync::OnceLock;

use crate::lifecycle::shutdown::Shutdown;

static INTERRUPT: OnceLock<Shutdown> = OnceLock::new();

/// The process-wide interrupt hook.
///
/// The first call spawns the signal listener and must happen inside a Tokio
/// runtime; later calls return clones of the same hook.
pub fn interrupt_on_signals() -> Shutdown {
    INTERRUPT
        .get_or_init(|| {
            let shutdown = Shutdown::new();
            let trigger = shutdown.clone();
            tokio::spawn(async move {
                termination_signal().await;
                tracing::info!("Shutdown signal received");
                trigger.trigger();
            });
            shutdown
        })
        .clone()
}

/// Wait for Ctrl+C or, on Unix, SIGTERM.
pub async fn termination_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Unable to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
