// Signal handling module
//
// SIGTERM and SIGINT stop the accept loop. Other platforms only get Ctrl+C.

use crate::logger;

/// Resolves once a shutdown signal arrives
///
/// If the handlers cannot be installed this never resolves; the server then
/// runs until it is killed.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                logger::log_warning(&format!("Failed to register signal handlers: {e}"));
                return std::future::pending().await;
            }
        };

    tokio::select! {
        _ = sigterm.recv() => logger::log_shutdown("SIGTERM"),
        _ = sigint.recv() => logger::log_shutdown("SIGINT"),
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger::log_shutdown("Ctrl+C"),
        Err(e) => {
            logger::log_warning(&format!("Failed to register Ctrl+C handler: {e}"));
            std::future::pending::<()>().await;
        }
    }
}
