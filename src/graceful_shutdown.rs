use std::io;

use tracing::warn;

/// Resolves with the name of the first shutdown signal received.
#[cfg(unix)]
pub async fn shutdown_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            warn!("🛑 Ctrl+C received, initiating shutdown...");
            Ok("SIGINT")
        },
        _ = sigterm.recv() => {
            warn!("🛑 SIGTERM received, initiating shutdown...");
            Ok("SIGTERM")
        }
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    warn!("🛑 Ctrl+C received, initiating shutdown...");
    Ok("SIGINT")
}
