//! Process signal handling.

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Spawn a listener that cancels the returned token on Ctrl-C or SIGTERM.
///
/// # Errors
/// Fails if the SIGTERM handler cannot be registered.
pub fn install() -> std::io::Result<CancellationToken> {
    let token = CancellationToken::new();
    let trigger = token.clone();

    #[cfg(unix)]
    let mut sigterm =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    tokio::spawn(async move {
        #[cfg(unix)]
        let terminate = async {
            sigterm.recv().await;
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("received Ctrl-C, shutting down"),
            () = terminate => info!("received SIGTERM, shutting down"),
        }
        trigger.cancel();
    });

    Ok(token)
}
