//! Serving with graceful shutdown.

use std::future::IntoFuture;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Serve `app` until SIGINT or SIGTERM, then give in-flight requests up to
/// `drain_timeout` to finish. Overrunning the drain is an
/// [`io::ErrorKind::TimedOut`] error so the binary exits non-zero.
///
/// Peer addresses are recorded as `ConnectInfo<SocketAddr>` for logging.
pub async fn serve(listener: TcpListener, app: Router, drain_timeout: Duration) -> io::Result<()> {
    let shutdown = CancellationToken::new();

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.clone().cancelled_owned());
    let mut server = std::pin::pin!(server.into_future());

    tokio::select! {
        result = &mut server => return result,
        () = shutdown_signal() => shutdown.cancel(),
    }

    match tokio::time::timeout(drain_timeout, server).await {
        Ok(result) => {
            tracing::info!("Graceful shutdown complete");
            result
        }
        Err(_elapsed) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!(
                "connections still open after {}s, forcing exit",
                drain_timeout.as_secs()
            ),
        )),
    }
}

/// Wait for a termination signal.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by systemd.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
