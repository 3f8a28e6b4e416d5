//! OS signal handling.
//!
//! SIGINT (Ctrl+C) and, on Unix, SIGTERM both mean "shut down gracefully".
//! There is no reload signal; configuration is read once at startup.

/// Resolve when the process is asked to terminate.
pub async fn wait_for_termination() -> Result<(), std::io::Error> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!(signal = "SIGINT", "Termination signal received");
            }
            _ = terminate.recv() => {
                tracing::info!(signal = "SIGTERM", "Termination signal received");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!(signal = "ctrl_c", "Termination signal received");
    }

    Ok(())
}
