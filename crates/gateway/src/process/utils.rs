use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long SIGTERM leaves in-flight requests before everything is told to stop
const SIGTERM_DRAIN: Duration = Duration::from_secs(10);

/// Fires once when the process is asked to stop
pub struct ShutdownWatch {
    /// Finishes after the stop has been broadcast
    pub waiter: JoinHandle<()>,
    pub stop: watch::Receiver<()>,
}

/// Install SIGINT/SIGTERM handlers. SIGINT stops at once, SIGTERM after
///  [`SIGTERM_DRAIN`].
pub fn shutdown_watch() -> std::io::Result<ShutdownWatch> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let (stop_tx, stop) = watch::channel(());

    let waiter = tokio::spawn(async move {
        let received = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => {
                tracing::info!(drain_secs = SIGTERM_DRAIN.as_secs(), "SIGTERM received, draining");
                tokio::time::sleep(SIGTERM_DRAIN).await;
                "SIGTERM"
            }
        };

        tracing::info!(signal = received, "stopping drive gateway");
        let _ = stop_tx.send(());
    });

    Ok(ShutdownWatch { waiter, stop })
}

/// Route panics through tracing so they land in the log file too
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location();
        tracing::error!(
            message = %info,
            file = location.map(|l| l.file()),
            line = location.map(|l| l.line()),
            "panic"
        );
    }));
}

pub fn report_build_info() {
    let build = common::prelude::build_info();
    tracing::info!(
        version = %build.version,
        profile = %build.build_profile,
        features = %build.build_features,
        "drivelist gateway starting"
    );
}
