//! # Example: Graceful shutdown with escalation
//!
//! Run it, then press Ctrl-C once to start a (slow) graceful shutdown.
//! Press Ctrl-C again before it finishes to force exit with code 2, or wait
//! for the 5s budget to run out and watch the diagnostic dump (exit code 1).
//!
//! ```text
//! RUST_LOG=info cargo run --example graceful
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use sigvisor::{CoordinatorState, ShutdownConfig, ShutdownCoordinator, SignalKind, SignalSet};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();

    let coordinator = ShutdownCoordinator::builder()
        .with_config(ShutdownConfig {
            name: "demo".into(),
            max_shutdown_duration: Duration::from_secs(5),
            dump_on_second_signal: true,
            ..ShutdownConfig::default()
        })
        .with_signals(SignalSet::new([SignalKind::Interrupt, SignalKind::Terminate]))
        .build();

    let app = CancellationToken::new();
    let stopped = app.clone();
    let handle = coordinator.handle_shutdown(app.clone(), move || async move {
        println!("[app] draining connections (takes 8s)");
        tokio::time::sleep(Duration::from_secs(8)).await;
        println!("[app] drained");
        stopped.cancel();
    })?;

    println!("[app] running; press Ctrl-C");
    let mut ticks = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = app.cancelled() => break,
            _ = ticks.tick() => println!("[app] tick (state={})", handle.state()),
        }
    }

    let outcome = handle.wait().await;
    println!("[app] coordinator finished: {outcome}");
    if outcome == CoordinatorState::Cancelled {
        println!("[app] clean exit");
    }
    Ok(())
}
