//! Real process signals through `OsSignals`.
//!
//! Uses SIGUSR1 so the test runner's own SIGINT/SIGTERM handling is untouched.

#![cfg(unix)]

use std::os::unix::process::ExitStatusExt;
use std::sync::Arc;
use std::time::Duration;

use nix::sys::signal::{Signal, raise};
use serial_test::serial;
use tokio::process::Command;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use sigvisor::{
    CoordinatorState, OsSignals, RecordingExit, ShutdownConfig, ShutdownCoordinator, SignalKind,
    SignalSet, SignalSource,
};

#[tokio::test]
#[serial]
async fn test_os_watcher_receives_raised_signal() {
    let cancel = CancellationToken::new();
    let mut watcher = OsSignals::new()
        .watch(&SignalSet::new([SignalKind::User1]), &cancel)
        .unwrap();

    raise(Signal::SIGUSR1).unwrap();

    let got = tokio::time::timeout(Duration::from_secs(5), watcher.recv())
        .await
        .expect("signal not delivered");
    assert_eq!(got, Some(SignalKind::User1));

    cancel.cancel();
    assert_eq!(watcher.recv().await, None);
}

#[tokio::test]
#[serial]
async fn test_coordinator_escalates_on_real_signals() {
    let exit = Arc::new(RecordingExit::new());
    let coordinator = ShutdownCoordinator::builder()
        .with_config(ShutdownConfig {
            max_shutdown_duration: Duration::from_secs(30),
            ..ShutdownConfig::default()
        })
        .with_signals(SignalSet::new([SignalKind::User1]))
        .with_exit(exit.clone())
        .build();

    let (tx, rx) = oneshot::channel();
    let handle = coordinator
        .handle_shutdown(CancellationToken::new(), move || async move {
            let _ = tx.send(());
            std::future::pending::<()>().await;
        })
        .unwrap();

    raise(Signal::SIGUSR1).unwrap();
    tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("callback not invoked")
        .unwrap();
    assert_eq!(handle.state(), CoordinatorState::ShuttingDown);

    raise(Signal::SIGUSR1).unwrap();
    let code = tokio::time::timeout(Duration::from_secs(5), exit.wait())
        .await
        .expect("no forced exit");
    assert_eq!(code, 2);
    assert_eq!(handle.wait().await, CoordinatorState::Terminated);
}

/// Set in the re-executed test binary to run the child side of
/// `test_default_action_restored_after_run`.
const CHILD_ENV: &str = "SIGVISOR_DEFAULT_ACTION_CHILD";

/// Once the run is over nobody watches SIGUSR2 any more, so raising it must
/// kill the process like an unhandled SIGUSR2 would. Checked in a child
/// process, since success means the process dies.
#[tokio::test]
async fn test_default_action_restored_after_run() {
    if std::env::var_os(CHILD_ENV).is_some() {
        let coordinator = ShutdownCoordinator::builder()
            .with_signals(SignalSet::new([SignalKind::User2]))
            .with_exit(Arc::new(RecordingExit::new()))
            .build();
        let cancel = CancellationToken::new();
        let handle = coordinator
            .handle_shutdown(cancel.clone(), || async {})
            .unwrap();

        cancel.cancel();
        assert_eq!(handle.wait().await, CoordinatorState::Cancelled);

        raise(Signal::SIGUSR2).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        // still alive: the signal was swallowed
        std::process::exit(0);
    }

    let status = Command::new(std::env::current_exe().unwrap())
        .args(["test_default_action_restored_after_run", "--exact", "--nocapture"])
        .env(CHILD_ENV, "1")
        .status()
        .await
        .unwrap();

    let usr2 = Signal::SIGUSR2 as i32;
    let killed_by_usr2 = status.signal() == Some(usr2) || status.code() == Some(128 + usr2);
    assert!(killed_by_usr2, "child survived SIGUSR2: {status:?}");
}

#[tokio::test]
#[serial]
async fn test_signal_caught_while_watched() {
    let cancel = CancellationToken::new();
    let mut watcher = OsSignals::new()
        .watch(&SignalSet::new([SignalKind::User1]), &cancel)
        .unwrap();
    let mut second = OsSignals::new()
        .watch(&SignalSet::new([SignalKind::User1]), &cancel)
        .unwrap();

    // one of two watchers gone: SIGUSR1 is still caught
    watcher.stop();
    raise(Signal::SIGUSR1).unwrap();

    let got = tokio::time::timeout(Duration::from_secs(5), second.recv())
        .await
        .expect("signal not delivered");
    assert_eq!(got, Some(SignalKind::User1));
}
