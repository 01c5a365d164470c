//! Daemon runtime assembly
//!
//! Wires the store, controller, resurrector, bridge, and channel
//! transport together and runs until an OS termination signal arrives.
//! The signal path is the only cancellation: it is treated as an
//! unsolicited stop, and the controller decides whether a restart is owed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::sync::mpsc;

use macrod_core::prelude::*;
use macrod_core::BootEvent;

use crate::boot::BootResurrector;
use crate::bridge::CommandBridge;
use crate::channel;
use crate::controller::{ServiceController, TeardownOutcome};
use crate::engine::IdleEngine;
use crate::lock::InstanceLock;
use crate::power::UnsupportedPower;
use crate::prefs::PrefsStore;
use crate::presenter::LogPresenter;

/// Everything the binary resolves before handing over
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub state_dir: PathBuf,
    /// Present when the daemon was launched by a boot-like event; absent
    /// on interactive launches, which must not resurrect
    pub boot_event: Option<BootEvent>,
    pub tick_interval: Duration,
}

/// Run the daemon until a termination signal
pub async fn run(opts: RunOptions) -> Result<()> {
    let _lock = InstanceLock::acquire(&opts.state_dir)?;

    let prefs = PrefsStore::open_shared(&opts.state_dir);
    let controller = Arc::new(ServiceController::new(
        prefs,
        Box::new(LogPresenter::new()),
        Box::new(IdleEngine::new()),
    ));

    if let Some(event) = opts.boot_event {
        BootResurrector::new(controller.clone()).handle_boot_event(event);
    }

    let bridge = CommandBridge::new(controller.clone(), Box::new(UnsupportedPower::new()));

    let (call_tx, call_rx) = mpsc::channel(32);
    let (reply_tx, reply_rx) = mpsc::channel(32);

    tokio::spawn(channel::read_calls(BufReader::new(tokio::io::stdin()), call_tx));
    tokio::spawn(channel::write_replies(tokio::io::stdout(), reply_rx));
    tokio::spawn(bridge.run(call_rx, reply_tx));

    let mut ticks = tokio::time::interval(opts.tick_interval);
    ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let signal = wait_for_signal();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            _ = ticks.tick() => controller.tick(),
            result = &mut signal => {
                result?;
                break;
            }
        }
    }

    match controller.on_process_teardown() {
        TeardownOutcome::RestartScheduled => {
            info!("Service intent still set, restart deferred to next boot event");
        }
        TeardownOutcome::CleanShutdown => {
            info!("Daemon exiting after clean shutdown");
        }
    }

    Ok(())
}

/// Wait for a termination signal
async fn wait_for_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| Error::config(format!("Failed to create SIGINT handler: {}", e)))?;
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| Error::config(format!("Failed to create SIGTERM handler: {}", e)))?;

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
        }

        Ok(())
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| Error::config(format!("Failed to listen for Ctrl+C: {}", e)))?;
        info!("Received Ctrl+C");
        Ok(())
    }
}
