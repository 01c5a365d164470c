//! macrod - A persistent background service manager for macro automation
//!
//! This is the binary entry point. All logic lives in the library crates.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use macrod_core::prelude::*;
use macrod_core::BootEvent;
use macrod_service::{runtime, RunOptions, Settings};

/// macrod - a persistent background service manager
#[derive(Parser, Debug)]
#[command(name = "macrod")]
#[command(about = "A persistent background service manager for macro automation", long_about = None)]
struct Args {
    /// Durable state directory (overrides the config file)
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Boot reason, passed by the init hook that launched this process.
    /// When present, stored intent decides whether the service starts.
    #[arg(long, value_enum, value_name = "REASON")]
    boot_reason: Option<BootReason>,

    /// Log to stderr in addition to the log file
    #[arg(long)]
    foreground: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BootReason {
    Normal,
    Quick,
    PackageReplaced,
}

impl From<BootReason> for BootEvent {
    fn from(reason: BootReason) -> Self {
        match reason {
            BootReason::Normal => BootEvent::NormalBoot,
            BootReason::Quick => BootEvent::QuickBoot,
            BootReason::PackageReplaced => BootEvent::PackageReplaced,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    macrod_core::logging::init(args.foreground)?;

    let settings = Settings::load();
    let state_dir = args.state_dir.unwrap_or_else(|| settings.state_dir());

    let opts = RunOptions {
        state_dir,
        boot_event: args.boot_reason.map(Into::into),
        tick_interval: Duration::from_millis(settings.service.tick_interval_ms),
    };

    if let Err(e) = runtime::run(opts).await {
        error!("Daemon exiting with error: {}", e);
        eprintln!("macrod: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
