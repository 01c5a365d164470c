//! # macrod-service - Service Lifecycle and Command Bridge
//!
//! The persistent-service core of macrod: the state machine governing
//! start/stop, the durable intent flag that survives process death, the
//! boot-time resurrection path, and the command/event channel connecting
//! the UI layer to the background worker.
//!
//! Depends on [`macrod_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Lifecycle
//! - [`ServiceController`] - Serialized start/stop/teardown state machine
//! - [`TeardownOutcome`] - Whether a restart is owed after process death
//! - [`BootResurrector`] - Boot event → conditional start
//!
//! ### Durable State
//! - [`PrefsStore`] / [`Prefs`] - Intent flag and execution counter
//! - [`InstanceLock`] - At-most-one daemon per state directory
//!
//! ### Channel
//! - [`CommandBridge`] - Method dispatch and error conversion
//! - [`MethodCall`], [`Reply`] - Wire types for the JSON line protocol
//! - [`channel`] - stdin/stdout transport tasks
//!
//! ### Capabilities
//! - [`Presenter`] / [`LogPresenter`] - Foreground promotion surface
//! - [`MacroEngine`] / [`IdleEngine`] - The driven worker
//! - [`PowerEnvironment`] / [`UnsupportedPower`] - Power-exemption surface
//!
//! ### Configuration and Runtime
//! - [`Settings`] - Optional TOML config with degrade-to-defaults loading
//! - [`runtime::run`] - Daemon assembly and signal-driven teardown

pub mod boot;
pub mod bridge;
pub mod channel;
pub mod controller;
pub mod engine;
pub mod lock;
pub mod power;
pub mod prefs;
pub mod presenter;
pub mod protocol;
pub mod runtime;
pub mod settings;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

// Public API re-exports
pub use boot::BootResurrector;
pub use bridge::CommandBridge;
pub use controller::{ServiceController, TeardownOutcome};
pub use engine::{IdleEngine, MacroEngine};
pub use lock::InstanceLock;
pub use power::{PowerEnvironment, UnsupportedPower};
pub use prefs::{Prefs, PrefsStore};
pub use presenter::{LogPresenter, Presenter};
pub use protocol::{strip_brackets, MethodCall, Reply, ReplyError};
pub use runtime::{run, RunOptions};
pub use settings::Settings;
