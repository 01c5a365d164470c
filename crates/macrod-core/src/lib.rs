//! # macrod-core - Core Domain Types
//!
//! Foundation crate for macrod. Provides domain types, error handling,
//! event definitions, and the logging bootstrap.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`ServicePhase`] - Service lifecycle phase (Stopped, Starting, Running, Stopping)
//! - [`ServiceStatus`] - Snapshot of phase, intent flag, counter, and session timing
//!
//! ### Events (`events`)
//! - [`BootEvent`] - Boot-like system events consumed by the resurrector
//! - [`WorkerEvent`] - Events emitted by the running worker, with tolerant payload parsing
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use macrod_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod types;

/// Prelude for common imports used throughout all macrod crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::{BootEvent, WorkerEvent};
pub use types::{ServicePhase, ServiceStatus};
