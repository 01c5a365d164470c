//! Boot-time service resurrection
//!
//! Listens for boot-like events and re-issues a start request when the
//! durable intent flag says the service should be active. Holds no state
//! of its own; idempotency against event storms is entirely
//! `request_start()`'s.

use std::sync::Arc;

use macrod_core::prelude::*;
use macrod_core::BootEvent;

use crate::controller::ServiceController;

/// Re-issues a start command after boot-like events, gated on stored intent
pub struct BootResurrector {
    controller: Arc<ServiceController>,
}

impl BootResurrector {
    pub fn new(controller: Arc<ServiceController>) -> Self {
        Self { controller }
    }

    /// Handle one boot-like event
    ///
    /// All event kinds map to the same action. Goes through the same
    /// public entry point the UI uses; start failures are logged and
    /// swallowed since the boot path has no caller to report to.
    pub fn handle_boot_event(&self, event: BootEvent) {
        info!("Received boot event: {}", event);

        if !self.controller.prefs().service_enabled() {
            debug!("Service not enabled, ignoring boot event");
            return;
        }

        info!("Service was enabled, restarting after {}", event);
        if let Err(e) = self.controller.request_start() {
            error!("Boot-time restart failed: {}", e);
        }
    }
}
