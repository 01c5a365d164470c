//! Service lifecycle controller
//!
//! The state machine governing start/stop/teardown. Durable intent
//! (`service_enabled` in the prefs store) and the ephemeral running fact
//! are deliberately separate: intent outlives the process, fact does not,
//! and boot resurrection recomputes the fact from the intent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use macrod_core::prelude::*;
use macrod_core::{ServicePhase, ServiceStatus};

use crate::engine::MacroEngine;
use crate::prefs::PrefsStore;
use crate::presenter::Presenter;

/// What the runtime should do after an OS-initiated teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// Intent was still set: treat as unintended termination, a restart is
    /// owed on the next boot event
    RestartScheduled,
    /// Intent was cleared: a clean stop, nothing further to do
    CleanShutdown,
}

struct Inner {
    phase: ServicePhase,
    started_at: Option<DateTime<Local>>,
    presenter: Box<dyn Presenter>,
    engine: Box<dyn MacroEngine>,
}

/// One controller instance per process
///
/// `request_start`/`request_stop`/`on_process_teardown` serialize through a
/// single mutex; `Starting` and `Stopping` complete inside it, so no
/// half-started state is ever observable. The running fact is mirrored
/// into an atomic so `is_running()` never takes the lock.
pub struct ServiceController {
    inner: Mutex<Inner>,
    running: AtomicBool,
    prefs: Arc<PrefsStore>,
}

impl ServiceController {
    pub fn new(
        prefs: Arc<PrefsStore>,
        presenter: Box<dyn Presenter>,
        engine: Box<dyn MacroEngine>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                phase: ServicePhase::Stopped,
                started_at: None,
                presenter,
                engine,
            }),
            running: AtomicBool::new(false),
            prefs,
        }
    }

    /// Start the service
    ///
    /// Idempotent: a start while already running succeeds without a second
    /// activation. The presenter is activated before the durable intent is
    /// written and before the engine starts; an engine failure leaves the
    /// intent set so the next boot retries.
    pub fn request_start(&self) -> Result<()> {
        let mut inner = self.inner.lock();

        if inner.phase.is_active() {
            debug!("Service already running, skipping start");
            return Ok(());
        }

        info!("Starting service");
        inner.phase = ServicePhase::Starting;

        // Foreground promotion must land before this call returns
        let status = self.snapshot(&inner);
        if let Err(e) = inner.presenter.activate(&status) {
            warn!("Foreground promotion failed: {}", e);
            inner.phase = ServicePhase::Stopped;
            return Err(Error::start_failed(format!("foreground promotion: {}", e)));
        }

        self.prefs.set_service_enabled(true);

        if let Err(e) = inner.engine.start() {
            warn!("Engine start failed, intent stays set: {}", e);
            inner.presenter.deactivate();
            inner.phase = ServicePhase::Stopped;
            return Err(Error::start_failed(format!("engine start: {}", e)));
        }

        inner.started_at = Some(Local::now());
        inner.phase = ServicePhase::Running;
        self.running.store(true, Ordering::Release);

        info!("Service started");
        Ok(())
    }

    /// Stop the service and clear the durable intent
    ///
    /// Idempotent: a stop while already stopped is a no-op.
    pub fn request_stop(&self) -> Result<()> {
        let mut inner = self.inner.lock();

        if inner.phase == ServicePhase::Stopped {
            debug!("Service already stopped, skipping stop");
            return Ok(());
        }

        info!("Stopping service");
        inner.phase = ServicePhase::Stopping;

        self.prefs.set_service_enabled(false);
        inner.engine.stop();
        inner.presenter.deactivate();

        inner.started_at = None;
        inner.phase = ServicePhase::Stopped;
        self.running.store(false, Ordering::Release);

        info!("Service stopped");
        Ok(())
    }

    /// Handle OS-initiated process teardown
    ///
    /// The intent flag is NOT cleared here: death while the intent is set
    /// is an unintended termination, and the returned outcome tells the
    /// runtime a restart is owed on the next boot event.
    pub fn on_process_teardown(&self) -> TeardownOutcome {
        let mut inner = self.inner.lock();

        self.running.store(false, Ordering::Release);

        if inner.phase.is_active() {
            inner.engine.stop();
            inner.presenter.deactivate();
        }
        inner.started_at = None;
        inner.phase = ServicePhase::Stopped;

        if self.prefs.service_enabled() {
            info!("Process teardown while service was enabled, restart scheduled");
            TeardownOutcome::RestartScheduled
        } else {
            info!("Process teardown, clean shutdown");
            TeardownOutcome::CleanShutdown
        }
    }

    /// Drive the engine's periodic capability; a no-op unless running
    pub fn tick(&self) {
        let mut inner = self.inner.lock();
        if inner.phase.is_active() {
            inner.engine.tick();
        }
    }

    /// Lock-free snapshot of the running fact
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Full state snapshot
    pub fn status(&self) -> ServiceStatus {
        let inner = self.inner.lock();
        self.snapshot(&inner)
    }

    fn snapshot(&self, inner: &Inner) -> ServiceStatus {
        ServiceStatus {
            phase: inner.phase,
            enabled: self.prefs.service_enabled(),
            events_processed: self.prefs.macros_executed_count(),
            started_at: inner.started_at,
        }
    }

    /// The durable store backing this controller
    pub fn prefs(&self) -> &Arc<PrefsStore> {
        &self.prefs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingEngine, CountingPresenter, TestHarness};
    use macrod_core::Error;

    #[test]
    fn test_start_from_stopped() {
        let h = TestHarness::new();
        let controller = h.controller();

        assert!(!controller.is_running());
        controller.request_start().unwrap();

        assert!(controller.is_running());
        assert_eq!(controller.status().phase, ServicePhase::Running);
        assert!(controller.prefs().service_enabled());
        assert_eq!(h.counters.activations(), 1);
        assert_eq!(h.counters.engine_starts(), 1);
    }

    #[test]
    fn test_start_is_idempotent() {
        let h = TestHarness::new();
        let controller = h.controller();

        controller.request_start().unwrap();
        controller.request_start().unwrap();

        assert!(controller.is_running());
        assert_eq!(h.counters.activations(), 1);
        assert_eq!(h.counters.engine_starts(), 1);
    }

    #[test]
    fn test_stop_clears_intent() {
        let h = TestHarness::new();
        let controller = h.controller();

        controller.request_start().unwrap();
        controller.request_stop().unwrap();

        assert!(!controller.is_running());
        assert!(!controller.prefs().service_enabled());
        assert_eq!(h.counters.deactivations(), 1);
        assert_eq!(h.counters.engine_stops(), 1);
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let h = TestHarness::new();
        let controller = h.controller();

        controller.request_stop().unwrap();

        assert_eq!(h.counters.deactivations(), 0);
        assert_eq!(h.counters.engine_stops(), 0);
    }

    #[test]
    fn test_engine_failure_preserves_intent() {
        let h = TestHarness::new();
        let controller = ServiceController::new(
            h.prefs.clone(),
            Box::new(CountingPresenter::new(&h.counters)),
            Box::new(CountingEngine::failing(&h.counters)),
        );

        let err = controller.request_start().unwrap_err();
        assert!(matches!(err, Error::StartFailed { .. }));

        // Intent survives the failed attempt; the fact does not
        assert!(controller.prefs().service_enabled());
        assert!(!controller.is_running());
        assert_eq!(controller.status().phase, ServicePhase::Stopped);
        // The half-activated presenter was rolled back
        assert_eq!(h.counters.activations(), 1);
        assert_eq!(h.counters.deactivations(), 1);
    }

    #[test]
    fn test_presenter_failure_leaves_intent_untouched() {
        let h = TestHarness::new();
        let controller = ServiceController::new(
            h.prefs.clone(),
            Box::new(CountingPresenter::failing(&h.counters)),
            Box::new(CountingEngine::new(&h.counters)),
        );

        let err = controller.request_start().unwrap_err();
        assert!(matches!(err, Error::StartFailed { .. }));

        assert!(!controller.prefs().service_enabled());
        assert!(!controller.is_running());
        assert_eq!(h.counters.engine_starts(), 0);
    }

    #[test]
    fn test_teardown_while_running_schedules_restart() {
        let h = TestHarness::new();
        let controller = h.controller();

        controller.request_start().unwrap();
        let outcome = controller.on_process_teardown();

        assert_eq!(outcome, TeardownOutcome::RestartScheduled);
        assert!(!controller.is_running());
        // Intent is what carries the restart across the process boundary
        assert!(controller.prefs().service_enabled());
        assert_eq!(h.counters.engine_stops(), 1);
        assert_eq!(h.counters.deactivations(), 1);
    }

    #[test]
    fn test_teardown_after_stop_is_clean() {
        let h = TestHarness::new();
        let controller = h.controller();

        controller.request_start().unwrap();
        controller.request_stop().unwrap();
        let outcome = controller.on_process_teardown();

        assert_eq!(outcome, TeardownOutcome::CleanShutdown);
    }

    #[test]
    fn test_tick_only_runs_while_active() {
        let h = TestHarness::new();
        let controller = h.controller();

        controller.tick();
        assert_eq!(h.counters.engine_ticks(), 0);

        controller.request_start().unwrap();
        controller.tick();
        controller.tick();
        assert_eq!(h.counters.engine_ticks(), 2);

        controller.request_stop().unwrap();
        controller.tick();
        assert_eq!(h.counters.engine_ticks(), 2);
    }

    #[test]
    fn test_status_reflects_session_start() {
        let h = TestHarness::new();
        let controller = h.controller();

        assert!(controller.status().started_at.is_none());

        controller.request_start().unwrap();
        assert!(controller.status().started_at.is_some());

        controller.request_stop().unwrap();
        assert!(controller.status().started_at.is_none());
    }

    #[test]
    fn test_restart_after_failed_attempt_succeeds() {
        let h = TestHarness::new();
        let controller = ServiceController::new(
            h.prefs.clone(),
            Box::new(CountingPresenter::new(&h.counters)),
            Box::new(CountingEngine::failing_once(&h.counters)),
        );

        assert!(controller.request_start().is_err());
        controller.request_start().unwrap();

        assert!(controller.is_running());
        assert_eq!(h.counters.activations(), 2);
    }
}
