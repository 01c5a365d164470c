//! Shared test doubles for the capability seams
//!
//! Counting presenter/engine implementations backed by atomics, so unit
//! and integration tests can assert exactly how many activations and
//! engine transitions a scenario produced.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use macrod_core::prelude::*;
use macrod_core::ServiceStatus;

use crate::controller::ServiceController;
use crate::engine::MacroEngine;
use crate::prefs::PrefsStore;
use crate::presenter::Presenter;

/// Shared counters observed by a test after driving a scenario
#[derive(Debug, Default)]
pub struct Counters {
    activations: AtomicUsize,
    deactivations: AtomicUsize,
    engine_starts: AtomicUsize,
    engine_stops: AtomicUsize,
    engine_ticks: AtomicUsize,
}

impl Counters {
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }

    pub fn deactivations(&self) -> usize {
        self.deactivations.load(Ordering::SeqCst)
    }

    pub fn engine_starts(&self) -> usize {
        self.engine_starts.load(Ordering::SeqCst)
    }

    pub fn engine_stops(&self) -> usize {
        self.engine_stops.load(Ordering::SeqCst)
    }

    pub fn engine_ticks(&self) -> usize {
        self.engine_ticks.load(Ordering::SeqCst)
    }
}

/// Presenter double that counts activations and can be made to fail
pub struct CountingPresenter {
    counters: Arc<Counters>,
    fail: bool,
}

impl CountingPresenter {
    pub fn new(counters: &Arc<Counters>) -> Self {
        Self {
            counters: Arc::clone(counters),
            fail: false,
        }
    }

    pub fn failing(counters: &Arc<Counters>) -> Self {
        Self {
            counters: Arc::clone(counters),
            fail: true,
        }
    }
}

impl Presenter for CountingPresenter {
    fn activate(&mut self, _status: &ServiceStatus) -> Result<()> {
        if self.fail {
            return Err(Error::presenter("activation refused"));
        }
        self.counters.activations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn deactivate(&mut self) {
        self.counters.deactivations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Engine double that counts transitions; `failing` always refuses to
/// start, `failing_once` refuses exactly the first start
pub struct CountingEngine {
    counters: Arc<Counters>,
    fail: bool,
    fail_once: AtomicBool,
}

impl CountingEngine {
    pub fn new(counters: &Arc<Counters>) -> Self {
        Self {
            counters: Arc::clone(counters),
            fail: false,
            fail_once: AtomicBool::new(false),
        }
    }

    pub fn failing(counters: &Arc<Counters>) -> Self {
        Self {
            counters: Arc::clone(counters),
            fail: true,
            fail_once: AtomicBool::new(false),
        }
    }

    pub fn failing_once(counters: &Arc<Counters>) -> Self {
        Self {
            counters: Arc::clone(counters),
            fail: false,
            fail_once: AtomicBool::new(true),
        }
    }
}

impl MacroEngine for CountingEngine {
    fn start(&mut self) -> Result<()> {
        if self.fail || self.fail_once.swap(false, Ordering::SeqCst) {
            return Err(Error::engine("start refused"));
        }
        self.counters.engine_starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) {
        self.counters.engine_stops.fetch_add(1, Ordering::SeqCst);
    }

    fn tick(&mut self) {
        self.counters.engine_ticks.fetch_add(1, Ordering::SeqCst);
    }
}

/// Temp-dir-backed store plus counters, the common fixture for lifecycle
/// scenarios
pub struct TestHarness {
    pub prefs: Arc<PrefsStore>,
    pub counters: Arc<Counters>,
    _temp: tempfile::TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("create temp state dir");
        Self {
            prefs: PrefsStore::open_shared(temp.path()),
            counters: Arc::new(Counters::default()),
            _temp: temp,
        }
    }

    /// A controller wired to counting doubles over this harness's store
    pub fn controller(&self) -> ServiceController {
        ServiceController::new(
            self.prefs.clone(),
            Box::new(CountingPresenter::new(&self.counters)),
            Box::new(CountingEngine::new(&self.counters)),
        )
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
