//! Macro engine capability
//!
//! The actual automation work is an external collaborator; the lifecycle
//! core only needs a start/stop/tick capability from it.

use macrod_core::prelude::*;

/// The worker the controller drives
///
/// `start` failures are reported to the caller as `StartFailed`; `stop`
/// and `tick` have no failure mode the core cares about.
pub trait MacroEngine: Send {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self);
    fn tick(&mut self);
}

/// Inert engine used until a real automation backend is wired in
///
/// Logs lifecycle transitions and otherwise does nothing.
#[derive(Debug, Default)]
pub struct IdleEngine {
    started: bool,
}

impl IdleEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MacroEngine for IdleEngine {
    fn start(&mut self) -> Result<()> {
        info!("Macro engine initialized");
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        if self.started {
            info!("Macro engine shut down");
            self.started = false;
        }
    }

    fn tick(&mut self) {
        trace!("Macro engine tick");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_engine_lifecycle() {
        let mut engine = IdleEngine::new();
        assert!(!engine.started);

        engine.start().unwrap();
        assert!(engine.started);

        engine.tick();

        engine.stop();
        assert!(!engine.started);
    }

    #[test]
    fn test_idle_engine_stop_without_start() {
        let mut engine = IdleEngine::new();
        engine.stop();
        assert!(!engine.started);
    }
}
