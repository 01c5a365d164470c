//! Core domain types for the service lifecycle

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

/// Service lifecycle phase
///
/// `Starting` and `Stopping` are transient: both complete inside the
/// controller's critical section, so callers only ever observe `Stopped`
/// or `Running` between operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServicePhase {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl ServicePhase {
    pub fn is_active(&self) -> bool {
        matches!(self, ServicePhase::Running)
    }
}

impl std::fmt::Display for ServicePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ServicePhase::Stopped => "stopped",
            ServicePhase::Starting => "starting",
            ServicePhase::Running => "running",
            ServicePhase::Stopping => "stopping",
        };
        write!(f, "{}", label)
    }
}

/// Snapshot of the service state with session metadata
///
/// `enabled` is the durable intent flag; `phase` is the ephemeral fact.
/// They disagree exactly when the service crashed or the attempt to start
/// it failed, which is the window boot resurrection exists to close.
#[derive(Debug, Clone, Default)]
pub struct ServiceStatus {
    pub phase: ServicePhase,
    pub enabled: bool,
    pub events_processed: u64,
    pub started_at: Option<DateTime<Local>>,
}

impl ServiceStatus {
    pub fn is_running(&self) -> bool {
        self.phase.is_active()
    }

    pub fn session_duration(&self) -> Option<Duration> {
        self.started_at.map(|start| Local::now() - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_default_is_stopped() {
        assert_eq!(ServicePhase::default(), ServicePhase::Stopped);
    }

    #[test]
    fn test_phase_is_active() {
        assert!(!ServicePhase::Stopped.is_active());
        assert!(!ServicePhase::Starting.is_active());
        assert!(ServicePhase::Running.is_active());
        assert!(!ServicePhase::Stopping.is_active());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(ServicePhase::Stopped.to_string(), "stopped");
        assert_eq!(ServicePhase::Running.to_string(), "running");
    }

    #[test]
    fn test_status_default() {
        let status = ServiceStatus::default();
        assert!(!status.is_running());
        assert!(!status.enabled);
        assert_eq!(status.events_processed, 0);
        assert!(status.started_at.is_none());
        assert!(status.session_duration().is_none());
    }

    #[test]
    fn test_session_duration() {
        let status = ServiceStatus {
            phase: ServicePhase::Running,
            enabled: true,
            events_processed: 0,
            started_at: Some(Local::now() - Duration::seconds(60)),
        };

        let duration = status.session_duration().unwrap();
        assert!(duration.num_seconds() >= 60);
    }
}
