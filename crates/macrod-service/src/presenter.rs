//! Foreground presenter capability
//!
//! The OS contract behind a long-running privileged service: something
//! user-visible must exist within a bounded time of entering the running
//! state, or the OS may kill the process. The controller treats this as an
//! injected capability so it can be tested without any OS dependency.

use macrod_core::prelude::*;
use macrod_core::ServiceStatus;

/// Turns "service is active" into an OS-visible persistent surface
///
/// `activate` must complete before `request_start()` returns; a failure
/// here aborts the start attempt.
pub trait Presenter: Send {
    fn activate(&mut self, status: &ServiceStatus) -> Result<()>;
    fn deactivate(&mut self);
}

/// Presenter that renders the persistent-notification contract as log lines
///
/// Stands in for a real notification surface on platforms without one; the
/// daemon's own log file is its visible trace.
#[derive(Debug, Default)]
pub struct LogPresenter {
    active: bool,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn content_text(status: &ServiceStatus) -> String {
        if status.events_processed > 0 {
            format!(
                "Automation active \u{2022} {} events processed",
                status.events_processed
            )
        } else {
            "Automation service is running".to_string()
        }
    }
}

impl Presenter for LogPresenter {
    fn activate(&mut self, status: &ServiceStatus) -> Result<()> {
        info!("Foreground surface active: {}", Self::content_text(status));
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) {
        if self.active {
            info!("Foreground surface removed");
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_text_without_events() {
        let status = ServiceStatus::default();
        assert_eq!(
            LogPresenter::content_text(&status),
            "Automation service is running"
        );
    }

    #[test]
    fn test_content_text_with_events() {
        let status = ServiceStatus {
            events_processed: 12,
            ..Default::default()
        };
        let text = LogPresenter::content_text(&status);
        assert!(text.contains("12 events processed"));
    }

    #[test]
    fn test_log_presenter_activate_deactivate() {
        let mut presenter = LogPresenter::new();
        assert!(presenter.activate(&ServiceStatus::default()).is_ok());
        assert!(presenter.active);

        presenter.deactivate();
        assert!(!presenter.active);
    }
}
