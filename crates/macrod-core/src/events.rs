//! Boot and worker event types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// System boot-like event consumed by the resurrector
///
/// All three kinds map to the same resurrection action; they are kept
/// distinct only for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BootEvent {
    /// Normal device boot completed
    NormalBoot,
    /// Fast/quick boot completed (some devices)
    QuickBoot,
    /// The application package was replaced (update)
    PackageReplaced,
}

impl std::fmt::Display for BootEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BootEvent::NormalBoot => "boot completed",
            BootEvent::QuickBoot => "quick boot completed",
            BootEvent::PackageReplaced => "package replaced",
        };
        write!(f, "{}", label)
    }
}

/// An event emitted by the running worker
///
/// The payload arrives as a JSON string; a missing or malformed payload is
/// tolerated by substituting an empty object so the event is still
/// recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerEvent {
    pub event_type: String,
    pub event_data: Value,
}

impl WorkerEvent {
    /// Parse a worker event from its type and raw payload string
    pub fn parse(event_type: impl Into<String>, event_data: Option<&str>) -> Self {
        let raw = event_data.unwrap_or("{}");
        let event_data = serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!("Discarding malformed event payload: {}", e);
            Value::Object(serde_json::Map::new())
        });

        Self {
            event_type: event_type.into(),
            event_data,
        }
    }
}
