//! Command bridge between the UI channel and the lifecycle controller
//!
//! Maps each inbound call to exactly one controller or environment
//! operation. Every failure inside a dispatched operation is converted
//! here into a structured error reply; nothing crosses this boundary as a
//! panic or a lost message.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::mpsc;

use macrod_core::prelude::*;
use macrod_core::WorkerEvent;

use crate::controller::ServiceController;
use crate::power::PowerEnvironment;
use crate::protocol::{MethodCall, Reply};

pub struct CommandBridge {
    controller: Arc<ServiceController>,
    power: Box<dyn PowerEnvironment>,
}

impl CommandBridge {
    pub fn new(controller: Arc<ServiceController>, power: Box<dyn PowerEnvironment>) -> Self {
        Self { controller, power }
    }

    /// Handle one call, always producing a reply
    pub fn handle(&self, call: &MethodCall) -> Reply {
        debug!("Method called: {}", call.method);

        match self.dispatch(&call.method, &call.params) {
            Ok(result) => Reply::success(call.id, result),
            Err(Error::UnsupportedCommand { method }) => {
                warn!("Unrecognized method: {}", method);
                Reply::not_implemented(call.id, &method)
            }
            Err(e) => {
                error!("Error handling method call {}: {}", call.method, e);
                Reply::error(call.id, e.code(), e.to_string())
            }
        }
    }

    fn dispatch(&self, method: &str, params: &Value) -> Result<Value> {
        match method {
            "startService" => {
                self.controller.request_start()?;
                Ok(json!(true))
            }
            "stopService" => {
                self.controller.request_stop()?;
                Ok(json!(true))
            }
            "isServiceRunning" => Ok(json!(self.controller.is_running())),
            "isBatteryOptimizationDisabled" => Ok(json!(self.power.is_exemption_granted())),
            "requestDisableBatteryOptimization" => {
                self.request_exemption_with_fallback();
                Ok(json!(true))
            }
            "openBatteryOptimizationSettings" => {
                if let Err(e) = self.power.open_exemption_settings() {
                    warn!("Could not open exemption settings: {}", e);
                }
                Ok(json!(true))
            }
            "emitEvent" => {
                let event_type = match params.get("eventType").and_then(Value::as_str) {
                    Some(t) => t,
                    None => {
                        warn!("emitEvent without eventType, dropping");
                        return Ok(Value::Null);
                    }
                };
                let event_data = params.get("eventData").and_then(Value::as_str);
                Ok(json!(self.emit_event(event_type, event_data)))
            }
            other => Err(Error::unsupported_command(other)),
        }
    }

    /// Record one worker event, returning the new execution count
    ///
    /// A malformed payload is tolerated by substituting an empty object;
    /// the event is still counted.
    pub fn emit_event(&self, event_type: &str, event_data: Option<&str>) -> u64 {
        let event = WorkerEvent::parse(event_type, event_data);
        debug!("Emitting event: {} with data: {}", event.event_type, event.event_data);
        self.controller.prefs().increment_macros_executed()
    }

    /// Exemption request with the settings surface as fallback
    ///
    /// If the fallback also fails there is no stronger recovery available,
    /// so the second failure is logged and swallowed.
    fn request_exemption_with_fallback(&self) {
        if let Err(e) = self.power.request_exemption() {
            warn!("Exemption request failed, opening settings instead: {}", e);
            if let Err(e) = self.power.open_exemption_settings() {
                warn!("Could not open exemption settings either: {}", e);
            }
        }
    }

    /// Serve the channel: one reply per call, in arrival order
    pub async fn run(self, mut calls: mpsc::Receiver<MethodCall>, replies: mpsc::Sender<Reply>) {
        while let Some(call) = calls.recv().await {
            let reply = self.handle(&call);
            if replies.send(reply).await.is_err() {
                debug!("Reply channel closed, stopping bridge");
                break;
            }
        }
        debug!("Command bridge finished");
    }
}
