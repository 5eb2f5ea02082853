//! Discriminators for every level of the intake taxonomy.
//!
//! Request, batch and RUM kind levels are exhaustive partitions. The two
//! telemetry predicates are independent filters: an event may match both.
//! Request and batch predicates share the projections the registry views
//! filter with, so a predicate and its view cannot disagree.

use serde_json::Value;

use crate::model::IntakeRequest;
use crate::model::IntakeType;
use crate::model::JsonObject;
use crate::model::RumBatchEvent;
use crate::model::RumEvent;
use crate::model::RumEventType;
use crate::model::TelemetryEvent;

/// Inner `type` value that moves a RUM batch element to the telemetry side.
pub const TELEMETRY_EVENT_TYPE: &str = "telemetry";
pub const TELEMETRY_ERROR_STATUS: &str = "error";
pub const TELEMETRY_CONFIGURATION_TYPE: &str = "configuration";

pub fn intake_type(request: &IntakeRequest) -> IntakeType {
    match request {
        IntakeRequest::Logs(_) => IntakeType::Logs,
        IntakeRequest::Rum(_) => IntakeType::Rum,
        IntakeRequest::Replay(_) => IntakeType::Replay,
    }
}

pub fn is_logs_intake_request(request: &IntakeRequest) -> bool {
    request.as_logs().is_some()
}

pub fn is_rum_intake_request(request: &IntakeRequest) -> bool {
    request.as_rum().is_some()
}

pub fn is_replay_intake_request(request: &IntakeRequest) -> bool {
    request.as_replay().is_some()
}

/// Splits a raw RUM batch element on its inner `type` field.
pub fn classify_rum_batch_event(body: JsonObject) -> RumBatchEvent {
    let is_telemetry = body.get("type").and_then(Value::as_str) == Some(TELEMETRY_EVENT_TYPE);
    if is_telemetry {
        RumBatchEvent::Telemetry(TelemetryEvent::new(body))
    } else {
        RumBatchEvent::Rum(RumEvent::new(body))
    }
}

pub fn rum_event_type(type_field: Option<&str>) -> RumEventType {
    match type_field {
        Some("action") => RumEventType::Action,
        Some("error") => RumEventType::Error,
        Some("resource") => RumEventType::Resource,
        Some("view") => RumEventType::View,
        Some(other) => RumEventType::Other(other.to_string()),
        None => RumEventType::Other(String::new()),
    }
}

/// Reads `telemetry.<key>` as a string.
pub fn telemetry_field<'a>(body: &'a JsonObject, key: &str) -> Option<&'a str> {
    body.get("telemetry")?.get(key)?.as_str()
}

pub fn is_rum_event(event: &RumBatchEvent) -> bool {
    !is_telemetry_event(event)
}

pub fn is_telemetry_event(event: &RumBatchEvent) -> bool {
    event.as_telemetry().is_some()
}

pub fn is_rum_action_event(event: &RumEvent) -> bool {
    matches!(event.kind(), RumEventType::Action)
}

pub fn is_rum_error_event(event: &RumEvent) -> bool {
    matches!(event.kind(), RumEventType::Error)
}

pub fn is_rum_resource_event(event: &RumEvent) -> bool {
    matches!(event.kind(), RumEventType::Resource)
}

pub fn is_rum_view_event(event: &RumEvent) -> bool {
    matches!(event.kind(), RumEventType::View)
}

pub fn is_telemetry_error_event(event: &TelemetryEvent) -> bool {
    event.status() == Some(TELEMETRY_ERROR_STATUS)
}

pub fn is_telemetry_configuration_event(event: &TelemetryEvent) -> bool {
    event.kind() == Some(TELEMETRY_CONFIGURATION_TYPE)
}
