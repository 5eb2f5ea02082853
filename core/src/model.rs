//! Decoded intake payloads as they are handed to the registry.
//!
//! Field names follow the intake wire contract (`intakeType`, `isBridge`,
//! inner `type`, `telemetry.status`, `telemetry.type`) and must not be
//! renamed. Event bodies are kept as JSON objects so scenario assertions can
//! compare exact emitted payloads.

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;

use crate::classify::classify_rum_batch_event;
use crate::classify::intake_type;
use crate::classify::rum_event_type;
use crate::classify::telemetry_field;

pub type JsonObject = Map<String, Value>;

/// Wire tag carried by every intake request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntakeType {
    Logs,
    Rum,
    Replay,
}

impl IntakeType {
    pub fn as_str(self) -> &'static str {
        match self {
            IntakeType::Logs => "logs",
            IntakeType::Rum => "rum",
            IntakeType::Replay => "replay",
        }
    }
}

impl fmt::Display for IntakeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded HTTP delivery to the collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intakeType", rename_all = "lowercase")]
pub enum IntakeRequest {
    Logs(LogsIntakeRequest),
    Rum(RumIntakeRequest),
    Replay(ReplayIntakeRequest),
}

impl IntakeRequest {
    pub fn intake_type(&self) -> IntakeType {
        intake_type(self)
    }

    pub fn is_bridge(&self) -> bool {
        match self {
            IntakeRequest::Logs(request) => request.is_bridge,
            IntakeRequest::Rum(request) => request.is_bridge,
            IntakeRequest::Replay(request) => request.is_bridge,
        }
    }

    /// Number of events carried. A replay request carries a single segment.
    pub fn event_count(&self) -> usize {
        match self {
            IntakeRequest::Logs(request) => request.events.len(),
            IntakeRequest::Rum(request) => request.events.len(),
            IntakeRequest::Replay(_) => 1,
        }
    }

    pub fn as_logs(&self) -> Option<&LogsIntakeRequest> {
        match self {
            IntakeRequest::Logs(request) => Some(request),
            IntakeRequest::Rum(_) | IntakeRequest::Replay(_) => None,
        }
    }

    pub fn as_rum(&self) -> Option<&RumIntakeRequest> {
        match self {
            IntakeRequest::Rum(request) => Some(request),
            IntakeRequest::Logs(_) | IntakeRequest::Replay(_) => None,
        }
    }

    pub fn as_replay(&self) -> Option<&ReplayIntakeRequest> {
        match self {
            IntakeRequest::Replay(request) => Some(request),
            IntakeRequest::Logs(_) | IntakeRequest::Rum(_) => None,
        }
    }
}

impl From<LogsIntakeRequest> for IntakeRequest {
    fn from(request: LogsIntakeRequest) -> Self {
        IntakeRequest::Logs(request)
    }
}

impl From<RumIntakeRequest> for IntakeRequest {
    fn from(request: RumIntakeRequest) -> Self {
        IntakeRequest::Rum(request)
    }
}

impl From<ReplayIntakeRequest> for IntakeRequest {
    fn from(request: ReplayIntakeRequest) -> Self {
        IntakeRequest::Replay(request)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsIntakeRequest {
    pub is_bridge: bool,
    pub events: Vec<LogsEvent>,
}

/// RUM and telemetry events share one batch and are told apart at read time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RumIntakeRequest {
    pub is_bridge: bool,
    pub events: Vec<RumBatchEvent>,
}

/// A single session replay segment upload.
///
/// Producers never send replay over the bridge transport; `is_bridge` is
/// stored as given and only checked when the registry config asks for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayIntakeRequest {
    #[serde(default)]
    pub is_bridge: bool,
    pub segment: BrowserSegment,
    pub metadata: SegmentMetadataAndSizes,
    pub filename: String,
    pub encoding: String,
    pub mimetype: String,
}

/// Field access shared by every JSON-backed event.
pub trait EventPayload {
    fn body(&self) -> &JsonObject;

    fn get(&self, key: &str) -> Option<&Value> {
        self.body().get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// JSON pointer lookup rooted at the event body, e.g. `/action/target/name`.
    /// The empty pointer does not resolve since the body is not a `Value`.
    fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (head, tail) = match rest.split_once('/') {
            Some((head, tail)) => (head, Some(tail)),
            None => (rest, None),
        };
        let key = head.replace("~1", "/").replace("~0", "~");
        let value = self.body().get(&key)?;
        match tail {
            Some(tail) => value.pointer(&format!("/{tail}")),
            None => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogsEvent(JsonObject);

impl LogsEvent {
    pub fn new(body: JsonObject) -> Self {
        Self(body)
    }

    pub fn message(&self) -> Option<&str> {
        self.get_str("message")
    }

    pub fn status(&self) -> Option<&str> {
        self.get_str("status")
    }

    pub fn origin(&self) -> Option<&str> {
        self.get_str("origin")
    }

    pub fn into_body(self) -> JsonObject {
        self.0
    }
}

impl EventPayload for LogsEvent {
    fn body(&self) -> &JsonObject {
        &self.0
    }
}

impl From<JsonObject> for LogsEvent {
    fn from(body: JsonObject) -> Self {
        Self::new(body)
    }
}

/// Value of the inner `type` field of a RUM event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RumEventType {
    Action,
    Error,
    Resource,
    View,
    /// Any other kind (long tasks, vitals, ...). Missing `type` maps to `Other("")`.
    Other(String),
}

impl RumEventType {
    pub fn as_str(&self) -> &str {
        match self {
            RumEventType::Action => "action",
            RumEventType::Error => "error",
            RumEventType::Resource => "resource",
            RumEventType::View => "view",
            RumEventType::Other(kind) => kind,
        }
    }
}

impl fmt::Display for RumEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RumEvent {
    kind: RumEventType,
    body: JsonObject,
}

impl RumEvent {
    pub fn new(body: JsonObject) -> Self {
        let kind = rum_event_type(body.get("type").and_then(Value::as_str));
        Self { kind, body }
    }

    pub fn kind(&self) -> &RumEventType {
        &self.kind
    }

    pub fn into_body(self) -> JsonObject {
        self.body
    }
}

impl EventPayload for RumEvent {
    fn body(&self) -> &JsonObject {
        &self.body
    }
}

/// Diagnostic event emitted by the SDK about itself.
///
/// `status` and `kind` mirror `telemetry.status` and `telemetry.type`. They
/// are independent: one event may be both an error and a configuration report.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryEvent {
    status: Option<String>,
    kind: Option<String>,
    body: JsonObject,
}

impl TelemetryEvent {
    pub fn new(body: JsonObject) -> Self {
        let status = telemetry_field(&body, "status").map(str::to_string);
        let kind = telemetry_field(&body, "type").map(str::to_string);
        Self { status, kind, body }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn into_body(self) -> JsonObject {
        self.body
    }
}

impl EventPayload for TelemetryEvent {
    fn body(&self) -> &JsonObject {
        &self.body
    }
}

/// Element of a RUM batch. Every element lands on exactly one side.
#[derive(Debug, Clone, PartialEq)]
pub enum RumBatchEvent {
    Rum(RumEvent),
    Telemetry(TelemetryEvent),
}

impl RumBatchEvent {
    pub fn as_rum(&self) -> Option<&RumEvent> {
        match self {
            RumBatchEvent::Rum(event) => Some(event),
            RumBatchEvent::Telemetry(_) => None,
        }
    }

    pub fn as_telemetry(&self) -> Option<&TelemetryEvent> {
        match self {
            RumBatchEvent::Rum(_) => None,
            RumBatchEvent::Telemetry(event) => Some(event),
        }
    }
}

impl EventPayload for RumBatchEvent {
    fn body(&self) -> &JsonObject {
        match self {
            RumBatchEvent::Rum(event) => event.body(),
            RumBatchEvent::Telemetry(event) => event.body(),
        }
    }
}

impl From<JsonObject> for RumBatchEvent {
    fn from(body: JsonObject) -> Self {
        classify_rum_batch_event(body)
    }
}

impl Serialize for RumBatchEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.body().serialize(serializer)
    }
}

/// Classifies on the inner `type` field instead of letting serde guess a variant.
impl<'de> Deserialize<'de> for RumBatchEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let body = JsonObject::deserialize(deserializer)?;
        Ok(classify_rum_batch_event(body))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Identifiers and bounds shared by a segment and its upload metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentMetadata {
    pub application: EntityRef,
    pub session: EntityRef,
    pub view: EntityRef,
    pub start: i64,
    pub end: i64,
    pub creation_reason: String,
    pub records_count: u64,
    pub has_full_snapshot: bool,
    pub index_in_view: u64,
    pub source: String,
}

/// A recorded chunk of session replay data. Records are kept verbatim and
/// fields outside the known metadata land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserSegment {
    #[serde(flatten)]
    pub metadata: SegmentMetadata,
    pub records: Vec<Value>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMetadataAndSizes {
    #[serde(flatten)]
    pub metadata: SegmentMetadata,
    pub raw_segment_size: u64,
    pub compressed_segment_size: u64,
    #[serde(flatten)]
    pub extra: JsonObject,
}
