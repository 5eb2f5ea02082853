//! Fixtures and a mock collection endpoint shared by the integration tests.

use std::sync::Mutex;
use std::sync::PoisonError;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use e2e_intake_core::BrowserSegment;
use e2e_intake_core::EntityRef;
use e2e_intake_core::IntakeRequest;
use e2e_intake_core::IntakeType;
use e2e_intake_core::JsonObject;
use e2e_intake_core::LogsEvent;
use e2e_intake_core::LogsIntakeRequest;
use e2e_intake_core::ReplayIntakeRequest;
use e2e_intake_core::RumBatchEvent;
use e2e_intake_core::RumIntakeRequest;
use e2e_intake_core::SegmentMetadata;
use e2e_intake_core::SegmentMetadataAndSizes;
use e2e_intake_core::SharedIntakeRegistry;
use serde_json::Value;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::Request;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path_regex;

const EVENT_DATE: i64 = 1_700_000_000_000;

pub fn json_object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be a JSON object, got {other}"),
    }
}

pub fn logs_event(message: &str) -> LogsEvent {
    LogsEvent::new(json_object(json!({
        "date": EVENT_DATE,
        "message": message,
        "status": "info",
        "origin": "logger",
    })))
}

/// Minimal RUM event of an arbitrary kind.
pub fn rum_event(kind: &str) -> RumBatchEvent {
    RumBatchEvent::from(json_object(json!({
        "date": EVENT_DATE,
        "type": kind,
        "view": {"id": "view-1"},
    })))
}

pub fn rum_action_event(target_name: &str) -> RumBatchEvent {
    RumBatchEvent::from(json_object(json!({
        "date": EVENT_DATE,
        "type": "action",
        "view": {"id": "view-1"},
        "action": {
            "id": "action-1",
            "type": "click",
            "target": {"name": target_name},
            "loading_time": 0,
            "error": {"count": 0},
            "long_task": {"count": 0},
            "resource": {"count": 0},
            "frustration": {"type": []},
        },
    })))
}

pub fn rum_view_event(view_id: &str) -> RumBatchEvent {
    RumBatchEvent::from(json_object(json!({
        "date": EVENT_DATE,
        "type": "view",
        "view": {"id": view_id, "action": {"count": 0}},
    })))
}

pub fn rum_error_event(message: &str) -> RumBatchEvent {
    RumBatchEvent::from(json_object(json!({
        "date": EVENT_DATE,
        "type": "error",
        "view": {"id": "view-1"},
        "error": {"message": message, "source": "console"},
    })))
}

pub fn rum_resource_event(resource_type: &str, url: &str) -> RumBatchEvent {
    RumBatchEvent::from(json_object(json!({
        "date": EVENT_DATE,
        "type": "resource",
        "view": {"id": "view-1"},
        "resource": {"type": resource_type, "url": url},
    })))
}

/// Telemetry event with the given `telemetry.status` and `telemetry.type`.
pub fn telemetry_event(status: Option<&str>, kind: Option<&str>) -> RumBatchEvent {
    let mut telemetry = JsonObject::new();
    if let Some(status) = status {
        telemetry.insert("status".to_string(), json!(status));
    }
    if let Some(kind) = kind {
        telemetry.insert("type".to_string(), json!(kind));
    }
    RumBatchEvent::from(json_object(json!({
        "date": EVENT_DATE,
        "type": "telemetry",
        "service": "browser-rum-sdk",
        "telemetry": telemetry,
    })))
}

pub fn telemetry_error_event(message: &str) -> RumBatchEvent {
    RumBatchEvent::from(json_object(json!({
        "date": EVENT_DATE,
        "type": "telemetry",
        "service": "browser-rum-sdk",
        "telemetry": {"status": "error", "message": message},
    })))
}

pub fn telemetry_configuration_event() -> RumBatchEvent {
    RumBatchEvent::from(json_object(json!({
        "date": EVENT_DATE,
        "type": "telemetry",
        "service": "browser-rum-sdk",
        "telemetry": {"type": "configuration", "configuration": {"session_sample_rate": 100}},
    })))
}

pub fn logs_request(is_bridge: bool, events: Vec<LogsEvent>) -> IntakeRequest {
    IntakeRequest::Logs(LogsIntakeRequest { is_bridge, events })
}

pub fn rum_request(is_bridge: bool, events: Vec<RumBatchEvent>) -> IntakeRequest {
    IntakeRequest::Rum(RumIntakeRequest { is_bridge, events })
}

pub fn segment_metadata(view_id: &str, index_in_view: u64) -> SegmentMetadata {
    SegmentMetadata {
        application: EntityRef::new("app-1"),
        session: EntityRef::new("session-1"),
        view: EntityRef::new(view_id),
        start: EVENT_DATE,
        end: EVENT_DATE + 1_000,
        creation_reason: if index_in_view == 0 {
            "init".to_string()
        } else {
            "segment_duration_limit".to_string()
        },
        records_count: 1,
        has_full_snapshot: index_in_view == 0,
        index_in_view,
        source: "browser".to_string(),
    }
}

pub fn browser_segment(view_id: &str, index_in_view: u64) -> BrowserSegment {
    BrowserSegment {
        metadata: segment_metadata(view_id, index_in_view),
        records: vec![json!({
            "type": 4,
            "timestamp": EVENT_DATE,
            "data": {"width": 800, "height": 600},
        })],
        extra: JsonObject::new(),
    }
}

pub fn replay_request(segment: BrowserSegment) -> IntakeRequest {
    let metadata = SegmentMetadataAndSizes {
        metadata: segment.metadata.clone(),
        raw_segment_size: 512,
        compressed_segment_size: 256,
        extra: JsonObject::new(),
    };
    IntakeRequest::Replay(ReplayIntakeRequest {
        is_bridge: false,
        segment,
        metadata,
        filename: "segment".to_string(),
        encoding: "binary".to_string(),
        mimetype: "application/octet-stream".to_string(),
    })
}

/// Splits a newline-delimited JSON body into event objects. Blank lines are skipped.
pub fn decode_ndjson(body: &[u8]) -> Result<Vec<JsonObject>> {
    let text = std::str::from_utf8(body).context("intake body is not UTF-8")?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str::<JsonObject>(line)
                .with_context(|| format!("invalid intake event line: {line}"))
        })
        .collect()
}

/// Mock collection endpoint accepting `POST /api/v2/{logs,rum,replay}`.
///
/// Bodies are expected already uncompressed: logs and RUM as NDJSON, replay
/// as the JSON form of [`ReplayIntakeRequest`]. Requests received over HTTP
/// are never bridged.
pub struct MockIntake {
    server: MockServer,
    /// Count of received requests already pushed. Held across the whole
    /// push loop so concurrent flushes never forward the same request twice.
    forwarded: Mutex<usize>,
}

impl MockIntake {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/api/v2/(logs|rum|replay)$"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;
        Self {
            server,
            forwarded: Mutex::new(0),
        }
    }

    pub fn endpoint(&self, intake: IntakeType) -> String {
        format!("{}/api/v2/{intake}", self.server.uri())
    }

    /// Decodes requests received since the last call and pushes them in arrival order.
    pub async fn flush_into(&self, registry: &SharedIntakeRegistry) -> Result<usize> {
        let received = self
            .server
            .received_requests()
            .await
            .context("mock intake is not recording requests")?;
        let mut forwarded = self
            .forwarded
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let fresh = received.get(*forwarded..).unwrap_or_default();
        for request in fresh {
            registry.push(decode_request(request)?);
            *forwarded += 1;
        }
        Ok(fresh.len())
    }
}

fn decode_request(request: &Request) -> Result<IntakeRequest> {
    let intake = request.url.path().rsplit('/').next().unwrap_or_default();
    match intake {
        "logs" => {
            let events = decode_ndjson(&request.body)?
                .into_iter()
                .map(LogsEvent::new)
                .collect();
            Ok(logs_request(false, events))
        }
        "rum" => {
            let events = decode_ndjson(&request.body)?
                .into_iter()
                .map(RumBatchEvent::from)
                .collect();
            Ok(rum_request(false, events))
        }
        "replay" => {
            let replay: ReplayIntakeRequest =
                serde_json::from_slice(&request.body).context("invalid replay body")?;
            Ok(IntakeRequest::Replay(replay))
        }
        other => Err(anyhow!("unexpected intake path segment {other:?}")),
    }
}
