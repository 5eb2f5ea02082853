//! Append-only store of decoded intake requests with typed views.
//!
//! Views are recomputed on every call: requests keep arriving between calls
//! and a cached view would go stale. Flattened views concatenate events in
//! push order, then in each request's own order.

use crate::classify::is_rum_action_event;
use crate::classify::is_rum_error_event;
use crate::classify::is_rum_resource_event;
use crate::classify::is_rum_view_event;
use crate::classify::is_telemetry_configuration_event;
use crate::classify::is_telemetry_error_event;
use crate::config::RegistryConfig;
use crate::config::ReplayBridgePolicy;
use crate::error::RegistryError;
use crate::model::BrowserSegment;
use crate::model::IntakeRequest;
use crate::model::LogsEvent;
use crate::model::LogsIntakeRequest;
use crate::model::ReplayIntakeRequest;
use crate::model::RumBatchEvent;
use crate::model::RumEvent;
use crate::model::RumIntakeRequest;
use crate::model::TelemetryEvent;

#[derive(Debug, Clone, Default)]
pub struct IntakeRegistry {
    requests: Vec<IntakeRequest>,
    config: RegistryConfig,
}

impl IntakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            requests: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Appends a request. Never fails; a bridged replay request is stored
    /// and, unless the policy is `accept`, logged.
    pub fn push(&mut self, request: IntakeRequest) {
        if let Err(err) = self.check_transport(&request) {
            tracing::warn!(error = %err, "Storing intake request with unexpected transport");
        }
        self.store(request);
    }

    /// Appends a request, refusing it when the replay bridge policy is `reject`.
    pub fn try_push(&mut self, request: IntakeRequest) -> Result<(), RegistryError> {
        if let Err(err) = self.check_transport(&request) {
            if self.config.replay_bridge_policy == ReplayBridgePolicy::Reject {
                tracing::warn!(error = %err, "Refusing intake request");
                return Err(err);
            }
            tracing::warn!(error = %err, "Storing intake request with unexpected transport");
        }
        self.store(request);
        Ok(())
    }

    fn check_transport(&self, request: &IntakeRequest) -> Result<(), RegistryError> {
        if self.config.replay_bridge_policy == ReplayBridgePolicy::Accept {
            return Ok(());
        }
        match request {
            IntakeRequest::Replay(replay) if replay.is_bridge => Err(RegistryError::BridgedReplay {
                filename: replay.filename.clone(),
            }),
            IntakeRequest::Logs(_) | IntakeRequest::Rum(_) | IntakeRequest::Replay(_) => Ok(()),
        }
    }

    fn store(&mut self, request: IntakeRequest) {
        tracing::debug!(
            intake_type = %request.intake_type(),
            is_bridge = request.is_bridge(),
            event_count = request.event_count(),
            stored = self.requests.len() + 1,
            "Intake request stored"
        );
        self.requests.push(request);
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Drops every stored request. Calling it on an empty registry is a no-op.
    pub fn reset(&mut self) {
        if self.requests.is_empty() {
            return;
        }
        tracing::debug!(dropped = self.requests.len(), "Intake registry reset");
        self.requests.clear();
    }

    /// True when every stored request came over the bridge; vacuously true when empty.
    pub fn has_only_bridge_requests(&self) -> bool {
        self.requests.iter().all(IntakeRequest::is_bridge)
    }

    pub fn requests(&self) -> &[IntakeRequest] {
        &self.requests
    }

    //
    // Logs
    //

    pub fn logs_requests(&self) -> Vec<&LogsIntakeRequest> {
        self.iter_logs_requests().collect()
    }

    pub fn logs_events(&self) -> Vec<&LogsEvent> {
        self.iter_logs_requests()
            .flat_map(|request| request.events.iter())
            .collect()
    }

    fn iter_logs_requests(&self) -> impl Iterator<Item = &LogsIntakeRequest> {
        self.requests.iter().filter_map(IntakeRequest::as_logs)
    }

    //
    // RUM
    //

    pub fn rum_requests(&self) -> Vec<&RumIntakeRequest> {
        self.iter_rum_requests().collect()
    }

    /// RUM side of every batch; telemetry events are excluded.
    pub fn rum_events(&self) -> Vec<&RumEvent> {
        self.iter_rum_events().collect()
    }

    pub fn rum_action_events(&self) -> Vec<&RumEvent> {
        self.iter_rum_events()
            .filter(|event| is_rum_action_event(event))
            .collect()
    }

    pub fn rum_error_events(&self) -> Vec<&RumEvent> {
        self.iter_rum_events()
            .filter(|event| is_rum_error_event(event))
            .collect()
    }

    pub fn rum_resource_events(&self) -> Vec<&RumEvent> {
        self.iter_rum_events()
            .filter(|event| is_rum_resource_event(event))
            .collect()
    }

    pub fn rum_view_events(&self) -> Vec<&RumEvent> {
        self.iter_rum_events()
            .filter(|event| is_rum_view_event(event))
            .collect()
    }

    fn iter_rum_requests(&self) -> impl Iterator<Item = &RumIntakeRequest> {
        self.requests.iter().filter_map(IntakeRequest::as_rum)
    }

    fn iter_rum_events(&self) -> impl Iterator<Item = &RumEvent> {
        self.iter_rum_requests()
            .flat_map(|request| request.events.iter())
            .filter_map(RumBatchEvent::as_rum)
    }

    //
    // Telemetry
    //

    pub fn telemetry_events(&self) -> Vec<&TelemetryEvent> {
        self.iter_telemetry_events().collect()
    }

    pub fn telemetry_error_events(&self) -> Vec<&TelemetryEvent> {
        self.iter_telemetry_events()
            .filter(|event| is_telemetry_error_event(event))
            .collect()
    }

    pub fn telemetry_configuration_events(&self) -> Vec<&TelemetryEvent> {
        self.iter_telemetry_events()
            .filter(|event| is_telemetry_configuration_event(event))
            .collect()
    }

    fn iter_telemetry_events(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.iter_rum_requests()
            .flat_map(|request| request.events.iter())
            .filter_map(RumBatchEvent::as_telemetry)
    }

    //
    // Replay
    //

    pub fn replay_requests(&self) -> Vec<&ReplayIntakeRequest> {
        self.iter_replay_requests().collect()
    }

    pub fn replay_segments(&self) -> Vec<&BrowserSegment> {
        self.iter_replay_requests()
            .map(|request| &request.segment)
            .collect()
    }

    fn iter_replay_requests(&self) -> impl Iterator<Item = &ReplayIntakeRequest> {
        self.requests.iter().filter_map(IntakeRequest::as_replay)
    }
}
