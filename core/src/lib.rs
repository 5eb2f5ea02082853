//! Capture and classification of browser intake requests for end-to-end tests.
//!
//! A transport decoder pushes each decoded delivery (logs, RUM or session
//! replay) into an [`IntakeRegistry`]; scenario assertions read typed views
//! back out. The registry never decodes wire payloads itself.

pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod shared;

pub use config::RegistryConfig;
pub use config::ReplayBridgePolicy;
pub use error::ConfigError;
pub use error::RegistryError;
pub use model::BrowserSegment;
pub use model::EntityRef;
pub use model::EventPayload;
pub use model::IntakeRequest;
pub use model::IntakeType;
pub use model::JsonObject;
pub use model::LogsEvent;
pub use model::LogsIntakeRequest;
pub use model::ReplayIntakeRequest;
pub use model::RumBatchEvent;
pub use model::RumEvent;
pub use model::RumEventType;
pub use model::RumIntakeRequest;
pub use model::SegmentMetadata;
pub use model::SegmentMetadataAndSizes;
pub use model::TelemetryEvent;
pub use registry::IntakeRegistry;
pub use shared::SharedIntakeRegistry;
