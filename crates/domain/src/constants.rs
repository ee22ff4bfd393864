//! Sink constants
//!
//! Centralized location for the fixed values of the EventBridge sink. Values
//! that appear in envelopes, subjects and endpoints are part of the routing
//! contract seen by bus consumers and must not change.

// Sink identity
pub const SINK_NAME: &str = "EventBridgeSink";
pub const DEFAULT_BUS_NAME: &str = "default";

// Envelope fields
pub const EVENT_SOURCE: &str = "acs.cs";
pub const EVENT_TYPE: &str = "cs:k8s:K8s-event-via-npd";
pub const EVENT_CONTENT_TYPE: &str = "application/json";
pub const CLOUD_EVENTS_SPEC_VERSION: &str = "1.0";
pub const BUS_NAME_EXTENSION: &str = "aliyuneventbusname";

// Subject grammar
pub const SUBJECT_SCHEME: &str = "acs:cs";
pub const VERSION_UNKNOWN_SUFFIX: &str = "/versionUnknown";

// Endpoint grammar: {account}.eventbridge.{region}-vpc.{domain}
pub const CLOUD_DOMAIN: &str = "aliyuncs.com";

// Batching
pub const MAX_BATCH_SIZE: usize = 16;

// Credential freshness
pub const CREDENTIAL_REFRESH_MARGIN_SECS: i64 = 600;

// Transport defaults
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
