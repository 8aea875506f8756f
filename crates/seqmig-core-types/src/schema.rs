//! Field and event names carried by structured log events
//!
//! `tracing` macros need literal field names, so emitters spell these out;
//! readers of captured events look fields up through these constants.

// Present on every operation event
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Migration identifiers
pub const FIELD_MIGRATION: &str = "migration";
pub const FIELD_TRANSACTIONAL: &str = "transactional";

// Collection sizes
pub const FIELD_PLAN_LEN: &str = "plan_len";
pub const FIELD_APPLIED_LEN: &str = "applied_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERROR: &str = "error";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
