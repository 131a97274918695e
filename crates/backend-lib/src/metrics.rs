// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for Prometheus metric keys
pub const WS_CONNECTION: &str = "ws.connection";
pub const WS_DISCONNECTION: &str = "ws.disconnection";
pub const WS_ACTIVE: &str = "ws.active";
pub const INVITES_SENT: &str = "invite.sent";
pub const INVITES_REJECTED_BUSY: &str = "invite.rejected_busy";
pub const INVITES_REJECTED_OFFLINE: &str = "invite.rejected_offline";
pub const CALLS_ACCEPTED: &str = "call.accepted";
pub const CALLS_REJECTED: &str = "call.rejected";
pub const CALLS_TIMED_OUT: &str = "call.timed_out";
pub const CALLS_CANCELLED: &str = "call.cancelled";
pub const INVITES_PENDING: &str = "invite.pending";
