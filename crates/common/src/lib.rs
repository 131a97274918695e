// ================
// common/src/lib.rs
// ================
//! Common types shared between the consultation signaling server and its
//! clients: stable identifiers for specialists, appointments, rooms and
//! connections, and the specialist display profile carried in presence
//! snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity key of a specialist, as issued by the surrounding
/// booking system. Opaque to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecialistId(pub String);

impl SpecialistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecialistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correlation key for one call attempt. Assumed externally unique per
/// attempt; supplied by the inviting client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub String);

impl AppointmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Broadcast channel identifier for this appointment's call attempt,
    /// stable for the life of the invitation.
    pub fn room_id(&self) -> RoomId {
        RoomId(format!("appointment_{}", self.0))
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a broadcast channel grouping the connections involved in
/// one call attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned identifier of one live transport connection. A logical
/// actor (a specialist open in several browser tabs) may own many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnId(Uuid);

impl ConnId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display payload a specialist's client supplies when it registers as
/// online. Everything beyond the id is opaque to the coordinator and
/// relayed as-is in presence snapshots; last writer wins on
/// re-registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistProfile {
    pub specialist_id: SpecialistId,
    #[serde(flatten)]
    pub details: serde_json::Value,
}
