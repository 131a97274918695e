// ================
// crates/backend-lib/src/messages.rs
// ================
//! Wire protocol for the consultation signaling socket.
//!
//! Both directions are closed tagged enums so payload shapes are validated
//! by serde at the boundary before anything reaches the coordinator. Event
//! names are kebab-case on the wire, fields camelCase, matching what the
//! web clients emit.

use consult_common::{AppointmentId, SpecialistId, SpecialistProfile};
use serde::{Deserialize, Serialize};

/// Messages a client may send over the socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// A specialist's tab registers (or re-registers) as online.
    SpecialistOnline {
        specialist_id: SpecialistId,
        profile: SpecialistProfile,
    },
    /// A patient invites a specialist to a call for one appointment.
    InviteSpecialistToCall {
        specialist_id: SpecialistId,
        appointment_id: AppointmentId,
    },
    AcceptCall {
        specialist_id: SpecialistId,
        appointment_id: AppointmentId,
    },
    RejectCall {
        specialist_id: SpecialistId,
        appointment_id: AppointmentId,
    },
    /// On-demand presence query; answered with `update-specialists` to the
    /// requesting connection only.
    GetOnlineSpecialists {},
    /// The call for this appointment is over; the specialist becomes
    /// available again.
    SessionEnded {
        specialist_id: SpecialistId,
        appointment_id: AppointmentId,
    },
}

/// Messages the coordinator sends to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Full availability snapshot, broadcast to every connection on any
    /// presence change.
    UpdateSpecialists { specialists: Vec<SpecialistProfile> },
    /// Sent to every connection of the invited specialist.
    IncomingCall { appointment_id: AppointmentId },
    /// Inviter only: the specialist already has an outstanding invitation.
    SpecialistBusy {
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
    },
    /// Inviter only: the specialist has no live connections.
    SpecialistUnavailable {
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
    },
    CallAccepted {
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
    },
    CallRejected {
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
    },
    CallTimeout {
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
    },
    /// The invited specialist's last connection dropped while the
    /// invitation was outstanding.
    SpecialistDisconnected {
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
    },
    /// The inviter's connection dropped while the invitation was
    /// outstanding.
    CallCancelled {
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
    },
    /// The active call for this appointment ended.
    SessionEnded {
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
    },
    /// Sender only: the frame could not be parsed as a known message.
    MalformedMessage { error: String },
}
