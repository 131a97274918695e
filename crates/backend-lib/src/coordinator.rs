// ============================
// crates/backend-lib/src/coordinator.rs
// ============================
//! The signaling coordinator actor.
//!
//! Every inbound event — connection open/close, parsed client message,
//! invitation timer fire — is funneled into one unbounded queue and
//! consumed by a single task, so each operation runs to completion before
//! the next is handled. That serialization is what makes the stale-match
//! no-op checks in accept/reject/timeout sufficient: for one appointment
//! the first terminal transition processed wins and later ones find no
//! live session. The actor exclusively owns the presence directory,
//! invitation table, room memberships, connection registry and timeout
//! scheduler; nothing else holds a reference to them.

use crate::error::AppError;
use crate::invitations::{InvitationTable, InviteState};
use crate::messages::{ClientMessage, ServerMessage};
use crate::metrics as keys;
use crate::notify::CallNotifier;
use crate::presence::{PresenceDirectory, Unregistered};
use crate::registry::ConnectionRegistry;
use crate::rooms::RoomBroadcaster;
use crate::timeout::TimeoutScheduler;
use consult_common::{AppointmentId, ConnId, RoomId, SpecialistId, SpecialistProfile};
use metrics::{counter, gauge};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Message sent *into* the actor
#[derive(Debug)]
pub enum CoordinatorMsg {
    Connected {
        conn_id: ConnId,
        tx: mpsc::UnboundedSender<ServerMessage>,
    },
    Disconnected {
        conn_id: ConnId,
    },
    Client {
        conn_id: ConnId,
        msg: ClientMessage,
    },
    /// Emitted by the timeout scheduler, never by a client.
    InviteTimedOut {
        appointment_id: AppointmentId,
        epoch: u64,
    },
    OnlineSpecialists {
        resp_tx: mpsc::UnboundedSender<Vec<SpecialistProfile>>,
    },
    IsBusy {
        specialist_id: SpecialistId,
        resp_tx: mpsc::UnboundedSender<bool>,
    },
    LiveInvitations {
        resp_tx: mpsc::UnboundedSender<usize>,
    },
}

/// Handle that the transport layer and tests keep: the actor's command
/// channel.
#[derive(Clone)]
pub struct CoordinatorHandle {
    cmd_tx: mpsc::UnboundedSender<CoordinatorMsg>,
}

impl CoordinatorHandle {
    pub fn connect(
        &self,
        conn_id: ConnId,
        tx: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<(), AppError> {
        self.cmd_tx.send(CoordinatorMsg::Connected { conn_id, tx })?;
        Ok(())
    }

    pub fn disconnect(&self, conn_id: ConnId) -> Result<(), AppError> {
        self.cmd_tx.send(CoordinatorMsg::Disconnected { conn_id })?;
        Ok(())
    }

    pub fn client_message(&self, conn_id: ConnId, msg: ClientMessage) -> Result<(), AppError> {
        self.cmd_tx.send(CoordinatorMsg::Client { conn_id, msg })?;
        Ok(())
    }

    /// Current availability snapshot; answers on-demand presence queries
    /// from HTTP surfaces and tests.
    pub async fn online_specialists(&self) -> Result<Vec<SpecialistProfile>, AppError> {
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        self.cmd_tx.send(CoordinatorMsg::OnlineSpecialists { resp_tx })?;
        resp_rx
            .recv()
            .await
            .ok_or_else(|| AppError::Internal("Failed to receive response".to_string()))
    }

    pub async fn is_busy(&self, specialist_id: SpecialistId) -> Result<bool, AppError> {
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        self.cmd_tx.send(CoordinatorMsg::IsBusy {
            specialist_id,
            resp_tx,
        })?;
        resp_rx
            .recv()
            .await
            .ok_or_else(|| AppError::Internal("Failed to receive response".to_string()))
    }

    pub async fn live_invitations(&self) -> Result<usize, AppError> {
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        self.cmd_tx.send(CoordinatorMsg::LiveInvitations { resp_tx })?;
        resp_rx
            .recv()
            .await
            .ok_or_else(|| AppError::Internal("Failed to receive response".to_string()))
    }
}

pub struct Coordinator {
    registry: ConnectionRegistry,
    presence: PresenceDirectory,
    rooms: RoomBroadcaster,
    invitations: InvitationTable,
    timeouts: TimeoutScheduler<AppointmentId, CoordinatorMsg>,
    notifier: Arc<dyn CallNotifier>,
    invite_timeout: Duration,
}

impl Coordinator {
    pub fn new(
        invite_timeout: Duration,
        notifier: Arc<dyn CallNotifier>,
        fire_tx: mpsc::UnboundedSender<CoordinatorMsg>,
    ) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            presence: PresenceDirectory::new(),
            rooms: RoomBroadcaster::new(),
            invitations: InvitationTable::new(),
            timeouts: TimeoutScheduler::new(fire_tx),
            notifier,
            invite_timeout,
        }
    }

    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<CoordinatorMsg>) {
        while let Some(msg) = rx.recv().await {
            match msg {
                CoordinatorMsg::Connected { conn_id, tx } => {
                    self.registry.register(conn_id, tx);
                },
                CoordinatorMsg::Disconnected { conn_id } => {
                    self.handle_disconnect(conn_id);
                },
                CoordinatorMsg::Client { conn_id, msg } => {
                    self.handle_client(conn_id, msg);
                },
                CoordinatorMsg::InviteTimedOut {
                    appointment_id,
                    epoch,
                } => {
                    self.handle_timeout_fired(&appointment_id, epoch);
                },
                CoordinatorMsg::OnlineSpecialists { resp_tx } => {
                    let _ = resp_tx.send(self.presence.available_snapshot());
                },
                CoordinatorMsg::IsBusy {
                    specialist_id,
                    resp_tx,
                } => {
                    let _ = resp_tx.send(self.invitations.is_busy(&specialist_id));
                },
                CoordinatorMsg::LiveInvitations { resp_tx } => {
                    let _ = resp_tx.send(self.invitations.live_count());
                },
            }
        }
    }

    pub fn handle_client(&mut self, conn_id: ConnId, msg: ClientMessage) {
        match msg {
            ClientMessage::SpecialistOnline {
                specialist_id,
                profile,
            } => self.handle_specialist_online(conn_id, specialist_id, profile),
            ClientMessage::InviteSpecialistToCall {
                specialist_id,
                appointment_id,
            } => self.handle_invite(conn_id, specialist_id, appointment_id),
            ClientMessage::AcceptCall {
                specialist_id,
                appointment_id,
            } => self.handle_accept(specialist_id, appointment_id),
            ClientMessage::RejectCall {
                specialist_id,
                appointment_id,
            } => self.handle_reject(specialist_id, appointment_id),
            ClientMessage::GetOnlineSpecialists {} => {
                self.registry.send(
                    conn_id,
                    ServerMessage::UpdateSpecialists {
                        specialists: self.presence.available_snapshot(),
                    },
                );
            },
            ClientMessage::SessionEnded {
                specialist_id,
                appointment_id,
            } => self.handle_session_ended(conn_id, specialist_id, appointment_id),
        }
    }

    fn handle_specialist_online(
        &mut self,
        conn_id: ConnId,
        specialist_id: SpecialistId,
        profile: SpecialistProfile,
    ) {
        info!(%specialist_id, %conn_id, "specialist online");
        self.presence.register_online(specialist_id, profile, conn_id);
        self.broadcast_snapshot();
    }

    fn handle_invite(
        &mut self,
        inviter: ConnId,
        specialist_id: SpecialistId,
        appointment_id: AppointmentId,
    ) {
        match self.admit_invite(inviter, specialist_id, appointment_id) {
            Ok(()) => {},
            Err(AppError::SpecialistBusy {
                appointment_id,
                specialist_id,
            }) => {
                counter!(keys::INVITES_REJECTED_BUSY).increment(1);
                debug!(%specialist_id, %appointment_id, "invite refused: specialist busy");
                self.registry.send(
                    inviter,
                    ServerMessage::SpecialistBusy {
                        appointment_id,
                        specialist_id,
                    },
                );
            },
            Err(AppError::SpecialistUnavailable {
                appointment_id,
                specialist_id,
            }) => {
                counter!(keys::INVITES_REJECTED_OFFLINE).increment(1);
                debug!(%specialist_id, %appointment_id, "invite refused: specialist offline");
                self.registry.send(
                    inviter,
                    ServerMessage::SpecialistUnavailable {
                        appointment_id,
                        specialist_id,
                    },
                );
            },
            Err(err) => {
                warn!(error = %err, "invite failed");
            },
        }
    }

    /// The whole admission sequence — busy check, session creation, room
    /// joins, timer arming — runs inside one actor turn, so it is atomic
    /// with respect to every other event touching the same appointment or
    /// specialist.
    fn admit_invite(
        &mut self,
        inviter: ConnId,
        specialist_id: SpecialistId,
        appointment_id: AppointmentId,
    ) -> Result<(), AppError> {
        if self.invitations.is_busy(&specialist_id) {
            return Err(AppError::SpecialistBusy {
                appointment_id,
                specialist_id,
            });
        }

        // The invitation busy set only covers the invited window; an
        // accepted call keeps the specialist refusable until session-ended.
        if self.presence.is_in_call(&specialist_id) {
            return Err(AppError::SpecialistBusy {
                appointment_id,
                specialist_id,
            });
        }

        let specialist_conns = self.presence.resolve_connections(&specialist_id);
        if specialist_conns.is_empty() {
            return Err(AppError::SpecialistUnavailable {
                appointment_id,
                specialist_id,
            });
        }

        if let Some(superseded) =
            self.invitations
                .begin_invite(appointment_id.clone(), specialist_id.clone(), inviter)?
        {
            // A live session under the same key is replaced atomically: its
            // timer is disarmed here and its busy flag was already cleared.
            self.timeouts.cancel(&superseded.appointment_id);
            self.rooms.remove_room(&superseded.room_id);
            gauge!(keys::INVITES_PENDING).decrement(1.0);
            info!(
                appointment_id = %superseded.appointment_id,
                "superseded live invitation for re-invited appointment"
            );
        }

        let room_id = appointment_id.room_id();
        self.rooms.join(inviter, room_id.clone());
        for conn in &specialist_conns {
            self.rooms.join(*conn, room_id.clone());
            self.registry.send(
                *conn,
                ServerMessage::IncomingCall {
                    appointment_id: appointment_id.clone(),
                },
            );
        }

        let timer_key = appointment_id.clone();
        self.timeouts
            .arm(timer_key.clone(), self.invite_timeout, move |epoch| {
                CoordinatorMsg::InviteTimedOut {
                    appointment_id: timer_key,
                    epoch,
                }
            });

        // Best-effort push notification; its outcome never gates the invite.
        let notifier = Arc::clone(&self.notifier);
        let notify_specialist = specialist_id.clone();
        let notify_appointment = appointment_id.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier
                .notify_incoming_call(&notify_specialist, &notify_appointment)
                .await
            {
                warn!(
                    specialist_id = %notify_specialist,
                    error = %err,
                    "push notification failed"
                );
            }
        });

        counter!(keys::INVITES_SENT).increment(1);
        gauge!(keys::INVITES_PENDING).increment(1.0);
        info!(%specialist_id, %appointment_id, "invitation sent");
        Ok(())
    }

    fn handle_accept(&mut self, specialist_id: SpecialistId, appointment_id: AppointmentId) {
        let Some(session) =
            self.invitations
                .take_matching(&appointment_id, &specialist_id, InviteState::Accepted)
        else {
            // Stale or duplicate client message; also covers an accept from
            // a specialist the invitation never targeted.
            debug!(%specialist_id, %appointment_id, "ignoring accept without matching invitation");
            return;
        };

        self.timeouts.cancel(&appointment_id);
        self.presence.mark_in_call(&specialist_id);
        for conn in self.presence.resolve_connections(&specialist_id) {
            self.rooms.join(conn, session.room_id.clone());
        }
        self.broadcast_room(
            &session.room_id,
            ServerMessage::CallAccepted {
                appointment_id,
                specialist_id: specialist_id.clone(),
            },
        );
        // The specialist drops out of the availability snapshot for the
        // duration of the call. The room stays up until session-ended.
        self.broadcast_snapshot();

        counter!(keys::CALLS_ACCEPTED).increment(1);
        gauge!(keys::INVITES_PENDING).decrement(1.0);
        info!(%specialist_id, appointment_id = %session.appointment_id, "call accepted");
    }

    fn handle_reject(&mut self, specialist_id: SpecialistId, appointment_id: AppointmentId) {
        let Some(session) =
            self.invitations
                .take_matching(&appointment_id, &specialist_id, InviteState::Rejected)
        else {
            debug!(%specialist_id, %appointment_id, "ignoring reject without matching invitation");
            return;
        };

        self.timeouts.cancel(&appointment_id);
        self.broadcast_room(
            &session.room_id,
            ServerMessage::CallRejected {
                appointment_id,
                specialist_id: specialist_id.clone(),
            },
        );
        self.rooms.remove_room(&session.room_id);

        counter!(keys::CALLS_REJECTED).increment(1);
        gauge!(keys::INVITES_PENDING).decrement(1.0);
        info!(%specialist_id, appointment_id = %session.appointment_id, "call rejected");
    }

    fn handle_timeout_fired(&mut self, appointment_id: &AppointmentId, epoch: u64) {
        // A fire racing a just-processed accept/reject/cancel arrives here
        // with a retired epoch and is dropped.
        if !self.timeouts.acknowledge(appointment_id, epoch) {
            debug!(%appointment_id, "ignoring stale invitation timer");
            return;
        }
        let Some(session) = self.invitations.take(appointment_id, InviteState::TimedOut) else {
            return;
        };

        self.broadcast_room(
            &session.room_id,
            ServerMessage::CallTimeout {
                appointment_id: session.appointment_id.clone(),
                specialist_id: session.invited_specialist_id.clone(),
            },
        );
        self.rooms.remove_room(&session.room_id);

        counter!(keys::CALLS_TIMED_OUT).increment(1);
        gauge!(keys::INVITES_PENDING).decrement(1.0);
        info!(
            appointment_id = %session.appointment_id,
            specialist_id = %session.invited_specialist_id,
            "invitation timed out"
        );
    }

    fn handle_session_ended(
        &mut self,
        conn_id: ConnId,
        specialist_id: SpecialistId,
        appointment_id: AppointmentId,
    ) {
        info!(%specialist_id, %appointment_id, "session ended, specialist available again");
        self.presence.mark_available(&specialist_id, conn_id);

        let room_id = appointment_id.room_id();
        self.broadcast_room(
            &room_id,
            ServerMessage::SessionEnded {
                appointment_id,
                specialist_id,
            },
        );
        self.rooms.remove_room(&room_id);
        self.broadcast_snapshot();
    }

    fn handle_disconnect(&mut self, conn_id: ConnId) {
        self.registry.remove(conn_id);

        // Invitations this connection initiated die with it.
        for session in self.invitations.take_for_inviter(conn_id) {
            self.timeouts.cancel(&session.appointment_id);
            self.broadcast_room(
                &session.room_id,
                ServerMessage::CallCancelled {
                    appointment_id: session.appointment_id.clone(),
                    specialist_id: session.invited_specialist_id.clone(),
                },
            );
            self.rooms.remove_room(&session.room_id);
            counter!(keys::CALLS_CANCELLED).increment(1);
            gauge!(keys::INVITES_PENDING).decrement(1.0);
            info!(
                appointment_id = %session.appointment_id,
                "invitation cancelled: inviter disconnected"
            );
        }

        self.rooms.leave_all(conn_id);

        if let Unregistered::FullyOffline(specialist_id) =
            self.presence.unregister_connection(conn_id)
        {
            info!(%specialist_id, "specialist fully offline");
            for session in self.invitations.take_for_specialist(&specialist_id) {
                self.timeouts.cancel(&session.appointment_id);
                self.broadcast_room(
                    &session.room_id,
                    ServerMessage::SpecialistDisconnected {
                        appointment_id: session.appointment_id.clone(),
                        specialist_id: specialist_id.clone(),
                    },
                );
                self.rooms.remove_room(&session.room_id);
                counter!(keys::CALLS_CANCELLED).increment(1);
                gauge!(keys::INVITES_PENDING).decrement(1.0);
            }
        }

        // The snapshot goes out whether or not an entity was removed.
        self.broadcast_snapshot();
    }

    fn broadcast_snapshot(&self) {
        self.registry.broadcast_all(&ServerMessage::UpdateSpecialists {
            specialists: self.presence.available_snapshot(),
        });
    }

    fn broadcast_room(&self, room_id: &RoomId, msg: ServerMessage) {
        // An empty or unknown room is a silent no-op.
        for conn in self.rooms.members(room_id) {
            self.registry.send(conn, msg.clone());
        }
    }
}

/// Spawn the coordinator and return its handle.
pub fn spawn_coordinator(
    invite_timeout: Duration,
    notifier: Arc<dyn CallNotifier>,
) -> CoordinatorHandle {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let coordinator = Coordinator::new(invite_timeout, notifier, cmd_tx.clone());
    tokio::spawn(coordinator.run(cmd_rx));
    CoordinatorHandle { cmd_tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoopNotifier;
    use serde_json::json;

    fn profile(id: &str) -> SpecialistProfile {
        SpecialistProfile {
            specialist_id: SpecialistId::new(id),
            details: json!({ "firstName": id }),
        }
    }

    fn setup() -> (Coordinator, mpsc::UnboundedReceiver<CoordinatorMsg>) {
        let (fire_tx, fire_rx) = mpsc::unbounded_channel();
        let coordinator = Coordinator::new(
            Duration::from_secs(30),
            Arc::new(NoopNotifier),
            fire_tx,
        );
        (coordinator, fire_rx)
    }

    fn register_specialist(
        coordinator: &mut Coordinator,
        id: &str,
    ) -> (ConnId, mpsc::UnboundedReceiver<ServerMessage>) {
        let conn = ConnId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        coordinator.registry.register(conn, tx);
        coordinator.handle_client(
            conn,
            ClientMessage::SpecialistOnline {
                specialist_id: SpecialistId::new(id),
                profile: profile(id),
            },
        );
        (conn, rx)
    }

    #[tokio::test]
    async fn invite_marks_specialist_busy_and_arms_timer() {
        let (mut coordinator, _fire_rx) = setup();
        let (_conn, _rx) = register_specialist(&mut coordinator, "s1");

        let inviter = ConnId::new();
        coordinator.handle_client(
            inviter,
            ClientMessage::InviteSpecialistToCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );

        assert!(coordinator.invitations.is_busy(&SpecialistId::new("s1")));
        assert!(coordinator.timeouts.is_armed(&AppointmentId::new("apt-1")));
    }

    #[tokio::test]
    async fn accept_clears_busy_and_disarms_timer() {
        let (mut coordinator, _fire_rx) = setup();
        let (conn, _rx) = register_specialist(&mut coordinator, "s1");

        coordinator.handle_client(
            ConnId::new(),
            ClientMessage::InviteSpecialistToCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );
        coordinator.handle_client(
            conn,
            ClientMessage::AcceptCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );

        assert!(!coordinator.invitations.is_busy(&SpecialistId::new("s1")));
        assert!(!coordinator.timeouts.is_armed(&AppointmentId::new("apt-1")));
        assert_eq!(coordinator.invitations.live_count(), 0);
        // In a call: hidden from the availability snapshot
        assert!(coordinator.presence.available_snapshot().is_empty());
    }

    #[tokio::test]
    async fn accept_from_wrong_specialist_is_a_noop() {
        let (mut coordinator, _fire_rx) = setup();
        let (_conn, _rx) = register_specialist(&mut coordinator, "s1");

        coordinator.handle_client(
            ConnId::new(),
            ClientMessage::InviteSpecialistToCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );
        coordinator.handle_client(
            ConnId::new(),
            ClientMessage::AcceptCall {
                specialist_id: SpecialistId::new("someone-else"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );

        assert!(coordinator.invitations.is_busy(&SpecialistId::new("s1")));
        assert!(coordinator.timeouts.is_armed(&AppointmentId::new("apt-1")));
    }

    #[tokio::test]
    async fn stale_timer_fire_does_not_touch_a_new_invitation() {
        let (mut coordinator, _fire_rx) = setup();
        let (conn, _rx) = register_specialist(&mut coordinator, "s1");

        coordinator.handle_client(
            ConnId::new(),
            ClientMessage::InviteSpecialistToCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );
        // Reject retires the timer, then a new invite rearms under the
        // same appointment key.
        coordinator.handle_client(
            conn,
            ClientMessage::RejectCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );
        coordinator.handle_client(
            ConnId::new(),
            ClientMessage::InviteSpecialistToCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );

        // A fire from the first invitation's timer carries a stale epoch.
        coordinator.handle_timeout_fired(&AppointmentId::new("apt-1"), 1);
        assert!(coordinator.invitations.is_busy(&SpecialistId::new("s1")));
        assert_eq!(coordinator.invitations.live_count(), 1);
    }

    #[tokio::test]
    async fn mid_call_specialist_refuses_new_invites() {
        let (mut coordinator, _fire_rx) = setup();
        let (conn, _rx) = register_specialist(&mut coordinator, "s1");

        coordinator.handle_client(
            ConnId::new(),
            ClientMessage::InviteSpecialistToCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );
        coordinator.handle_client(
            conn,
            ClientMessage::AcceptCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );

        // Accept removed the session and cleared the busy flag; the
        // in-call marker alone must refuse the fresh invitation.
        let inviter = ConnId::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        coordinator.registry.register(inviter, tx);
        coordinator.handle_client(
            inviter,
            ClientMessage::InviteSpecialistToCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-2"),
            },
        );

        assert_eq!(coordinator.invitations.live_count(), 0);
        assert!(!coordinator.timeouts.is_armed(&AppointmentId::new("apt-2")));
        let mut saw_busy = false;
        while let Ok(msg) = rx.try_recv() {
            if matches!(msg, ServerMessage::SpecialistBusy { .. }) {
                saw_busy = true;
            }
        }
        assert!(saw_busy);
    }

    #[tokio::test]
    async fn fault_in_one_appointment_leaves_others_untouched() {
        let (mut coordinator, _fire_rx) = setup();
        let (_c1, _rx1) = register_specialist(&mut coordinator, "s1");
        let (_c2, _rx2) = register_specialist(&mut coordinator, "s2");

        coordinator.handle_client(
            ConnId::new(),
            ClientMessage::InviteSpecialistToCall {
                specialist_id: SpecialistId::new("s1"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );
        coordinator.handle_client(
            ConnId::new(),
            ClientMessage::InviteSpecialistToCall {
                specialist_id: SpecialistId::new("s2"),
                appointment_id: AppointmentId::new("apt-2"),
            },
        );

        // A stale accept against apt-1 must not disturb apt-2.
        coordinator.handle_client(
            ConnId::new(),
            ClientMessage::AcceptCall {
                specialist_id: SpecialistId::new("nobody"),
                appointment_id: AppointmentId::new("apt-1"),
            },
        );

        assert!(coordinator.invitations.is_busy(&SpecialistId::new("s1")));
        assert!(coordinator.invitations.is_busy(&SpecialistId::new("s2")));
        assert_eq!(coordinator.invitations.live_count(), 2);
    }
}
