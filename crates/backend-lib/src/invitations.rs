// ============================
// crates/backend-lib/src/invitations.rs
// ============================
//! Invitation table: per-appointment call-attempt state plus the global
//! specialist busy set. `Invited` is the only live state; every terminal
//! transition removes the session from the table in the same step that
//! clears the busy flag, which keeps the invariant that a specialist is
//! busy iff a live invitation targets them.

use crate::error::AppError;
use consult_common::{AppointmentId, ConnId, RoomId, SpecialistId};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteState {
    Invited,
    Accepted,
    Rejected,
    TimedOut,
    Cancelled,
}

#[derive(Debug)]
pub struct InvitationSession {
    pub appointment_id: AppointmentId,
    pub invited_specialist_id: SpecialistId,
    pub inviter_conn_id: ConnId,
    pub room_id: RoomId,
    pub state: InviteState,
    /// Diagnostics only; expiry is owned by the scheduled timeout, never by
    /// wall-clock comparison.
    pub created_at: Instant,
}

#[derive(Default)]
pub struct InvitationTable {
    sessions: HashMap<AppointmentId, InvitationSession>,
    busy: HashSet<SpecialistId>,
}

impl InvitationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a new invitation. Fails with `SpecialistBusy` when the target
    /// already has a live invitation; the busy check runs first, so a
    /// re-invite naming the same specialist under the same key is refused
    /// too. A live session under the same appointment key targeting a
    /// *different*, free specialist is superseded: it is returned so the
    /// caller can disarm its timer, and its busy flag is cleared before
    /// the new session takes the slot.
    pub fn begin_invite(
        &mut self,
        appointment_id: AppointmentId,
        specialist_id: SpecialistId,
        inviter_conn_id: ConnId,
    ) -> Result<Option<InvitationSession>, AppError> {
        if self.busy.contains(&specialist_id) {
            return Err(AppError::SpecialistBusy {
                appointment_id,
                specialist_id,
            });
        }

        let superseded = self.remove(&appointment_id).map(|mut old| {
            old.state = InviteState::Cancelled;
            old
        });

        let room_id = appointment_id.room_id();
        self.busy.insert(specialist_id.clone());
        self.sessions.insert(
            appointment_id.clone(),
            InvitationSession {
                appointment_id,
                invited_specialist_id: specialist_id,
                inviter_conn_id,
                room_id,
                state: InviteState::Invited,
                created_at: Instant::now(),
            },
        );

        Ok(superseded)
    }

    /// Resolve the live session for `appointment_id` if its target matches
    /// `specialist_id`, removing it and clearing the busy flag. Used by
    /// accept and reject; a missing session or mismatched target yields
    /// `None`, which callers treat as a stale or unauthorized message.
    pub fn take_matching(
        &mut self,
        appointment_id: &AppointmentId,
        specialist_id: &SpecialistId,
        state: InviteState,
    ) -> Option<InvitationSession> {
        let matches = self
            .sessions
            .get(appointment_id)
            .is_some_and(|s| &s.invited_specialist_id == specialist_id);
        if !matches {
            return None;
        }
        self.remove(appointment_id).map(|mut session| {
            session.state = state;
            session
        })
    }

    /// Resolve the live session for `appointment_id` regardless of target.
    /// Used by the timeout and inviter-disconnect paths.
    pub fn take(
        &mut self,
        appointment_id: &AppointmentId,
        state: InviteState,
    ) -> Option<InvitationSession> {
        self.remove(appointment_id).map(|mut session| {
            session.state = state;
            session
        })
    }

    /// Remove every live session targeting `specialist_id`. Used when the
    /// specialist's last connection drops.
    pub fn take_for_specialist(
        &mut self,
        specialist_id: &SpecialistId,
    ) -> Vec<InvitationSession> {
        let keys: Vec<AppointmentId> = self
            .sessions
            .values()
            .filter(|s| &s.invited_specialist_id == specialist_id)
            .map(|s| s.appointment_id.clone())
            .collect();

        keys.iter()
            .filter_map(|key| self.take(key, InviteState::Cancelled))
            .collect()
    }

    /// Remove every live session created by `inviter_conn_id`.
    pub fn take_for_inviter(&mut self, inviter_conn_id: ConnId) -> Vec<InvitationSession> {
        let keys: Vec<AppointmentId> = self
            .sessions
            .values()
            .filter(|s| s.inviter_conn_id == inviter_conn_id)
            .map(|s| s.appointment_id.clone())
            .collect();

        keys.iter()
            .filter_map(|key| self.take(key, InviteState::Cancelled))
            .collect()
    }

    pub fn is_busy(&self, specialist_id: &SpecialistId) -> bool {
        self.busy.contains(specialist_id)
    }

    pub fn live_session(&self, appointment_id: &AppointmentId) -> Option<&InvitationSession> {
        self.sessions.get(appointment_id)
    }

    pub fn live_count(&self) -> usize {
        self.sessions.len()
    }

    fn remove(&mut self, appointment_id: &AppointmentId) -> Option<InvitationSession> {
        let session = self.sessions.remove(appointment_id)?;
        self.busy.remove(&session.invited_specialist_id);
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_invite(apt: &str, spec: &str) -> (InvitationTable, ConnId) {
        let mut table = InvitationTable::new();
        let inviter = ConnId::new();
        table
            .begin_invite(AppointmentId::new(apt), SpecialistId::new(spec), inviter)
            .unwrap();
        (table, inviter)
    }

    #[test]
    fn invite_sets_busy_flag() {
        let (table, _) = table_with_invite("apt-1", "s1");
        assert!(table.is_busy(&SpecialistId::new("s1")));
        assert_eq!(table.live_count(), 1);
    }

    #[test]
    fn busy_specialist_rejects_second_invite() {
        let (mut table, _) = table_with_invite("apt-1", "s1");
        let err = table
            .begin_invite(AppointmentId::new("apt-2"), SpecialistId::new("s1"), ConnId::new())
            .unwrap_err();
        assert!(matches!(err, AppError::SpecialistBusy { .. }));
        // The original invitation is unaffected
        assert!(table.live_session(&AppointmentId::new("apt-1")).is_some());
    }

    #[test]
    fn reinvite_same_key_for_the_same_specialist_is_refused() {
        let (mut table, _) = table_with_invite("apt-1", "s1");
        let err = table
            .begin_invite(AppointmentId::new("apt-1"), SpecialistId::new("s1"), ConnId::new())
            .unwrap_err();
        assert!(matches!(err, AppError::SpecialistBusy { .. }));
        // The original invitation is unaffected
        assert_eq!(table.live_count(), 1);
        assert!(table.is_busy(&SpecialistId::new("s1")));
    }

    #[test]
    fn reinvite_for_same_appointment_supersedes() {
        let (mut table, _) = table_with_invite("apt-1", "s1");
        let superseded = table
            .begin_invite(AppointmentId::new("apt-1"), SpecialistId::new("s2"), ConnId::new())
            .unwrap()
            .expect("old session returned");

        assert_eq!(superseded.state, InviteState::Cancelled);
        assert_eq!(superseded.invited_specialist_id, SpecialistId::new("s1"));
        // The superseded target is free again, the new one is busy
        assert!(!table.is_busy(&SpecialistId::new("s1")));
        assert!(table.is_busy(&SpecialistId::new("s2")));
        assert_eq!(table.live_count(), 1);
    }

    #[test]
    fn take_matching_requires_the_invited_specialist() {
        let (mut table, _) = table_with_invite("apt-1", "s1");

        // Wrong specialist: stale, nothing removed
        assert!(table
            .take_matching(
                &AppointmentId::new("apt-1"),
                &SpecialistId::new("s2"),
                InviteState::Accepted,
            )
            .is_none());
        assert!(table.is_busy(&SpecialistId::new("s1")));

        let session = table
            .take_matching(
                &AppointmentId::new("apt-1"),
                &SpecialistId::new("s1"),
                InviteState::Accepted,
            )
            .unwrap();
        assert_eq!(session.state, InviteState::Accepted);
        assert!(!table.is_busy(&SpecialistId::new("s1")));

        // Second resolution of the same key is a no-op
        assert!(table
            .take_matching(
                &AppointmentId::new("apt-1"),
                &SpecialistId::new("s1"),
                InviteState::Accepted,
            )
            .is_none());
    }

    #[test]
    fn take_for_specialist_cancels_all_their_invitations() {
        let (mut table, _) = table_with_invite("apt-1", "s1");
        let cancelled = table.take_for_specialist(&SpecialistId::new("s1"));
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].state, InviteState::Cancelled);
        assert!(!table.is_busy(&SpecialistId::new("s1")));
        assert_eq!(table.live_count(), 0);
    }

    #[test]
    fn take_for_inviter_cancels_their_invitations() {
        let (mut table, inviter) = table_with_invite("apt-1", "s1");
        assert!(table.take_for_inviter(ConnId::new()).is_empty());

        let cancelled = table.take_for_inviter(inviter);
        assert_eq!(cancelled.len(), 1);
        assert!(!table.is_busy(&SpecialistId::new("s1")));
    }

    #[test]
    fn room_id_matches_appointment_derivation() {
        let (table, _) = table_with_invite("apt-1", "s1");
        let session = table.live_session(&AppointmentId::new("apt-1")).unwrap();
        assert_eq!(session.room_id.0, "appointment_apt-1");
    }
}
