// ============================
// crates/backend-lib/src/rooms.rs
// ============================
//! Room broadcaster membership: groups connections under a per-appointment
//! channel. Rooms are created lazily on first join; broadcasting to a room
//! nobody joined is a silent no-op. Teardown is hygiene only — correctness
//! never depends on it because the invitation table stops addressing a
//! room once its session is removed.

use consult_common::{ConnId, RoomId};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct RoomBroadcaster {
    rooms: HashMap<RoomId, HashSet<ConnId>>,
}

impl RoomBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the connection to the room; idempotent.
    pub fn join(&mut self, conn_id: ConnId, room_id: RoomId) {
        self.rooms.entry(room_id).or_default().insert(conn_id);
    }

    /// Connections currently joined to the room; empty if the room was
    /// never created.
    pub fn members(&self, room_id: &RoomId) -> Vec<ConnId> {
        self.rooms
            .get(room_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drop the whole room once its invitation is resolved.
    pub fn remove_room(&mut self, room_id: &RoomId) {
        self.rooms.remove(room_id);
    }

    /// Drop a closed connection from every room it joined.
    pub fn leave_all(&mut self, conn_id: ConnId) {
        self.rooms.retain(|_, members| {
            members.remove(&conn_id);
            !members.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_common::AppointmentId;

    fn room(apt: &str) -> RoomId {
        AppointmentId::new(apt).room_id()
    }

    #[test]
    fn join_is_idempotent() {
        let mut rooms = RoomBroadcaster::new();
        let conn = ConnId::new();
        rooms.join(conn, room("apt-1"));
        rooms.join(conn, room("apt-1"));
        assert_eq!(rooms.members(&room("apt-1")).len(), 1);
    }

    #[test]
    fn unknown_room_has_no_members() {
        let rooms = RoomBroadcaster::new();
        assert!(rooms.members(&room("apt-404")).is_empty());
    }

    #[test]
    fn leave_all_prunes_empty_rooms() {
        let mut rooms = RoomBroadcaster::new();
        let (c1, c2) = (ConnId::new(), ConnId::new());
        rooms.join(c1, room("apt-1"));
        rooms.join(c2, room("apt-1"));
        rooms.join(c1, room("apt-2"));

        rooms.leave_all(c1);
        assert_eq!(rooms.members(&room("apt-1")), vec![c2]);
        assert!(rooms.members(&room("apt-2")).is_empty());
    }

    #[test]
    fn remove_room_forgets_membership() {
        let mut rooms = RoomBroadcaster::new();
        rooms.join(ConnId::new(), room("apt-1"));
        rooms.remove_room(&room("apt-1"));
        assert!(rooms.members(&room("apt-1")).is_empty());
    }
}
