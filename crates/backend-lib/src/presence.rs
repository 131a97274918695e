// ============================
// crates/backend-lib/src/presence.rs
// ============================
//! Presence directory: maps a specialist's logical identity to the set of
//! live connections representing it (multi-tab, multi-device). A
//! specialist is online while at least one connection remains; the entity
//! is removed when the set empties. Accepting a call does not remove the
//! entity — it flips an in-call marker that hides the specialist from the
//! availability snapshot while connection bookkeeping keeps working.

use consult_common::{ConnId, SpecialistId, SpecialistProfile};
use std::collections::{HashMap, HashSet};

/// One online specialist: display payload plus the connections currently
/// representing them.
#[derive(Debug)]
pub struct SpecialistPresence {
    pub profile: SpecialistProfile,
    pub connections: HashSet<ConnId>,
    pub in_call: bool,
}

/// Outcome of removing a connection from the directory.
#[derive(Debug, PartialEq, Eq)]
pub enum Unregistered {
    /// The connection was not associated with any specialist.
    NotTracked,
    /// The specialist still has other live connections.
    StillOnline(SpecialistId),
    /// That was the specialist's last connection; the entity was removed.
    FullyOffline(SpecialistId),
}

#[derive(Default)]
pub struct PresenceDirectory {
    specialists: HashMap<SpecialistId, SpecialistPresence>,
}

impl PresenceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent upsert. First registration creates the entity; later
    /// ones add the connection and refresh the profile (last writer wins).
    /// Registering also asserts availability, clearing any in-call marker.
    pub fn register_online(
        &mut self,
        specialist_id: SpecialistId,
        profile: SpecialistProfile,
        conn_id: ConnId,
    ) {
        let entry = self
            .specialists
            .entry(specialist_id)
            .or_insert_with(|| SpecialistPresence {
                profile: profile.clone(),
                connections: HashSet::new(),
                in_call: false,
            });
        entry.profile = profile;
        entry.in_call = false;
        entry.connections.insert(conn_id);
    }

    /// Remove `conn_id` from whichever entity holds it (at most one).
    pub fn unregister_connection(&mut self, conn_id: ConnId) -> Unregistered {
        let owner = self
            .specialists
            .iter()
            .find(|(_, p)| p.connections.contains(&conn_id))
            .map(|(id, _)| id.clone());

        let Some(specialist_id) = owner else {
            return Unregistered::NotTracked;
        };

        let emptied = match self.specialists.get_mut(&specialist_id) {
            Some(presence) => {
                presence.connections.remove(&conn_id);
                presence.connections.is_empty()
            },
            None => false,
        };

        if emptied {
            self.specialists.remove(&specialist_id);
            Unregistered::FullyOffline(specialist_id)
        } else {
            Unregistered::StillOnline(specialist_id)
        }
    }

    /// Profiles of every online specialist not currently in a call.
    pub fn available_snapshot(&self) -> Vec<SpecialistProfile> {
        self.specialists
            .values()
            .filter(|p| !p.in_call)
            .map(|p| p.profile.clone())
            .collect()
    }

    /// Current connection set for a specialist; empty if offline.
    pub fn resolve_connections(&self, specialist_id: &SpecialistId) -> Vec<ConnId> {
        self.specialists
            .get(specialist_id)
            .map(|p| p.connections.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_online(&self, specialist_id: &SpecialistId) -> bool {
        self.specialists.contains_key(specialist_id)
    }

    /// Whether the specialist is currently in an accepted call.
    pub fn is_in_call(&self, specialist_id: &SpecialistId) -> bool {
        self.specialists
            .get(specialist_id)
            .is_some_and(|p| p.in_call)
    }

    /// Hide the specialist from the availability snapshot for the duration
    /// of a call.
    pub fn mark_in_call(&mut self, specialist_id: &SpecialistId) {
        if let Some(presence) = self.specialists.get_mut(specialist_id) {
            presence.in_call = true;
        }
    }

    /// Make the specialist visible in the availability snapshot again, and
    /// make sure the reporting connection is tracked under them.
    pub fn mark_available(&mut self, specialist_id: &SpecialistId, conn_id: ConnId) {
        if let Some(presence) = self.specialists.get_mut(specialist_id) {
            presence.in_call = false;
            presence.connections.insert(conn_id);
        }
    }
}
