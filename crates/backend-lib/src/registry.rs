// ============================
// crates/backend-lib/src/registry.rs
// ============================
//! Connection registry: maps live transport connections to their outbound
//! message channels. Delivery is best-effort; a receiver that has gone
//! away is treated as already disconnected and will be reaped by the
//! transport layer's close path.

use crate::messages::ServerMessage;
use consult_common::ConnId;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Default)]
pub struct ConnectionRegistry {
    senders: HashMap<ConnId, mpsc::UnboundedSender<ServerMessage>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, conn_id: ConnId, tx: mpsc::UnboundedSender<ServerMessage>) {
        self.senders.insert(conn_id, tx);
    }

    pub fn remove(&mut self, conn_id: ConnId) -> bool {
        self.senders.remove(&conn_id).is_some()
    }

    pub fn contains(&self, conn_id: ConnId) -> bool {
        self.senders.contains_key(&conn_id)
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Deliver a message to one connection. Returns false if the
    /// connection is unknown or its receiver is gone.
    pub fn send(&self, conn_id: ConnId, msg: ServerMessage) -> bool {
        match self.senders.get(&conn_id) {
            Some(tx) => tx.send(msg).is_ok(),
            None => {
                debug!(%conn_id, "dropping message for unknown connection");
                false
            },
        }
    }

    /// Deliver a message to every registered connection.
    pub fn broadcast_all(&self, msg: &ServerMessage) {
        for tx in self.senders.values() {
            let _ = tx.send(msg.clone());
        }
    }
}
