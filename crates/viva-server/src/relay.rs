//! Routing of server-pushed frames to the one socket bound to each session.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;
use viva_types::ServerMessage;

/// Frames buffered per connection before further sends are dropped.
pub const OUTBOUND_BUFFER: usize = 256;

/// Identifies one accepted socket. A reconnect under the same session id gets
/// a fresh id, which is what lets a late disconnect of the old socket be told
/// apart from the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Outcome of [`ConnectionRelay::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the connection's outbound buffer.
    Delivered,
    /// No socket is bound to the session. Carries the sessions that were bound
    /// at the time, for diagnosing connect/send races.
    NotConnected { active_sessions: Vec<String> },
    /// A socket is bound but its buffer is full or its writer has exited.
    Dropped,
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// session id -> (connection id, outbound buffer).
type BindingMap = HashMap<String, (ConnectionId, mpsc::Sender<String>)>;

/// Process-wide session → socket bindings.
///
/// Every method takes the lock exactly once and never awaits while holding it,
/// so register, deregister and send are each atomic with respect to one
/// another.
#[derive(Clone, Default)]
pub struct ConnectionRelay {
    bindings: Arc<RwLock<BindingMap>>,
}

impl ConnectionRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `sender` to a session, replacing any previous binding. The old
    /// socket is not closed; it simply stops receiving pushed frames.
    ///
    /// Returns the id the caller must present to [`deregister`](Self::deregister).
    pub async fn register(&self, session_id: String, sender: mpsc::Sender<String>) -> ConnectionId {
        let connection_id = ConnectionId::new();
        let previous = self
            .bindings
            .write()
            .await
            .insert(session_id.clone(), (connection_id, sender));

        match previous {
            Some((old_id, _)) => tracing::info!(
                session_id = %session_id,
                connection_id = %connection_id,
                replaced = %old_id,
                "replaced existing interview connection"
            ),
            None => tracing::info!(
                session_id = %session_id,
                connection_id = %connection_id,
                "interview connection registered"
            ),
        }
        connection_id
    }

    /// Unbinds a session, but only if `connection_id` is the current binding.
    ///
    /// A disconnect from a socket that has since been replaced is ignored.
    /// Returns whether a binding was removed.
    pub async fn deregister(&self, session_id: &str, connection_id: ConnectionId) -> bool {
        let mut bindings = self.bindings.write().await;
        let current = bindings.get(session_id).map(|(id, _)| *id);
        match current {
            Some(current) if current == connection_id => {
                bindings.remove(session_id);
                drop(bindings);
                tracing::info!(
                    session_id = %session_id,
                    connection_id = %connection_id,
                    "interview connection deregistered"
                );
                true
            }
            Some(current) => {
                tracing::debug!(
                    session_id = %session_id,
                    connection_id = %connection_id,
                    current = %current,
                    "ignoring stale disconnect for a replaced connection"
                );
                false
            }
            None => false,
        }
    }

    /// Pushes a frame to the session's socket without waiting for it to be
    /// written. Never fails the caller: a missing binding is reported as
    /// [`Delivery::NotConnected`] together with a single warning.
    pub async fn send(&self, session_id: &str, message: &ServerMessage) -> Delivery {
        let json = match serde_json::to_string(message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(
                    session_id = %session_id,
                    kind = message.kind(),
                    "failed to serialize outgoing frame: {}",
                    e
                );
                return Delivery::Dropped;
            }
        };

        let bindings = self.bindings.read().await;
        let Some((connection_id, sender)) = bindings.get(session_id) else {
            let mut active_sessions: Vec<String> = bindings.keys().cloned().collect();
            active_sessions.sort();
            tracing::warn!(
                session_id = %session_id,
                kind = message.kind(),
                active_sessions = ?active_sessions,
                "no interview connection bound for session; frame not delivered"
            );
            return Delivery::NotConnected { active_sessions };
        };

        match sender.try_send(json) {
            Ok(()) => {
                tracing::debug!(
                    session_id = %session_id,
                    connection_id = %connection_id,
                    kind = message.kind(),
                    "frame queued for client"
                );
                Delivery::Delivered
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    connection_id = %connection_id,
                    kind = message.kind(),
                    "dropping frame for interview connection: {}",
                    e
                );
                Delivery::Dropped
            }
        }
    }

    pub async fn is_connected(&self, session_id: &str) -> bool {
        self.bindings.read().await.contains_key(session_id)
    }

    /// Session ids with a bound socket, sorted.
    pub async fn connected_sessions(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.bindings.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}
