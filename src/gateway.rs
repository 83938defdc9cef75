//! Connection bookkeeping.
//!
//! Each transport connection is one player; the connection id doubles as the
//! player id. The gateway remembers which room a connection belongs to and
//! owns the outbound channel of every live socket.

use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};

use crate::broadcast::Envelope;
use crate::protocol::ServerMessage;
use crate::types::{ConnectionId, RoomCode};

pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

#[derive(Debug, Default)]
struct Connection {
    outbox: Option<Outbox>,
    room: Option<RoomCode>,
}

#[derive(Debug, Default)]
pub struct ConnectionGateway {
    connections: RwLock<HashMap<ConnectionId, Connection>>,
}

impl ConnectionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new connection and where to send its messages
    pub async fn register(&self, conn_id: ConnectionId, outbox: Outbox) {
        self.connections.write().await.insert(
            conn_id,
            Connection {
                outbox: Some(outbox),
                room: None,
            },
        );
    }

    /// Forget a connection. Returns the room it was bound to, if any.
    pub async fn unregister(&self, conn_id: &str) -> Option<RoomCode> {
        self.connections
            .write()
            .await
            .remove(conn_id)
            .and_then(|c| c.room)
    }

    /// Bind a connection to a room.
    ///
    /// Connections without a socket (tests) are tracked too.
    pub async fn bind(&self, conn_id: &str, room: RoomCode) {
        self.connections
            .write()
            .await
            .entry(conn_id.to_string())
            .or_default()
            .room = Some(room);
    }

    pub async fn room_of(&self, conn_id: &str) -> Option<RoomCode> {
        self.connections
            .read()
            .await
            .get(conn_id)
            .and_then(|c| c.room.clone())
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Push envelopes into the recipients' outboxes.
    ///
    /// Closed or unknown connections are skipped; their disconnect is
    /// handled by their own socket task.
    pub async fn deliver(&self, envelopes: &[Envelope]) {
        let connections = self.connections.read().await;
        for envelope in envelopes {
            for recipient in &envelope.recipients {
                let Some(outbox) = connections.get(recipient).and_then(|c| c.outbox.as_ref())
                else {
                    continue;
                };
                if outbox.send(envelope.message.clone()).is_err() {
                    tracing::debug!("Outbox closed for {}", recipient);
                }
            }
        }
    }
}
