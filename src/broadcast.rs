use crate::protocol::ServerMessage;
use crate::types::ConnectionId;

/// An outbound message and the connections it goes to
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub recipients: Vec<ConnectionId>,
    pub message: ServerMessage,
}

impl Envelope {
    /// Message for a single connection
    pub fn to(recipient: impl Into<ConnectionId>, message: ServerMessage) -> Self {
        Self {
            recipients: vec![recipient.into()],
            message,
        }
    }

    /// Message for every listed connection
    pub fn to_all(recipients: Vec<ConnectionId>, message: ServerMessage) -> Self {
        Self {
            recipients,
            message,
        }
    }

    pub fn is_for(&self, recipient: &str) -> bool {
        self.recipients.iter().any(|r| r == recipient)
    }
}

/// Messages addressed to one connection, in order
pub fn messages_for<'a>(envelopes: &'a [Envelope], recipient: &str) -> Vec<&'a ServerMessage> {
    envelopes
        .iter()
        .filter(|e| e.is_for(recipient))
        .map(|e| &e.message)
        .collect()
}
