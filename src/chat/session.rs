//! Conversation transcript

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One turn in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique within its session, assigned in append order
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// An append-only transcript, seeded with the bot's welcome message
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatSession {
    pub fn new(welcome: &str) -> Self {
        let mut session = Self {
            messages: Vec::new(),
            next_id: 0,
        };
        session.append(Sender::Bot, welcome);
        session
    }

    /// Append a message and return a copy of it
    pub fn append(&mut self, sender: Sender, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id.to_string(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_with_welcome() {
        let session = ChatSession::new("Welcome!");
        assert_eq!(session.len(), 1);
        let welcome = &session.messages()[0];
        assert_eq!(welcome.sender, Sender::Bot);
        assert_eq!(welcome.content, "Welcome!");
        assert_eq!(welcome.id, "0");
    }

    #[test]
    fn test_ids_increase_in_append_order() {
        let mut session = ChatSession::new("Welcome!");
        let a = session.append(Sender::User, "hi");
        let b = session.append(Sender::Bot, "hello");

        assert_eq!(a.id, "1");
        assert_eq!(b.id, "2");
        assert!(a.timestamp <= b.timestamp);
        assert_eq!(session.last(), Some(&b));
    }

    #[test]
    fn test_message_json() {
        let mut session = ChatSession::new("Welcome!");
        let message = session.append(Sender::User, "hi");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["sender"], "user");
        assert_eq!(json["id"], "1");
    }
}
