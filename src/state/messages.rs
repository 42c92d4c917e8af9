// Activity messages shown in the status bar.
// Keeps a bounded history of errors and confirmations and mirrors them to tracing.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warn,
    Error,
}

/// A single activity message.
#[derive(Debug, Clone)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Bounded message history, oldest dropped first.
#[derive(Debug)]
pub struct MessageLog {
    messages: VecDeque<Message>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self {
            messages: VecDeque::with_capacity(Self::CAPACITY),
        }
    }
}

impl MessageLog {
    const CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        let message = Message::new(MessageLevel::Info, text);
        tracing::info!("{}", message.text);
        self.push(message);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        let message = Message::new(MessageLevel::Warn, text);
        tracing::warn!("{}", message.text);
        self.push(message);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        let message = Message::new(MessageLevel::Error, text);
        tracing::error!("{}", message.text);
        self.push(message);
    }

    fn push(&mut self, message: Message) {
        if self.messages.len() == Self::CAPACITY {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Most recent message, if any.
    pub fn latest(&self) -> Option<&Message> {
        self.messages.back()
    }

}
