//! User-facing messages produced by actions.

use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Error,
}

/// One message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

/// Messages produced by one action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub messages: Vec<Message>,
}

impl ActionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(text: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.push_info(text);
        report
    }

    pub fn error(text: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.push_error(text);
        report
    }

    pub fn push_info(&mut self, text: impl Into<String>) {
        self.messages.push(Message {
            level: MessageLevel::Info,
            text: text.into(),
        });
    }

    pub fn push_error(&mut self, text: impl Into<String>) {
        self.messages.push(Message {
            level: MessageLevel::Error,
            text: text.into(),
        });
    }

    /// Whether no error message was produced.
    pub fn is_success(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|m| m.level == MessageLevel::Error)
            .map(|m| m.text.as_str())
    }
}
