use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::urgency::classify_urgency;

pub const GREETING_MESSAGE_ID: &str = "greeting";

pub const QUICK_SUGGESTIONS: [&str; 4] =
    ["I have a headache", "Flu symptoms", "Chest pain", "Fever"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
    Emergency,
}

impl Urgency {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Urgent => "urgent",
            Self::Emergency => "emergency",
        }
    }

    pub fn is_elevated(self) -> bool {
        self != Self::Normal
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn mint() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn greeting() -> Self {
        Self(GREETING_MESSAGE_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_greeting(&self) -> bool {
        self.0 == GREETING_MESSAGE_ID
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub author: Author,
    pub text: String,
    pub urgency: Urgency,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::mint(),
            author: Author::User,
            text: text.into(),
            urgency: Urgency::Normal,
            sent_at: Utc::now(),
        }
    }

    /// Bot reply annotated with the urgency of its text.
    pub fn bot_reply(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: MessageId::mint(),
            author: Author::Bot,
            urgency: classify_urgency(&text),
            text,
            sent_at: Utc::now(),
        }
    }

    /// Synthetic bot message that is never classified.
    pub fn bot_notice(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::mint(),
            author: Author::Bot,
            text: text.into(),
            urgency: Urgency::Normal,
            sent_at: Utc::now(),
        }
    }

    pub fn greeting(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::greeting(),
            ..Self::bot_notice(text)
        }
    }

    pub fn is_from_bot(&self) -> bool {
        self.author == Author::Bot
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Welcome,
    Idle,
    Sending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub phase: SessionPhase,
    pub draft: String,
}

impl SessionSnapshot {
    pub fn can_send(&self) -> bool {
        self.phase == SessionPhase::Idle && !self.draft.trim().is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
