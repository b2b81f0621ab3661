use std::collections::HashMap;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use teloxide::types::Chat;
use crate::domain::{Announcement, RecipientId};

pub type SubscriberRegistry = HashMap<RecipientId, Subscriber>;

/// The single persisted record. Serialized shape matches the original
/// deployment's save file, so an existing file keeps working.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BotState {
    #[serde(default)]
    pub last_alert: Option<LastAlert>,
    #[serde(default)]
    pub subscribers: SubscriberRegistry,
}

/// Persisted form of the last seen alert, with the instant kept as unix
/// milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", from = "LastAlertCompat")]
pub struct LastAlert {
    pub timestamp: i64,
    #[serde(default)]
    pub display_time: String,
    #[serde(default)]
    pub content: String,
}

/// Very old deployments stored the last alert as a bare number. The legacy
/// shape is decoded once here and never referenced again.
#[derive(Deserialize)]
#[serde(untagged)]
enum LastAlertCompat {
    Legacy(i64),
    #[serde(rename_all = "camelCase")]
    Record {
        timestamp: i64,
        #[serde(default)]
        display_time: String,
        #[serde(default)]
        content: String,
    },
}

impl From<LastAlertCompat> for LastAlert {
    fn from(value: LastAlertCompat) -> Self {
        match value {
            LastAlertCompat::Legacy(timestamp) => Self {
                timestamp,
                display_time: String::new(),
                content: String::new(),
            },
            LastAlertCompat::Record { timestamp, display_time, content } =>
                Self { timestamp, display_time, content },
        }
    }
}

impl From<&Announcement> for LastAlert {
    fn from(value: &Announcement) -> Self {
        Self {
            timestamp: value.timestamp.timestamp_millis(),
            display_time: value.display_time.clone(),
            content: value.content.clone(),
        }
    }
}

impl LastAlert {
    pub fn to_announcement(&self) -> Option<Announcement> {
        let timestamp = Utc.timestamp_millis_opt(self.timestamp).single()?;
        Some(Announcement {
            timestamp,
            display_time: self.display_time.clone(),
            content: self.content.clone(),
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl From<&Chat> for ChatKind {
    fn from(chat: &Chat) -> Self {
        if chat.is_private() {
            ChatKind::Private
        } else if chat.is_group() {
            ChatKind::Group
        } else if chat.is_supergroup() {
            ChatKind::Supergroup
        } else {
            ChatKind::Channel
        }
    }
}

/// Registry metadata for one chat. Added or refreshed on any inbound
/// interaction, never removed; stale recipients are tolerated, not pruned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub kind: ChatKind,
    pub display_name: String,
    pub joined_at: i64,
    #[serde(default)]
    pub mute_alerts: bool,
    #[serde(default)]
    pub mute_commands: bool,
}

impl Subscriber {
    pub fn from_chat(chat: &Chat, joined_at: i64) -> Self {
        let display_name = chat.title()
            .or(chat.username())
            .or(chat.first_name())
            .unwrap_or_default()
            .to_owned();
        Self {
            kind: ChatKind::from(chat),
            display_name,
            joined_at,
            mute_alerts: false,
            mute_commands: false,
        }
    }

    /// Takes the fresh identity fields but keeps the mute preferences.
    pub fn refresh(&mut self, fresh: Subscriber) {
        self.kind = fresh.kind;
        self.display_name = fresh.display_name;
        self.joined_at = fresh.joined_at;
    }
}
