use std::fmt;
use std::str::FromStr;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use teloxide::types::{ChatId, Recipient};

/// A delivery target: Telegram chat identifiers are signed integers
/// (negative for groups, positive for individuals), public channels go by
/// their `@`-prefixed username.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum RecipientId {
    Id(ChatId),
    Channel(String),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("not a chat id nor a channel username: {value}")]
pub struct InvalidRecipient {
    #[error(not(source))]
    value: String,
}

impl RecipientId {
    pub fn is_group(&self) -> bool {
        matches!(self, RecipientId::Id(ChatId(id)) if *id < 0)
    }

    pub fn is_channel(&self) -> bool {
        matches!(self, RecipientId::Channel(_))
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipientId::Id(ChatId(id)) => write!(f, "{id}"),
            RecipientId::Channel(username) => f.write_str(username),
        }
    }
}

impl FromStr for RecipientId {
    type Err = InvalidRecipient;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(username) = s.strip_prefix('@') {
            if username.is_empty() {
                return Err(InvalidRecipient { value: s.to_owned() })
            }
            return Ok(RecipientId::Channel(format!("@{username}")))
        }
        s.parse::<i64>()
            .map(|id| RecipientId::Id(ChatId(id)))
            .map_err(|_| InvalidRecipient { value: s.to_owned() })
    }
}

impl From<ChatId> for RecipientId {
    fn from(value: ChatId) -> Self {
        RecipientId::Id(value)
    }
}

impl From<&RecipientId> for Recipient {
    fn from(value: &RecipientId) -> Self {
        match value {
            RecipientId::Id(id) => Recipient::Id(*id),
            RecipientId::Channel(username) => Recipient::ChannelUsername(username.clone()),
        }
    }
}

// Serialized as its string form so it can key the persisted subscriber map.

impl Serialize for RecipientId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecipientId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use teloxide::types::ChatId;
    use super::RecipientId;

    #[test]
    fn parsing() {
        assert_eq!("100".parse::<RecipientId>().unwrap(), RecipientId::Id(ChatId(100)));
        assert_eq!("-200".parse::<RecipientId>().unwrap(), RecipientId::Id(ChatId(-200)));
        assert_eq!("@covy".parse::<RecipientId>().unwrap(), RecipientId::Channel("@covy".to_string()));
        assert!("".parse::<RecipientId>().is_err());
        assert!("@".parse::<RecipientId>().is_err());
        assert!("12abc".parse::<RecipientId>().is_err());
    }

    #[test]
    fn kinds() {
        assert!(RecipientId::Id(ChatId(-1)).is_group());
        assert!(!RecipientId::Id(ChatId(1)).is_group());
        assert!(RecipientId::Channel("@covy".to_string()).is_channel());
    }

    #[test]
    fn keys_a_serialized_map() {
        let mut map = HashMap::new();
        map.insert(RecipientId::Id(ChatId(100)), 1);
        map.insert(RecipientId::Channel("@covy".to_string()), 2);

        let json = serde_json::to_string(&map).unwrap();
        let back: HashMap<RecipientId, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
