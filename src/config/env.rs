use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;
use anyhow::anyhow;
use crate::domain::RecipientId;

pub fn get_env_value_or_default<T, E>(key: &str, default: T) -> T
where
    T: FromStr<Err = E> + Display,
    E: Error + Send + Sync + 'static
{
    std::env::var(key)
        .map_err(|e| {
            log::warn!("no value was found for an optional environment variable {key}, using the default value {default}");
            anyhow!(e)
        })
        .and_then(|v| v.parse()
            .map_err(|e: E| {
                log::warn!("invalid value of the {key} environment variable, using the default value {default}");
                anyhow!(e)
            }))
        .unwrap_or(default)
}

/// Comma-separated recipient ids; entries that parse to neither a chat id
/// nor a channel username are dropped with a warning, never fatal.
pub(super) fn get_env_recipient_list(key: &str) -> Vec<RecipientId> {
    std::env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| entry.parse()
            .inspect_err(|e| log::warn!("dropping an invalid {key} entry: {e}"))
            .ok())
        .collect()
}
