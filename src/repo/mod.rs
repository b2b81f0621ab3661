mod state;

pub use state::*;

use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use tokio::sync::{mpsc, RwLock};
use crate::domain::{Announcement, RecipientId};

/// How long to sit on a write trigger before flushing, so bursts of
/// subscriber churn coalesce into one write.
const WRITE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Owns the persisted bot state: the last seen alert and the subscriber
/// registry, stored as one flat JSON document.
///
/// Two write paths exist on purpose. The alert path awaits its write so
/// broadcasting can be gated on durability; subscriber churn goes through
/// [`StateRepo::touch`], a debounced queue with a single in-flight write.
#[derive(Clone)]
pub struct StateRepo {
    state: Arc<RwLock<BotState>>,
    path: Arc<PathBuf>,
    write_trigger: mpsc::Sender<()>,
}

impl StateRepo {
    /// Loads the state file, falling back to empty state on any error: a
    /// missing or corrupt file degrades, it never prevents startup.
    pub async fn load(path: PathBuf) -> Self {
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => decode(&raw).unwrap_or_else(|e| {
                log::error!("corrupt state file {}, starting empty: {e}", path.display());
                BotState::default()
            }),
            Err(e) => {
                log::warn!("couldn't read the state file {}, starting empty: {e}", path.display());
                BotState::default()
            }
        };
        log::info!("loaded {} subscribers, last alert at {:?}",
            state.subscribers.len(), state.last_alert.as_ref().map(|a| a.timestamp));

        let (tx, rx) = mpsc::channel(1);
        let repo = Self {
            state: Arc::new(RwLock::new(state)),
            path: Arc::new(path),
            write_trigger: tx,
        };
        tokio::spawn(repo.clone().run_writer(rx));
        repo
    }

    pub async fn last_alert(&self) -> Option<Announcement> {
        self.state.read().await
            .last_alert.as_ref()
            .and_then(LastAlert::to_announcement)
    }

    /// Replaces the stored alert and awaits the durable write. On failure
    /// the in-memory update is kept; the caller decides what to skip.
    pub async fn set_last_alert(&self, alert: &Announcement) -> anyhow::Result<()> {
        self.state.write().await.last_alert = Some(LastAlert::from(alert));
        self.persist_now().await
    }

    pub async fn upsert_subscriber(&self, id: RecipientId, subscriber: Subscriber) {
        {
            let mut state = self.state.write().await;
            match state.subscribers.entry(id) {
                // joining again must not reset the mute flags
                Entry::Occupied(mut entry) => entry.get_mut().refresh(subscriber),
                Entry::Vacant(entry) => {
                    log::info!("new subscriber {} ({})", entry.key(), subscriber.display_name);
                    entry.insert(subscriber);
                }
            }
        }
        self.touch();
    }

    /// Returns false if the chat has never interacted with the bot.
    pub async fn set_mute_alerts(&self, id: &RecipientId, mute: bool) -> bool {
        let updated = match self.state.write().await.subscribers.get_mut(id) {
            Some(subscriber) => {
                subscriber.mute_alerts = mute;
                true
            }
            None => false,
        };
        if updated {
            self.touch();
        }
        updated
    }

    pub async fn subscriber(&self, id: &RecipientId) -> Option<Subscriber> {
        self.state.read().await.subscribers.get(id).cloned()
    }

    pub async fn subscribers(&self) -> SubscriberRegistry {
        self.state.read().await.subscribers.clone()
    }

    /// Enqueues a coalesced write; a trigger already in flight absorbs this
    /// one.
    pub fn touch(&self) {
        let _ = self.write_trigger.try_send(());
    }

    pub async fn persist_now(&self) -> anyhow::Result<()> {
        let encoded = {
            let state = self.state.read().await;
            serde_json::to_vec(&*state).context("couldn't serialize the bot state")?
        };
        tokio::fs::write(self.path.as_ref(), encoded).await
            .with_context(|| format!("couldn't write the state file {}", self.path.display()))
    }

    async fn run_writer(self, mut triggers: mpsc::Receiver<()>) {
        while triggers.recv().await.is_some() {
            tokio::time::sleep(WRITE_DEBOUNCE).await;
            while triggers.try_recv().is_ok() {}
            if let Err(e) = self.persist_now().await {
                log::error!("background state write failed: {e:#}");
            }
        }
    }
}

fn decode(raw: &str) -> anyhow::Result<BotState> {
    serde_json::from_str(raw).map_err(Into::into)
}
