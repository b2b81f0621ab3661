use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::broadcast as alert_channel;
use crate::alert::{AlertStateMachine, Transition};
use crate::broadcast::Broadcaster;
use crate::config::AppConfig;
use crate::domain::Announcement;
use crate::metrics;
use crate::repo::StateRepo;
use crate::sources::Sources;
use crate::stats::{reconcile::reconcile, Snapshot, SnapshotStore};

const ALERT_CHANNEL_CAPACITY: usize = 8;

/// Drives the fetch → reconcile → alert-check cycle on a fixed interval.
/// Every failure is absorbed locally: a bad cycle leaves stale data behind,
/// it never stops the loop.
pub struct Poller<S> {
    sources: Arc<S>,
    snapshot: SnapshotStore,
    repo: StateRepo,
    alerts: AlertStateMachine,
    broadcaster: Broadcaster,
    home_country: String,
    interval: std::time::Duration,
    alert_events: alert_channel::Sender<Announcement>,
}

impl<S: Sources> Poller<S> {
    pub fn new(sources: S, snapshot: SnapshotStore, repo: StateRepo,
               broadcaster: Broadcaster, config: &AppConfig) -> Self {
        let (alert_events, _) = alert_channel::channel(ALERT_CHANNEL_CAPACITY);
        Self {
            sources: Arc::new(sources),
            snapshot,
            repo,
            alerts: AlertStateMachine::new(Duration::minutes(config.freshness_window_minutes)),
            broadcaster,
            home_country: config.home_country.clone(),
            interval: config.poll_interval,
            alert_events,
        }
    }

    /// Accepted announcements are echoed here for any frontend listener.
    pub fn subscribe_alerts(&self) -> alert_channel::Receiver<Announcement> {
        self.alert_events.subscribe()
    }

    pub async fn run(self) {
        log::info!("polling the sources every {:?}", self.interval);
        let mut timer = tokio::time::interval(self.interval);
        loop {
            timer.tick().await;
            self.cycle(Utc::now()).await;
            metrics::POLL_CYCLES_COUNTER.inc();
        }
    }

    async fn cycle(&self, now: DateTime<Utc>) {
        self.refresh_snapshot(now).await;
        match self.sources.fetch_announcement_candidate().await {
            Ok(candidate) => self.check_alert(candidate, now).await,
            Err(e) => log::warn!("no announcement candidate this cycle: {e:#}"),
        }
    }

    /// Builds the next snapshot, falling back per field set to the previous
    /// one when a source yields nothing, and installs it wholesale.
    async fn refresh_snapshot(&self, now: DateTime<Utc>) {
        let previous = self.snapshot.get();

        let page = match self.sources.fetch_country_table().await {
            Ok(page) => Some(page),
            Err(e) => {
                log::warn!("country table unavailable, keeping the previous one: {e:#}");
                None
            }
        };
        let figure = match self.sources.fetch_authoritative_figure().await {
            Ok(figure) => Some(figure),
            Err(e) => {
                log::warn!("authoritative figure unavailable: {e:#}");
                previous.authoritative
            }
        };

        let (rows, global, yesterday) = match page {
            Some(page) => (
                page.today,
                page.global.or(previous.global),
                page.yesterday.or_else(|| previous.yesterday.clone()),
            ),
            None => (previous.rows.clone(), previous.global, previous.yesterday.clone()),
        };

        self.snapshot.replace(Snapshot {
            rows: reconcile(&rows, figure.as_ref(), &self.home_country),
            yesterday,
            global,
            authoritative: figure,
            updated_at: Some(now),
        });
    }

    async fn check_alert(&self, candidate: Announcement, now: DateTime<Utc>) {
        let last = self.repo.last_alert().await;
        match self.alerts.advance(last.as_ref(), candidate, now) {
            Transition::Unchanged => {}
            Transition::StoredSilently(event) => {
                log::info!("storing the first bulletin ({}) without broadcasting", event.display_time);
                if let Err(e) = self.repo.set_last_alert(&event).await {
                    log::error!("couldn't persist the first bulletin: {e:#}");
                }
            }
            Transition::Broadcast(event) => {
                // fan out only once the new state is durable; a failed write
                // costs this broadcast, the next cycle re-derives the state
                match self.repo.set_last_alert(&event).await {
                    Ok(()) => {
                        let registry = self.repo.subscribers().await;
                        self.broadcaster.broadcast(&event, &registry);
                        let _ = self.alert_events.send(event);
                    }
                    Err(e) => log::error!("couldn't persist the new bulletin, skipping its broadcast: {e:#}"),
                }
            }
        }
    }
}
