use std::time::Duration;
use chrono::{Timelike, Utc};
use rust_i18n::t;
use teloxide::prelude::*;
use teloxide::types::ParseMode::Html;
use crate::domain::{Announcement, RecipientId};
use crate::metrics;
use crate::repo::{ChatKind, SubscriberRegistry};

/// Quiet hours in the announcement's local zone: deliveries in this span go
/// out without a notification sound.
const NIGHT_STARTS_AT: u32 = 22;
const NIGHT_ENDS_AT: u32 = 7;

/// How much of the message to keep in delivery-failure logs.
const LOG_PREVIEW_LEN: usize = 16;

#[derive(Clone)]
pub struct Broadcaster {
    bot: Bot,
    include: Vec<RecipientId>,
    exclude: Vec<RecipientId>,
    step: Duration,
    utc_offset_hours: i64,
}

impl Broadcaster {
    pub fn new(bot: Bot, include: Vec<RecipientId>, exclude: Vec<RecipientId>,
               step: Duration, utc_offset_hours: i64) -> Self {
        Self { bot, include, exclude, step, utc_offset_hours }
    }

    /// Fans the bulletin out to every eligible recipient. Each delivery is
    /// an independent fire-and-forget task with a strictly increasing start
    /// delay to stay under the API rate limit; one failing recipient never
    /// affects the others.
    pub fn broadcast(&self, event: &Announcement, registry: &SubscriberRegistry) {
        let recipients = compute_recipients(registry, &self.include, &self.exclude);
        log::info!("broadcasting the bulletin of {} to {} recipients",
            event.display_time, recipients.len());
        metrics::ALERT_DELIVERY.invoked();

        let local_hour = (Utc::now() + chrono::Duration::hours(self.utc_offset_hours)).hour();
        for (position, recipient) in recipients.into_iter().enumerate() {
            let bot = self.bot.clone();
            let delay = self.step * position as u32;
            let text = render_alert(event, recipient.is_channel());
            let silent = is_silent(local_hour, is_group_like(&recipient, registry));

            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let mut request = bot.send_message(&recipient, text.clone());
                request.parse_mode = Some(Html);
                // channels keep their link previews
                request.disable_web_page_preview = Some(!recipient.is_channel());
                request.disable_notification = Some(silent);
                match request.await {
                    Ok(_) => metrics::ALERT_DELIVERY.finished(),
                    Err(e) => {
                        metrics::DELIVERY_ERRORS_COUNTER.inc();
                        let preview: String = text.chars().take(LOG_PREVIEW_LEN).collect();
                        log::error!("couldn't deliver the alert to {recipient} (text: {preview}...): {e}");
                    }
                }
            });
        }
    }
}

/// Recipient set = (registry keys ∪ include list) − exclude list, minus
/// muted subscribers, deduplicated.
pub fn compute_recipients(
    registry: &SubscriberRegistry,
    include: &[RecipientId],
    exclude: &[RecipientId],
) -> Vec<RecipientId> {
    let mut recipients: Vec<RecipientId> = registry.keys()
        .filter(|id| !registry[id].mute_alerts)
        .cloned()
        .collect();
    for id in include {
        if !recipients.contains(id) {
            recipients.push(id.clone());
        }
    }
    recipients.retain(|id| !exclude.contains(id));
    recipients
}

fn is_group_like(recipient: &RecipientId, registry: &SubscriberRegistry) -> bool {
    match registry.get(recipient) {
        Some(subscriber) => matches!(subscriber.kind, ChatKind::Group | ChatKind::Supergroup),
        None => recipient.is_group(),
    }
}

/// Groups are always silenced; individuals only during the night.
fn is_silent(local_hour: u32, is_group: bool) -> bool {
    is_group || local_hour >= NIGHT_STARTS_AT || local_hour < NIGHT_ENDS_AT
}

/// Channels get a standalone variant without command cross-links; chats get
/// a footer pointing at the bot's commands.
fn render_alert(event: &Announcement, channel_variant: bool) -> String {
    let body = format!(
        "<b>{}</b>\n{}",
        teloxide::utils::html::escape(&event.display_time),
        teloxide::utils::html::escape(&event.content),
    );
    if channel_variant {
        body
    } else {
        format!("{body}\n\n{}", t!("alert.footer", locale = "vi"))
    }
}
