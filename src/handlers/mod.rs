mod news;
mod render;
mod start;
pub mod status;

pub use news::*;
pub use start::*;

use teloxide::Bot;
use teloxide::payloads::SendMessage;
use teloxide::requests::{JsonRequest, Requester};
use teloxide::types::Message;
use teloxide::types::ParseMode::Html;
use crate::domain::RecipientId;
use crate::repo::{StateRepo, Subscriber};

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Every inbound interaction lands the chat in the registry, refreshed but
/// never removed.
pub async fn register_interaction(repo: &StateRepo, msg: &Message) -> RecipientId {
    let id = RecipientId::from(msg.chat.id);
    let subscriber = Subscriber::from_chat(&msg.chat, msg.date.timestamp());
    repo.upsert_subscriber(id.clone(), subscriber).await;
    id
}

pub fn reply_html<T: Into<String>>(bot: Bot, msg: &Message, answer: T, silent: bool) -> JsonRequest<SendMessage> {
    let mut answer = bot.send_message(msg.chat.id, answer);
    answer.parse_mode = Some(Html);
    answer.disable_web_page_preview = Some(true);
    answer.disable_notification = Some(silent);
    if msg.chat.is_group() || msg.chat.is_supergroup() {
        answer.reply_to_message_id.replace(msg.id);
    }
    answer
}

/// Registers the chat, then answers it, silencing the notification for
/// subscribers who muted command chatter.
pub async fn register_and_reply<T: Into<String>>(bot: Bot, repo: &StateRepo, msg: &Message, answer: T) -> HandlerResult {
    let id = register_interaction(repo, msg).await;
    let silent = repo.subscriber(&id).await
        .map(|subscriber| subscriber.mute_commands)
        .unwrap_or(false);
    reply_html(bot, msg, answer, silent).await?;
    Ok(())
}

/// Non-command messages still register the chat as a subscriber.
pub async fn fallback_handler(msg: Message, repo: StateRepo) -> HandlerResult {
    register_interaction(&repo, &msg).await;
    Ok(())
}
