use rust_i18n::t;
use teloxide::Bot;
use teloxide::macros::BotCommands;
use teloxide::types::Message;
use crate::domain::LanguageCode;
use crate::handlers::{register_and_reply, register_interaction, HandlerResult};
use crate::{metrics, repo};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum NewsCommands {
    #[command(description = "news")]
    News,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum MuteCommands {
    #[command(description = "mute")]
    Mute,
    #[command(description = "unmute")]
    Unmute,
}

pub async fn news_cmd_handler(bot: Bot, msg: Message, repo: repo::StateRepo) -> HandlerResult {
    metrics::CMD_NEWS_COUNTER.inc();
    let lang_code = LanguageCode::from_maybe_user(msg.from());
    let answer = match repo.last_alert().await {
        Some(alert) if alert.is_populated() => format!(
            "<b>{}</b>\n{}",
            teloxide::utils::html::escape(&alert.display_time),
            teloxide::utils::html::escape(&alert.content),
        ),
        _ => t!("commands.news.empty", locale = &lang_code).into(),
    };
    register_and_reply(bot, &repo, &msg, answer).await
}

pub async fn mute_cmd_handler(bot: Bot, msg: Message, cmd: MuteCommands, repo: repo::StateRepo) -> HandlerResult {
    metrics::CMD_MUTE_COUNTER.inc();
    let lang_code = LanguageCode::from_maybe_user(msg.from());
    let id = register_interaction(&repo, &msg).await;
    let answer = match cmd {
        MuteCommands::Mute => {
            repo.set_mute_alerts(&id, true).await;
            t!("commands.mute.muted", locale = &lang_code)
        }
        MuteCommands::Unmute => {
            repo.set_mute_alerts(&id, false).await;
            t!("commands.mute.unmuted", locale = &lang_code)
        }
    };
    register_and_reply(bot, &repo, &msg, answer).await
}
