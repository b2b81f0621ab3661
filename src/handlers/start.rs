use rust_i18n::t;
use teloxide::Bot;
use teloxide::macros::BotCommands;
use teloxide::types::Message;
use crate::domain::LanguageCode;
use crate::handlers::{register_and_reply, HandlerResult};
use crate::{metrics, repo};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum StartCommands {
    #[command(description = "start")]
    Start,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum HelpCommands {
    #[command(description = "help")]
    Help,
}

pub async fn start_cmd_handler(bot: Bot, msg: Message, repo: repo::StateRepo) -> HandlerResult {
    metrics::CMD_START_COUNTER.inc();
    let lang_code = LanguageCode::from_maybe_user(msg.from());
    let answer = t!("commands.start.greeting", locale = &lang_code);
    register_and_reply(bot, &repo, &msg, answer).await
}

pub async fn help_cmd_handler(bot: Bot, msg: Message, repo: repo::StateRepo) -> HandlerResult {
    metrics::CMD_HELP_COUNTER.inc();
    let lang_code = LanguageCode::from_maybe_user(msg.from());
    let answer = t!("commands.help.text", locale = &lang_code);
    register_and_reply(bot, &repo, &msg, answer).await
}
