use rust_i18n::t;
use teloxide::Bot;
use teloxide::macros::BotCommands;
use teloxide::types::Message;
use crate::config::AppConfig;
use crate::domain::LanguageCode;
use crate::handlers::render::{render_status, render_table};
use crate::handlers::{register_and_reply, HandlerResult};
use crate::stats::rank::{rank, RankQuery};
use crate::stats::SnapshotStore;
use crate::{metrics, repo};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum StatsCommands {
    #[command(description = "status")]
    Status,
    #[command(description = "top")]
    Top(String),
    #[command(description = "country")]
    Country(String),
}

pub async fn cmd_handler(bot: Bot, msg: Message, cmd: StatsCommands,
                         snapshots: SnapshotStore, repo: repo::StateRepo,
                         app_config: AppConfig) -> HandlerResult {
    let lang_code = LanguageCode::from_maybe_user(msg.from());
    let snapshot = snapshots.get();
    let answer = match cmd {
        StatsCommands::Status => {
            metrics::CMD_STATUS_COUNTER.inc();
            render_status(&snapshot, &app_config.home_country, app_config.top_limit, &lang_code)
        }
        StatsCommands::Top(args) => {
            metrics::CMD_TOP_COUNTER.inc();
            let query = parse_top_query(&args, app_config.top_limit);
            match rank(&snapshot.rows, &query) {
                Some(ranked) => format!("<pre>{}</pre>", render_table(&ranked)),
                None => t!("commands.status.no_data", locale = &lang_code).into(),
            }
        }
        StatsCommands::Country(args) => {
            metrics::CMD_COUNTRY_COUNTER.inc();
            country_answer(&args, &snapshot.rows, &lang_code)
        }
    };
    register_and_reply(bot, &repo, &msg, answer).await
}

/// `/top [count] [deaths]`: both parts optional, in any order.
fn parse_top_query(args: &str, default_top: usize) -> RankQuery {
    let mut query = RankQuery::top(default_top);
    for token in args.split_whitespace() {
        if let Ok(top) = token.parse() {
            query.top = top;
        } else if matches!(token.to_lowercase().as_str(), "deaths" | "death" | "tuvong") {
            query.by_death_count = true;
        }
    }
    query
}

fn country_answer(args: &str, rows: &[crate::domain::CountryRow], lang_code: &LanguageCode) -> String {
    let names: Vec<String> = args.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect();
    if names.is_empty() {
        return t!("commands.country.usage", locale = lang_code).into()
    }
    match rank(rows, &RankQuery::by_names(names, rows.len())) {
        None => t!("commands.status.no_data", locale = lang_code).into(),
        Some(matched) if matched.is_empty() => t!("commands.country.no_match", locale = lang_code).into(),
        Some(matched) => format!("<pre>{}</pre>", render_table(&matched)),
    }
}

#[cfg(test)]
mod test {
    use super::parse_top_query;

    #[test]
    fn top_arguments_are_order_insensitive() {
        let query = parse_top_query("", 10);
        assert_eq!(query.top, 10);
        assert!(!query.by_death_count);

        let query = parse_top_query("5", 10);
        assert_eq!(query.top, 5);

        let query = parse_top_query("deaths 20", 10);
        assert_eq!(query.top, 20);
        assert!(query.by_death_count);

        let query = parse_top_query("nonsense", 10);
        assert_eq!(query.top, 10);
        assert!(!query.by_death_count);
    }
}
