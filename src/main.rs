mod alert;
mod broadcast;
mod commands;
mod config;
mod domain;
mod handlers;
mod metrics;
mod poller;
mod repo;
mod sources;
mod stats;

use std::env::VarError;
use std::net::SocketAddr;
use futures::future::join_all;
use reqwest::Url;
use rust_i18n::i18n;
use teloxide::prelude::*;
use teloxide::dptree::deps;
use teloxide::update_listeners::webhooks::{axum_to_router, Options};
use teloxide::update_listeners::UpdateListener;
use crate::broadcast::Broadcaster;
use crate::handlers::{HelpCommands, MuteCommands, NewsCommands, StartCommands};
use crate::handlers::status::StatsCommands;
use crate::poller::Poller;
use crate::sources::HttpSources;
use crate::stats::SnapshotStore;

const ENV_WEBHOOK_URL: &str = "WEBHOOK_URL";

i18n!(fallback = "en");    // load localizations with default parameters

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    dotenvy::dotenv()?;

    pretty_env_logger::init();

    let app_config = config::AppConfig::from_env();
    let state_repo = repo::StateRepo::load(app_config.state_file.clone()).await;
    let snapshots = SnapshotStore::default();

    let handler = dptree::entry()
        .branch(Update::filter_message().filter_command::<StartCommands>().endpoint(handlers::start_cmd_handler))
        .branch(Update::filter_message().filter_command::<HelpCommands>().endpoint(handlers::help_cmd_handler))
        .branch(Update::filter_message().filter_command::<StatsCommands>().endpoint(handlers::status::cmd_handler))
        .branch(Update::filter_message().filter_command::<NewsCommands>().endpoint(handlers::news_cmd_handler))
        .branch(Update::filter_message().filter_command::<MuteCommands>().endpoint(handlers::mute_cmd_handler))
        .branch(Update::filter_message().endpoint(handlers::fallback_handler));

    let bot = Bot::from_env();
    bot.delete_webhook().await?;

    let set_my_commands_requests = _rust_i18n_available_locales()
        .into_iter()
        .map(|locale| commands::set_my_commands(&bot, locale));
    let set_my_commands_failed = join_all(set_my_commands_requests)
        .await
        .into_iter()
        .any(|res| res.is_err());
    if set_my_commands_failed {
        Err("couldn't set the bot's commands")?
    }

    let http_sources = HttpSources::new(app_config.sources.clone())?;
    let broadcaster = Broadcaster::new(
        bot.clone(),
        app_config.include.clone(),
        app_config.exclude.clone(),
        app_config.broadcast_step,
        app_config.utc_offset_hours,
    );
    let poller = Poller::new(http_sources, snapshots.clone(), state_repo.clone(), broadcaster, &app_config);

    // frontend-side echo of accepted bulletins
    let mut alert_events = poller.subscribe_alerts();
    tokio::spawn(async move {
        while let Ok(event) = alert_events.recv().await {
            log::info!("a new official bulletin was accepted: {}", event.display_time);
        }
    });
    tokio::spawn(poller.run());

    let webhook_url: Option<Url> = match std::env::var(ENV_WEBHOOK_URL) {
        Ok(env_url) if !env_url.is_empty() => Some(env_url.parse()?),
        Ok(env_url) if env_url.is_empty() => None,
        Err(VarError::NotPresent) => None,
        _ => Err("invalid webhook URL!")?
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    let metrics_router = metrics::init();

    let ignore_unknown_updates = |_| Box::pin(async {});
    let deps = deps![
        app_config,
        snapshots,
        state_repo
    ];

    match webhook_url {
        Some(url) => {
            log::info!("Setting a webhook: {url}");

            let (mut listener, stop_flag, bot_router) = axum_to_router(bot.clone(), Options::new(addr, url)).await?;
            let stop_token = listener.stop_token();

            let error_handler = LoggingErrorHandler::with_custom_text("An error from the update listener");
            let mut dispatcher = Dispatcher::builder(bot, handler)
                .default_handler(ignore_unknown_updates)
                .dependencies(deps)
                .build();
            let bot_fut = dispatcher.dispatch_with_listener(listener, error_handler);

            let srv = tokio::spawn(async move {
                let app = axum::Router::new()
                    .merge(metrics_router)
                    .merge(bot_router);
                axum::Server::bind(&addr)
                    .serve(app.into_make_service())
                    .with_graceful_shutdown(stop_flag)
                    .await
                    .map_err(|err| {
                        stop_token.stop();
                        err
                    })
            });

            let (res, _) = futures::join!(srv, bot_fut);
            res
        }
        None => {
            log::info!("The polling dispatcher is activating...");

            let bot_fut = tokio::spawn(async move {
                Dispatcher::builder(bot, handler)
                    .default_handler(ignore_unknown_updates)
                    .dependencies(deps)
                    .enable_ctrlc_handler()
                    .build()
                    .dispatch()
                    .await
            });

            let srv = tokio::spawn(async move {
                axum::Server::bind(&addr)
                    .serve(metrics_router.into_make_service())
                    .with_graceful_shutdown(async {
                        tokio::signal::ctrl_c()
                            .await
                            .expect("failed to install CTRL+C signal handler");
                        log::info!("Shutdown of the metrics server")
                    })
                    .await
            });

            let (res, _) = futures::join!(srv, bot_fut);
            res
        }
    }?.map_err(Into::into)
}
