//! Dispatcher wiring for the xkcd bot
//!
//! `/xkcd` is matched on the raw message text before the generic command
//! parser so that any separator after the command is accepted.

use crate::bot::{handlers, Command};
use crate::config::{Settings, LATEST_REFRESH_SECS};
use crate::xkcd::{XkcdClient, XkcdService};
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Me};
use tracing::{error, info};

/// Run the Telegram transport runtime.
pub async fn run_bot(settings: Arc<Settings>) {
    let service = init_service(&settings);

    let bot = Bot::new(settings.telegram_token.clone());
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service, settings])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn init_service(settings: &Settings) -> Arc<XkcdService> {
    let client = XkcdClient::new(settings);
    let service = XkcdService::new(
        Arc::new(client),
        Duration::from_secs(LATEST_REFRESH_SECS),
    );

    info!(
        "Initialized xkcd service (comics: {}, search: {}, latest refresh: {}s)",
        settings.xkcd_base_url,
        settings.relevant_xkcd_url,
        service.latest_window().as_secs()
    );

    Arc::new(service)
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_callback_query))
        .branch(Update::filter_inline_query().endpoint(handle_inline_query))
        .branch(
            Update::filter_message()
                .filter(|msg: Message, me: Me| handlers::is_xkcd_command(&msg, me.username()))
                .endpoint(handle_xkcd),
        )
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    service: Arc<XkcdService>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start | Command::Help => handlers::help(bot, msg).await,
        Command::Xkcd(_) => handlers::xkcd(bot, msg, &service).await,
        Command::Random => handlers::random(bot, msg, &service).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_xkcd(
    bot: Bot,
    msg: Message,
    service: Arc<XkcdService>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::xkcd(bot, msg, &service).await {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_inline_query(
    bot: Bot,
    q: InlineQuery,
    service: Arc<XkcdService>,
    settings: Arc<Settings>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::inline_query(bot, q, &service, &settings).await {
        error!("Inline query handler error: {}", e);
    }
    respond(())
}

async fn handle_callback_query(
    bot: Bot,
    q: CallbackQuery,
    service: Arc<XkcdService>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::callback_query(bot, q, &service).await {
        error!("Callback query handler error: {}", e);
    }
    respond(())
}
