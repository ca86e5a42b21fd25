//! Telegram handlers for commands, inline queries and hover-text callbacks
//!
//! The request logic (argument classification, number resolution, inline
//! result building) lives in plain functions so it can be tested against a
//! mocked API; the `async fn` handlers only add the Telegram round trip.

use crate::bot::views::{comic_keyboard, inline_photo, permalink};
use crate::config::{Settings, ALT_CALLBACK_CACHE_SECS, MAX_INLINE_RESULTS};
use crate::xkcd::relevant::leading_number;
use crate::xkcd::{RelevantHit, XkcdError, XkcdService};
use anyhow::Result;
use lazy_regex::{regex_captures, regex_is_match};
use rand::Rng;
use std::fmt::Display;
use teloxide::{
    prelude::*,
    types::{InlineQueryResult, MessageEntity, MessageEntityKind, ReplyParameters},
    utils::command::BotCommands,
};
use tracing::{debug, info};

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the command list
    #[command(description = "Show this help.")]
    Start,
    /// Show the command list
    #[command(description = "Show this help.")]
    Help,
    /// Latest comic, comic by number, or best match for a text query
    #[command(description = "Latest xkcd, xkcd by number, or the most relevant xkcd for a query.")]
    Xkcd(String),
    /// Random comic
    #[command(description = "A random xkcd.")]
    Random,
}

/// Where an `/xkcd` request gets its comic number from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRoute {
    /// No arguments: the latest comic
    Latest,
    /// Digits only: that comic number, not validated
    Number(String),
    /// Anything else: best relevance-search match
    Search(String),
}

/// Classify the argument text of an `/xkcd` command
#[must_use]
pub fn classify_args(args: &str) -> CommandRoute {
    if args.is_empty() {
        CommandRoute::Latest
    } else if regex_is_match!(r"^\d+$", args) {
        CommandRoute::Number(args.to_string())
    } else {
        CommandRoute::Search(args.to_string())
    }
}

/// Returns true if the message's first entity is a bot command
#[must_use]
pub fn starts_with_bot_command(msg: &Message) -> bool {
    msg.entities()
        .and_then(|entities| entities.first())
        .is_some_and(|entity| entity.kind == MessageEntityKind::BotCommand)
}

/// Split `text` into the leading command token and its argument text.
///
/// The command is the span of the first entity, which must be a bot command
/// at the start of the text. The arguments are everything after the single
/// separator character following it, whatever that character is.
#[must_use]
pub fn split_command<'a>(
    text: &'a str,
    entities: &[MessageEntity],
) -> Option<(&'a str, &'a str)> {
    let entity = entities.first()?;
    if entity.kind != MessageEntityKind::BotCommand || entity.offset != 0 {
        return None;
    }
    let command = text.get(..entity.length)?;
    let args = command
        .len()
        .checked_add(1)
        .and_then(|start| text.get(start..))
        .unwrap_or("");
    Some((command, args))
}

/// Argument text of a command message, `None` if it has no leading command
#[must_use]
pub fn command_args(msg: &Message) -> Option<String> {
    let (_, args) = split_command(msg.text()?, msg.entities()?)?;
    Some(args.to_string())
}

/// Returns true for `/xkcd` or `/xkcd@<bot_username>`, any case, with any
/// separator before the arguments.
#[must_use]
pub fn is_xkcd_command(msg: &Message, bot_username: &str) -> bool {
    let Some((command, _)) = msg
        .text()
        .zip(msg.entities())
        .and_then(|(text, entities)| split_command(text, entities))
    else {
        return false;
    };
    let Some(command) = command.strip_prefix('/') else {
        return false;
    };
    match command.split_once('@') {
        Some((name, mention)) => {
            name.eq_ignore_ascii_case("xkcd") && mention.eq_ignore_ascii_case(bot_username)
        }
        None => command.eq_ignore_ascii_case("xkcd"),
    }
}

/// Resolve a classified request to the comic number to reply with.
///
/// # Errors
///
/// Returns the fetch/search error, or `XkcdError::NoResults` if the search
/// came back empty.
pub async fn resolve_comic_number(
    service: &XkcdService,
    route: CommandRoute,
) -> Result<String, XkcdError> {
    match route {
        CommandRoute::Latest => Ok(service.latest().await?.num.to_string()),
        CommandRoute::Number(num) => Ok(num),
        CommandRoute::Search(query) => {
            let lines = service.relevant(&query).await?;
            let best = lines.first().ok_or(XkcdError::NoResults(query))?;
            Ok(leading_number(best).to_string())
        }
    }
}

/// Uniformly random comic number in `1..=latest`
#[must_use]
pub fn random_comic_number(latest: u32) -> u32 {
    rand::thread_rng().gen_range(1..=latest.max(1))
}

/// Build the answer list for an inline query.
///
/// An empty query yields the latest comic; otherwise up to
/// [`MAX_INLINE_RESULTS`] relevance hits with explanation-site thumbnails.
///
/// # Errors
///
/// Returns the fetch/search error, or the first malformed line or URL.
pub async fn inline_results(
    service: &XkcdService,
    query: &str,
    explain_base: &str,
) -> Result<Vec<InlineQueryResult>, XkcdError> {
    if query.is_empty() {
        let latest = service.latest().await?;
        return Ok(vec![inline_photo(latest.num, &latest.img)?]);
    }

    let explain_base = explain_base.trim_end_matches('/');
    service
        .relevant(query)
        .await?
        .iter()
        .take(MAX_INLINE_RESULTS)
        .map(|line| {
            let hit = RelevantHit::parse(line)?;
            inline_photo(&hit.num, &format!("{explain_base}{}", hit.url))
        })
        .collect()
}

/// Comic number requested by a hover-text callback, if `data` is one
#[must_use]
pub fn parse_alt_callback(data: &str) -> Option<u32> {
    let (_, num) = regex_captures!(r"^alt (\d+)$", data)?;
    num.parse().ok()
}

/// Hover text for a callback payload, or `None` if the payload is not ours.
///
/// # Errors
///
/// Returns the comic fetch error.
pub async fn alt_text(service: &XkcdService, data: &str) -> Result<Option<String>, XkcdError> {
    match parse_alt_callback(data) {
        Some(num) => Ok(Some(service.comic(num).await?.alt)),
        None => Ok(None),
    }
}

async fn reply_comic(bot: &Bot, msg: &Message, num: impl Display) -> Result<()> {
    bot.send_message(msg.chat.id, permalink(&num))
        .reply_markup(comic_keyboard(&num)?)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// `/xkcd [args]` handler
///
/// The arguments are taken from the raw message text, so `/xkcd` followed by
/// a newline is handled the same as `/xkcd` followed by a space.
///
/// # Errors
///
/// Returns an error if the comic cannot be resolved or the reply fails.
pub async fn xkcd(bot: Bot, msg: Message, service: &XkcdService) -> Result<()> {
    if !starts_with_bot_command(&msg) {
        return Ok(());
    }
    let Some(args) = command_args(&msg) else {
        return Ok(());
    };

    let route = classify_args(&args);
    debug!(?route, "Classified /xkcd request");
    let num = resolve_comic_number(service, route).await?;

    info!("Replying to chat {} with comic {num}", msg.chat.id);
    reply_comic(&bot, &msg, num).await
}

/// `/random` handler
///
/// # Errors
///
/// Returns an error if the latest comic cannot be fetched or the reply fails.
pub async fn random(bot: Bot, msg: Message, service: &XkcdService) -> Result<()> {
    let latest = service.latest().await?;
    let num = random_comic_number(latest.num);

    info!("Replying to chat {} with random comic {num}", msg.chat.id);
    reply_comic(&bot, &msg, num).await
}

/// `/help` and `/start` handler
///
/// # Errors
///
/// Returns an error if the message cannot be sent.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Inline-query handler
///
/// # Errors
///
/// Returns an error if building the results or answering the query fails.
pub async fn inline_query(
    bot: Bot,
    q: InlineQuery,
    service: &XkcdService,
    settings: &Settings,
) -> Result<()> {
    let results = inline_results(service, &q.query, &settings.explain_xkcd_url).await?;
    debug!(results = results.len(), query = %q.query, "Answering inline query");

    bot.answer_inline_query(q.id.clone(), results)
        .cache_time(settings.inline_cache_time())
        .await?;
    Ok(())
}

/// Callback-query handler for the "Hover text" button
///
/// # Errors
///
/// Returns an error if the comic cannot be fetched or the answer fails.
pub async fn callback_query(bot: Bot, q: CallbackQuery, service: &XkcdService) -> Result<()> {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(alt) = alt_text(service, data).await? else {
        return Ok(());
    };

    bot.answer_callback_query(q.id.clone())
        .text(alt)
        .show_alert(true)
        .cache_time(ALT_CALLBACK_CACHE_SECS)
        .await?;
    Ok(())
}
