use anyhow::{ensure, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use xkcd_bot::bot::handlers::{inline_results, resolve_comic_number, CommandRoute};
use xkcd_bot::config::Settings;
use xkcd_bot::xkcd::{XkcdApi, XkcdClient, XkcdService};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn live_service() -> (Settings, XkcdService) {
    let settings = Settings::default();
    let client = XkcdClient::new(&settings);
    let service = XkcdService::new(Arc::new(client), Duration::from_secs(600));
    (settings, service)
}

#[tokio::test]
#[ignore = "Requires network access to xkcd.com"]
async fn test_comic_api() -> Result<()> {
    init_tracing();
    let client = XkcdClient::new(&Settings::default());

    let latest = client.fetch_latest().await?;
    info!("Latest comic is {}", latest.num);
    ensure!(latest.num > 2000, "unexpected latest number {}", latest.num);

    let comic = client.fetch_comic(614).await?;
    ensure!(comic.num == 614, "wrong comic returned");
    ensure!(!comic.alt.is_empty(), "comic 614 has no hover text");
    Ok(())
}

#[tokio::test]
#[ignore = "Requires network access to relevantxkcd.appspot.com"]
async fn test_relevance_search() -> Result<()> {
    init_tracing();
    let (settings, service) = live_service();

    let num = resolve_comic_number(&service, CommandRoute::Search("tree house".to_string())).await?;
    info!("Best match for 'tree house' is {num}");
    ensure!(num.parse::<u32>().is_ok(), "non-numeric comic id {num:?}");

    let results = inline_results(&service, "python", &settings.explain_xkcd_url).await?;
    ensure!(!results.is_empty(), "no inline results for 'python'");
    ensure!(results.len() <= 50, "inline results not capped");
    Ok(())
}
