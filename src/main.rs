use dotenvy::dotenv;
use lazy_regex::regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};
use xkcd_bot::config::Settings;
use xkcd_bot::runner::run_bot;

/// Mask Telegram bot tokens wherever they appear in a log line.
fn redact(input: &str) -> String {
    let output = regex!(r"(https?://[^/]+/bot)([0-9]+:[A-Za-z0-9_-]+)(/['\s]*)")
        .replace_all(input, "$1[TELEGRAM_TOKEN]$3");
    let output =
        regex!(r"[0-9]{8,10}:[A-Za-z0-9_-]{35}").replace_all(&output, "[TELEGRAM_TOKEN]");
    regex!(r"(bot[0-9]{8,10}:)[A-Za-z0-9_-]+")
        .replace_all(&output, "$1[TELEGRAM_TOKEN]")
        .into_owned()
}

/// Stderr writer that passes every chunk through [`redact`]
struct RedactingWriter<W: Write>(W);

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        self.0.write_all(redact(&line).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

fn redacting_stderr() -> RedactingWriter<io::Stderr> {
    RedactingWriter(io::stderr())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    info!("Starting xkcd bot...");

    let settings = init_settings();

    run_bot(settings).await;
}

fn init_logging() {
    let debug_mode = std::env::var("DEBUG_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let filter = if debug_mode {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("xkcd_bot=info,teloxide=warn,hyper=warn,h2=error,reqwest=warn,tokio=warn")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(redacting_stderr))
        .init();
}

fn init_settings() -> Arc<Settings> {
    match Settings::new() {
        Ok(s) => {
            info!(
                "Configuration loaded successfully (inline cache time: {}s).",
                s.inline_cache_time()
            );
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_bot_tokens() {
        let token = "123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw1";

        let url = format!("error sending request for url (https://api.telegram.org/bot{token}/GetMe)");
        let redacted = redact(&url);
        assert!(!redacted.contains(token));
        assert!(redacted.contains("/bot[TELEGRAM_TOKEN]/GetMe"));

        assert_eq!(redact(&format!("token={token}")), "token=[TELEGRAM_TOKEN]");
        assert_eq!(redact("polling bot123456789:short"), "polling bot123456789:[TELEGRAM_TOKEN]");
        assert_eq!(redact("nothing secret here"), "nothing secret here");
    }

    #[test]
    fn test_writer_redacts_and_reports_input_length() -> io::Result<()> {
        let line = b"GET https://api.telegram.org/bot123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw1/getUpdates\n";
        let mut writer = RedactingWriter(Vec::new());

        assert_eq!(writer.write(line)?, line.len());
        let written = String::from_utf8_lossy(&writer.0);
        assert!(written.contains("[TELEGRAM_TOKEN]"));
        assert!(!written.contains("AAHdqTcv"));
        Ok(())
    }
}
