mod browser;
mod client;
mod config;
mod download;
mod error;
mod logging;
mod scraper;
mod utils;

use crate::browser::{load_board, BoardSession, ScrollOptions};
use crate::client::Client;
use crate::config::Config;
use crate::download::Downloader;
use crate::error::{ConfigError, Result};
use crate::logging::{init_logging, parse_log_level, LoggerConfig};
use crate::scraper::Scraper;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load("config.toml")?;
    // Initialize logging with custom configuration
    let logger_config = LoggerConfig {
        directory: config.logging.directory.clone(),
        file_name: config.logging.filename.clone(),
        rotation: tracing_appender::rolling::Rotation::DAILY,
        level: parse_log_level(&config.logging.level)?,
    };

    init_logging(logger_config)?;

    log_info!("[main] Starting scraper...");

    let board_url = if config.board_url.is_empty() {
        prompt_board_url()?
    } else {
        config.board_url.clone()
    };

    log_info!("[main] Loading board: {}", board_url);

    let mut session = BoardSession::launch(&config.browser).await?;

    let scroll_options = ScrollOptions {
        pause: Duration::from_secs(config.browser.scroll_pause_secs),
        max_attempts: config.browser.max_scroll_attempts,
    };

    // load_board releases the session on every exit path.
    match load_board(&mut session, &board_url, &scroll_options).await {
        Ok(html) => {
            if let Err(e) = process_board(&html, &config).await {
                log_error!(e => "[main] Error processing the board");
            }
        }
        Err(e) => log_error!(e => "[main] Error fetching the board"),
    }

    log_info!("[main] Download completed.");
    Ok(())
}

/// Extract candidates from the rendered HTML and download them into a
/// folder named after the sanitized page title.
async fn process_board(html: &str, config: &Config) -> Result<()> {
    let scraper = Scraper::new(html);
    let board = scraper.board();

    let title = board.title()?;
    let folder = PathBuf::from(utils::sanitize_folder_name(&title));
    utils::ensure_directory(&folder)?;
    log_info!("[main] Downloading pins to folder: {:?}", folder);

    let candidates = board.image_urls(&config.download.allowed_extensions)?;
    log_info!("[main] Found {} candidate images", candidates.len());

    let client = Client::builder()
        .header("user-agent", "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36")?
        .header("accept", "image/avif,image/webp,image/apng,image/*,*/*;q=0.8")?
        .chrome_impersonation(true)
        .timeout(Duration::from_secs(config.download.request_timeout_secs))
        .build()?;

    let mut downloader = Downloader::new(client, folder, config.download.file_prefix.clone());
    let saved = downloader.run(&candidates).await;

    if saved == 0 {
        log_info!("[main] No valid pins found.");
    } else {
        log_info!("[main] Saved {} pins", saved);
    }

    Ok(())
}

/// Read the board URL from stdin, matching the interactive invocation.
fn prompt_board_url() -> Result<String> {
    print!("Enter the board URL: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    let url = line.trim().to_string();
    if url.is_empty() {
        return Err(ConfigError::InvalidValue("No board URL provided".to_string()).into());
    }
    Ok(url)
}
