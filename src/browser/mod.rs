mod scroll;

pub use scroll::{ScrollOptions, ScrollOutcome};

use crate::config::BrowserConfig;
use crate::error::{BrowserError, Result};
pub use crate::{log_debug, log_info, log_warn};
use async_trait::async_trait;
use chromiumoxide::browser::BrowserConfig as CdpBrowserConfig;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// The browser-side surface the pipeline needs: navigate, measure, scroll,
/// grab the rendered HTML, and release the session. Kept as a trait so the
/// scroll-settle loop and the load sequence are testable without a real
/// browser.
#[async_trait]
pub trait BoardBrowser {
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Current scrollable height of the document body.
    async fn scroll_height(&self) -> Result<u64>;

    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Rendered HTML of the current page.
    async fn html(&self) -> Result<String>;

    /// Release the session. Infallible; shutdown problems are logged.
    async fn close(&mut self);
}

/// Navigate to the board, scroll until the page height settles, and return
/// the rendered HTML. The session is closed on every exit path, including
/// navigation failure.
pub async fn load_board<B: BoardBrowser + Send>(
    browser: &mut B,
    url: &str,
    options: &ScrollOptions,
) -> Result<String> {
    let result = drive(browser, url, options).await;
    browser.close().await;
    result
}

async fn drive<B: BoardBrowser + Send>(
    browser: &mut B,
    url: &str,
    options: &ScrollOptions,
) -> Result<String> {
    browser.navigate(url).await?;
    log_info!("[browser] Loading board content...");

    match scroll::settle(&*browser, options).await? {
        ScrollOutcome::Settled { height, scrolls } => {
            log_info!(
                "[browser] Page height settled at {} after {} scrolls",
                height,
                scrolls
            );
        }
        ScrollOutcome::GaveUp { attempts, height } => {
            log_warn!(
                "[browser] Page height did not stabilize after {} scrolls (last height {}); \
                 continuing with the content loaded so far",
                attempts,
                height
            );
        }
    }

    browser.html().await
}

/// A headless Chromium session driven over CDP.
pub struct BoardSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl BoardSession {
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut builder = CdpBrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .request_timeout(Duration::from_secs(config.navigation_timeout_secs))
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--mute-audio")
            .arg("--hide-scrollbars");

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref chrome_path) = config.chrome_path {
            builder = builder.chrome_executable(chrome_path);
        }

        let browser_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The handler stream must be polled for the session to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    log_debug!("[browser] Handler error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        log_info!(
            "[browser] Launched browser session (headless={})",
            config.headless
        );

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }
}

#[async_trait]
impl BoardBrowser for BoardSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn scroll_height(&self) -> Result<u64> {
        let height = self
            .page
            .evaluate("document.body.scrollHeight")
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?
            .into_value::<u64>()
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(height)
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.page
            .evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Content(e.to_string()).into())
    }

    async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            log_debug!("[browser] Close error: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        log_info!("[browser] Browser session released");
    }
}
