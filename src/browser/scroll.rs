use super::BoardBrowser;
use crate::error::Result;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ScrollOptions {
    /// Pause after each scroll command so lazy-loaded content can render.
    pub pause: Duration,
    /// Upper bound on scroll commands before giving up.
    pub max_attempts: u32,
}

/// Result of the scroll-settle loop.
#[derive(Debug, PartialEq, Eq)]
pub enum ScrollOutcome {
    /// Two consecutive height measurements were equal.
    Settled { height: u64, scrolls: u32 },
    /// The height was still changing when the attempt budget ran out.
    GaveUp { attempts: u32, height: u64 },
}

/// Scroll to the bottom until the page height stops growing.
///
/// Records the current height, then repeatedly scrolls, pauses, and
/// re-measures; stops the first time a measurement equals the previous one.
/// The loop is bounded by `max_attempts` so a page that never stabilizes
/// yields [`ScrollOutcome::GaveUp`] instead of spinning forever.
pub async fn settle<B: BoardBrowser + ?Sized>(
    browser: &B,
    options: &ScrollOptions,
) -> Result<ScrollOutcome> {
    let mut last_height = browser.scroll_height().await?;

    for attempt in 1..=options.max_attempts {
        browser.scroll_to_bottom().await?;
        tokio::time::sleep(options.pause).await;

        let new_height = browser.scroll_height().await?;
        if new_height == last_height {
            return Ok(ScrollOutcome::Settled {
                height: new_height,
                scrolls: attempt,
            });
        }
        last_height = new_height;
    }

    Ok(ScrollOutcome::GaveUp {
        attempts: options.max_attempts,
        height: last_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BrowserError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed sequence of height measurements, repeating the last
    /// one once exhausted, and counts scroll commands.
    struct MockPage {
        heights: Vec<u64>,
        reads: Mutex<usize>,
        scrolls: Mutex<u32>,
        grow_forever: bool,
    }

    impl MockPage {
        fn with_heights(heights: Vec<u64>) -> Self {
            Self {
                heights,
                reads: Mutex::new(0),
                scrolls: Mutex::new(0),
                grow_forever: false,
            }
        }

        fn growing() -> Self {
            Self {
                heights: Vec::new(),
                reads: Mutex::new(0),
                scrolls: Mutex::new(0),
                grow_forever: true,
            }
        }

        fn scrolls(&self) -> u32 {
            *self.scrolls.lock().unwrap()
        }
    }

    #[async_trait]
    impl BoardBrowser for MockPage {
        async fn navigate(&self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn scroll_height(&self) -> Result<u64> {
            let mut reads = self.reads.lock().unwrap();
            let height = if self.grow_forever {
                100 * (*reads as u64 + 1)
            } else {
                self.heights[(*reads).min(self.heights.len() - 1)]
            };
            *reads += 1;
            Ok(height)
        }

        async fn scroll_to_bottom(&self) -> Result<()> {
            *self.scrolls.lock().unwrap() += 1;
            Ok(())
        }

        async fn html(&self) -> Result<String> {
            Err(BrowserError::Content("not a real page".into()).into())
        }

        async fn close(&mut self) {}
    }

    fn options(max_attempts: u32) -> ScrollOptions {
        ScrollOptions {
            pause: Duration::ZERO,
            max_attempts,
        }
    }

    #[tokio::test]
    async fn terminates_on_first_repeated_height() {
        let page = MockPage::with_heights(vec![100, 200, 200]);
        let outcome = settle(&page, &options(30)).await.unwrap();
        assert_eq!(
            outcome,
            ScrollOutcome::Settled {
                height: 200,
                scrolls: 2
            }
        );
        assert_eq!(page.scrolls(), 2);
    }

    #[tokio::test]
    async fn already_settled_page_needs_one_scroll() {
        let page = MockPage::with_heights(vec![500, 500]);
        let outcome = settle(&page, &options(30)).await.unwrap();
        assert_eq!(
            outcome,
            ScrollOutcome::Settled {
                height: 500,
                scrolls: 1
            }
        );
    }

    #[tokio::test]
    async fn gives_up_when_height_never_stabilizes() {
        let page = MockPage::growing();
        let outcome = settle(&page, &options(5)).await.unwrap();
        assert!(matches!(
            outcome,
            ScrollOutcome::GaveUp {
                attempts: 5,
                height: _
            }
        ));
        assert_eq!(page.scrolls(), 5);
    }
}
