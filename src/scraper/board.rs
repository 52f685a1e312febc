use crate::error::{Result, ScraperError};
use scraper::{Html, Selector};

/// Folder name used when the page carries no usable title.
const FALLBACK_TITLE: &str = "Pinterest_Board";

pub struct BoardScraper<'a> {
    document: &'a Html,
}

impl<'a> BoardScraper<'a> {
    pub(crate) fn new(document: &'a Html) -> Self {
        Self { document }
    }

    /// Trimmed text of the page `<title>`, or a fixed fallback when the
    /// title is missing or empty.
    pub fn title(&self) -> Result<String> {
        let selector = Selector::parse("title")
            .map_err(|e| ScraperError::SelectorError(e.to_string()))?;

        let title = self
            .document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());

        Ok(title)
    }

    /// Candidate image URLs in document order.
    ///
    /// Reads `src`, falling back to `data-src` for lazy-loaded elements.
    /// A blank `src` counts as absent: lazy-load placeholders commonly
    /// carry `src=""` with the real URL in `data-src`. A URL qualifies
    /// only if it contains one of the allowed extension substrings;
    /// everything else is dropped silently.
    pub fn image_urls(&self, allowed_extensions: &[String]) -> Result<Vec<String>> {
        let selector =
            Selector::parse("img").map_err(|e| ScraperError::SelectorError(e.to_string()))?;

        let urls = self
            .document
            .select(&selector)
            .filter_map(|img| {
                let url = img
                    .value()
                    .attr("src")
                    .filter(|s| !s.trim().is_empty())
                    .or_else(|| img.value().attr("data-src"))?;

                if allowed_extensions.iter().any(|ext| url.contains(ext.as_str())) {
                    Some(url.to_string())
                } else {
                    None
                }
            })
            .collect();

        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::Scraper;

    fn allow_list() -> Vec<String> {
        vec![".jpg".to_string(), ".png".to_string()]
    }

    #[test]
    fn keeps_only_allowed_extensions_in_document_order() {
        let html = r#"
            <html><body>
                <img src="https://cdn.example.com/a.jpg">
                <img src="https://cdn.example.com/b.webp">
                <img src="https://cdn.example.com/c.png">
                <img src="https://cdn.example.com/d.gif">
                <img src="https://cdn.example.com/e.jpg?size=large">
            </body></html>
        "#;
        let scraper = Scraper::new(html);
        let urls = scraper.board().image_urls(&allow_list()).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/a.jpg",
                "https://cdn.example.com/c.png",
                "https://cdn.example.com/e.jpg?size=large",
            ]
        );
    }

    #[test]
    fn falls_back_to_data_src_for_lazy_elements() {
        let html = r#"
            <img data-src="https://cdn.example.com/lazy.jpg">
            <img src="https://cdn.example.com/eager.png" data-src="https://cdn.example.com/ignored.jpg">
        "#;
        let scraper = Scraper::new(html);
        let urls = scraper.board().image_urls(&allow_list()).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/lazy.jpg",
                "https://cdn.example.com/eager.png",
            ]
        );
    }

    #[test]
    fn blank_src_placeholder_falls_back_to_data_src() {
        let html = r#"
            <img src="" data-src="https://cdn.example.com/lazy1.jpg">
            <img src="   " data-src="https://cdn.example.com/lazy2.png">
        "#;
        let scraper = Scraper::new(html);
        let urls = scraper.board().image_urls(&allow_list()).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.com/lazy1.jpg",
                "https://cdn.example.com/lazy2.png",
            ]
        );
    }

    #[test]
    fn skips_elements_without_source_attributes() {
        let html = r#"<img alt="decorative"><img src="https://cdn.example.com/x.jpg">"#;
        let scraper = Scraper::new(html);
        let urls = scraper.board().image_urls(&allow_list()).unwrap();
        assert_eq!(urls, vec!["https://cdn.example.com/x.jpg"]);
    }

    #[test]
    fn empty_when_nothing_qualifies() {
        let html = r#"<img src="https://cdn.example.com/a.webp"><p>no pins here</p>"#;
        let scraper = Scraper::new(html);
        let urls = scraper.board().image_urls(&allow_list()).unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn custom_allow_list_admits_other_formats() {
        let html = r#"<img src="https://cdn.example.com/a.webp">"#;
        let scraper = Scraper::new(html);
        let urls = scraper
            .board()
            .image_urls(&[".webp".to_string()])
            .unwrap();
        assert_eq!(urls, vec!["https://cdn.example.com/a.webp"]);
    }

    #[test]
    fn title_is_trimmed() {
        let scraper = Scraper::new("<html><head><title>  My Board  </title></head></html>");
        assert_eq!(scraper.board().title().unwrap(), "My Board");
    }

    #[test]
    fn missing_title_uses_fallback() {
        let scraper = Scraper::new("<html><head></head><body></body></html>");
        assert_eq!(scraper.board().title().unwrap(), "Pinterest_Board");
    }

    #[test]
    fn empty_title_uses_fallback() {
        let scraper = Scraper::new("<html><head><title>   </title></head></html>");
        assert_eq!(scraper.board().title().unwrap(), "Pinterest_Board");
    }
}
