mod board;

pub use board::BoardScraper;

use scraper::Html;

pub struct Scraper {
    document: Html,
}

impl Scraper {
    pub fn new(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn board(&self) -> BoardScraper {
        BoardScraper::new(&self.document)
    }
}
