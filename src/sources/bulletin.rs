use scraper::{Html, Selector};
use crate::sources::extract::{extract_bulletin, ExtractedBulletin};

/// Blocks the announcement pages are known to put their bulletins in, most
/// specific first. The bare body is the last resort for layout changes.
const BULLETIN_BLOCKS: [&str; 4] = [".timeline-detail", ".box-tinmoi", "article", "body"];

/// Digs the newest bulletin out of an announcement page: takes the text of
/// the first known block that yields a plausible bulletin.
pub fn parse_bulletin_page(html: &str) -> Option<ExtractedBulletin> {
    let document = Html::parse_document(html);
    BULLETIN_BLOCKS.iter().find_map(|block| {
        let selector = Selector::parse(block).expect("hardcoded selector must be valid");
        document.select(&selector).find_map(|element| {
            let text = element.text().collect::<String>();
            extract_bulletin(&text)
        })
    })
}
