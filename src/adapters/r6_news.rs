use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::{selector, SourceAdapter};
use crate::app::{EstuaryError, Result};
use crate::domain::{FeedResult, Item};
use crate::fetcher::{FetchRequest, Fetcher};

const NEWS_URL: &str = "https://www.ubisoft.com/en-us/game/rainbow-six/siege/news-updates";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct R6NewsArgs {}

/// Rainbow Six Siege news and patch notes from the Ubisoft updates feed.
pub struct R6NewsAdapter {
    fetcher: Arc<dyn Fetcher>,
}

impl R6NewsAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

/// A feed entry without its title node or href means the page layout moved;
/// that fails the whole extraction rather than silently emitting gaps.
fn parse_updates(html: &str) -> Result<Vec<Item>> {
    let doc = Html::parse_document(html);
    let item_sel = selector(".updatesFeed__item");
    let title_sel = selector(".updatesFeed__item__wrapper__content__title");

    let mut items = Vec::new();
    for node in doc.select(&item_sel) {
        let title = node
            .select(&title_sel)
            .next()
            .and_then(|t| t.value().attr("data-innertext"))
            .ok_or_else(|| EstuaryError::Parse("updates feed entry without title".into()))?;
        let href = node
            .value()
            .attr("href")
            .ok_or_else(|| EstuaryError::Parse("updates feed entry without link".into()))?;
        items.push(Item::new(title, format!("https://www.ubisoft.com{href}")));
    }
    Ok(items)
}

#[async_trait]
impl SourceAdapter for R6NewsAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let _args: R6NewsArgs = serde_json::from_value(args)?;
        let html = self
            .fetcher
            .fetch(FetchRequest::get(NEWS_URL))
            .await?
            .text()?;
        Ok(FeedResult::new("r6news", NEWS_URL, parse_updates(&html)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPDATES_PAGE: &str = r#"
<html><body>
  <a class="updatesFeed__item" href="/en-us/game/rainbow-six/siege/news-updates/1">
    <div class="updatesFeed__item__wrapper__content__title" data-innertext="Patch Notes Y9S1"></div>
  </a>
  <a class="updatesFeed__item" href="/en-us/game/rainbow-six/siege/news-updates/2">
    <div class="updatesFeed__item__wrapper__content__title" data-innertext="Dev Blog"></div>
  </a>
</body></html>"#;

    #[test]
    fn test_parse_extracts_titles_and_absolute_links() {
        let items = parse_updates(UPDATES_PAGE).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Patch Notes Y9S1");
        assert_eq!(
            items[0].link,
            "https://www.ubisoft.com/en-us/game/rainbow-six/siege/news-updates/1"
        );
    }

    #[test]
    fn test_restructured_entry_is_a_shape_error() {
        let html = r#"<a class="updatesFeed__item" href="/x"><div class="totally-new-class"></div></a>"#;
        assert!(matches!(
            parse_updates(html),
            Err(EstuaryError::Parse(_))
        ));
    }

    #[test]
    fn test_no_entries_is_an_empty_success() {
        assert!(parse_updates("<html><body></body></html>").unwrap().is_empty());
    }
}
