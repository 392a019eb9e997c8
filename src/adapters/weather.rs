use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::SourceAdapter;
use crate::app::{EstuaryError, Result};
use crate::domain::{FeedResult, Item};
use crate::fetcher::{FetchRequest, Fetcher};

fn default_location() -> u64 {
    // Edinburgh
    2650225
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WeatherArgs {
    #[serde(default = "default_location")]
    id: u64,
}

/// Six-day forecast scraped from the BBC weather page for one location id.
pub struct WeatherAdapter {
    fetcher: Arc<dyn Fetcher>,
}

impl WeatherAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

const NOW_TEMP_SELECTOR: &str = "#wr-forecast > div.wr-time-slot-container > div > div.wr-time-slot-container__details-container > div.wr-time-slot-container__slots > div > div > div > div.wr-time-slot-list__item.wr-time-slot-list__item--time-slots > ol > li:nth-child(1) > button > div.wr-time-slot-primary.wr-js-time-slot-primary div.wr-time-slot-primary__body > div.wr-time-slot-primary__weather-curve > div > div > div.wr-time-slot-primary__temperature > span > span.wr-value--temperature--c";
const NOW_DESC_SELECTOR: &str = "#daylink-0 > div:nth-child(4) > div:nth-child(2) > div:nth-child(1)";

fn day_selectors(day: u8) -> (String, String, String) {
    (
        format!("#daylink-{day} > div.wr-day__title.wr-js-day-content-title > div > span.wr-date__longish"),
        format!("#daylink-{day} > div.wr-day__body > div.wr-day__weather-type-description-container > div"),
        format!("#daylink-{day} > div.wr-day__body > div.wr-day__details-container > div > div.wr-day__temperature > div > div.wr-day-temperature__high > span.wr-day-temperature__high-value > span > span.wr-value--temperature--c"),
    )
}

/// First text node matched by `selector_str`, trimmed. A miss is a shape
/// error: this page's layout either matches entirely or not at all.
fn text_at(doc: &Html, selector_str: &str) -> Result<String> {
    let sel = Selector::parse(selector_str)
        .map_err(|e| EstuaryError::Parse(format!("bad selector {selector_str:?}: {e}")))?;
    doc.select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .ok_or_else(|| EstuaryError::Parse(format!("no node matching {selector_str:?}")))
}

fn parse_forecast(html: &str, page_url: &str) -> Result<Vec<Item>> {
    let doc = Html::parse_document(html);

    let now_temp = text_at(&doc, NOW_TEMP_SELECTOR)?;
    let now_desc = text_at(&doc, NOW_DESC_SELECTOR)?;
    let mut items = vec![Item::new(format!("{now_temp} {now_desc} - Today"), page_url)];

    for day in 1..=5 {
        let (day_sel, desc_sel, temp_sel) = day_selectors(day);
        let week_day = text_at(&doc, &day_sel)?;
        let desc = text_at(&doc, &desc_sel)?;
        let temp = text_at(&doc, &temp_sel)?;
        items.push(Item::new(format!("{temp} {desc} - {week_day}"), page_url));
    }
    Ok(items)
}

#[async_trait]
impl SourceAdapter for WeatherAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let args: WeatherArgs = serde_json::from_value(args)?;
        let url = format!("https://www.bbc.com/weather/{}", args.id);
        let html = self
            .fetcher
            .fetch(FetchRequest::get(url.as_str()))
            .await?
            .text()?;
        Ok(FeedResult::new("weather", url.clone(), parse_forecast(&html, &url)?))
    }
}
