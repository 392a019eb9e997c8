use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::adapters::SourceAdapter;
use crate::app::{EstuaryError, Result};
use crate::domain::{FeedResult, Item};
use crate::fetcher::{FetchRequest, Fetcher};

const PROMOTIONS_URL: &str = "https://store-site-backend-static-ipv4.ak.epicgames.com/freeGamesPromotions?locale=en-US&country=GB&allowCountries=GB";
const FREE_GAMES_URL: &str = "https://store.epicgames.com/en-US/free-games";

fn default_max_limit() -> usize {
    5
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FreeGamesArgs {
    #[serde(default = "default_max_limit")]
    max_limit: usize,
}

/// Epic free-games catalog. Giveaways running right now lead the list;
/// announced ones trail it with a `Soon: ` prefix.
pub struct EpicFreeGamesAdapter {
    fetcher: Arc<dyn Fetcher>,
}

impl EpicFreeGamesAdapter {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

// Only the fields the classification needs; everything optional so one
// oddly-shaped catalog entry cannot fail the whole response.
#[derive(Debug, Deserialize)]
struct PromotionsResponse {
    data: PromotionsData,
}

#[derive(Debug, Deserialize)]
struct PromotionsData {
    #[serde(rename = "Catalog")]
    catalog: CatalogSection,
}

#[derive(Debug, Deserialize)]
struct CatalogSection {
    #[serde(rename = "searchStore")]
    search_store: SearchStore,
}

#[derive(Debug, Deserialize)]
struct SearchStore {
    elements: Vec<CatalogElement>,
}

#[derive(Debug, Deserialize)]
struct CatalogElement {
    title: Option<String>,
    promotions: Option<Promotions>,
    #[serde(rename = "catalogNs", default)]
    catalog_ns: CatalogNs,
}

#[derive(Debug, Deserialize)]
struct Promotions {
    #[serde(rename = "promotionalOffers", default)]
    current: Vec<OfferGroup>,
    #[serde(rename = "upcomingPromotionalOffers", default)]
    upcoming: Vec<OfferGroup>,
}

#[derive(Debug, Deserialize)]
struct OfferGroup {
    #[serde(rename = "promotionalOffers", default)]
    offers: Vec<Offer>,
}

#[derive(Debug, Deserialize)]
struct Offer {
    #[serde(rename = "discountSetting")]
    discount_setting: Option<DiscountSetting>,
}

#[derive(Debug, Deserialize)]
struct DiscountSetting {
    #[serde(rename = "discountPercentage")]
    discount_percentage: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogNs {
    #[serde(default)]
    mappings: Vec<PageMapping>,
}

#[derive(Debug, Deserialize)]
struct PageMapping {
    #[serde(rename = "pageSlug")]
    page_slug: Option<String>,
}

/// A promotional window is "free" when its nearest offer group contains a
/// 0%-discount offer.
fn has_free_offer(groups: &[OfferGroup]) -> bool {
    groups.first().is_some_and(|group| {
        group.offers.iter().any(|offer| {
            offer
                .discount_setting
                .as_ref()
                .and_then(|d| d.discount_percentage)
                == Some(0)
        })
    })
}

fn product_url(element: &CatalogElement) -> String {
    element
        .catalog_ns
        .mappings
        .iter()
        .find_map(|m| m.page_slug.as_deref())
        .map(|slug| format!("https://store.epicgames.com/en-US/p/{slug}"))
        .unwrap_or_else(|| FREE_GAMES_URL.to_string())
}

fn classify(elements: Vec<CatalogElement>) -> Vec<Item> {
    let mut items = Vec::new();
    for element in elements {
        let (Some(title), Some(promotions)) = (&element.title, &element.promotions) else {
            continue;
        };
        let link = product_url(&element);
        if has_free_offer(&promotions.current) {
            items.insert(0, Item::new(title.clone(), link.clone()));
        }
        if has_free_offer(&promotions.upcoming) {
            items.push(Item::new(format!("Soon: {title}"), link));
        }
        // Neither window free: not a giveaway, skip silently.
    }
    items
}

#[async_trait]
impl SourceAdapter for EpicFreeGamesAdapter {
    async fn execute(&self, args: Value) -> Result<FeedResult> {
        let args: FreeGamesArgs = serde_json::from_value(args)?;
        let body = self
            .fetcher
            .fetch(FetchRequest::get(PROMOTIONS_URL))
            .await?
            .body()?;
        let parsed: PromotionsResponse = serde_json::from_slice(&body)
            .map_err(|e| EstuaryError::Parse(format!("free games response: {e}")))?;

        let mut items = classify(parsed.data.catalog.search_store.elements);
        items.truncate(args.max_limit);
        Ok(FeedResult::new(
            "epic free games",
            "https://epicgames.com/freegames",
            items,
        ))
    }
}
