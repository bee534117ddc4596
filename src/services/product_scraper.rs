use std::{ops::RangeInclusive, time::Duration};

use rand::Rng;
use scraper::{ElementRef, Html, Selector};

use crate::domain::product::{parse_price, random_rating, PriceError, Product};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("request to product listing failed")]
    Request(#[from] reqwest::Error),
    #[error("product listing answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid selector {0}")]
    Selector(String),
    #[error("product #{position} has no {field} element")]
    MissingField {
        field: &'static str,
        position: usize,
    },
    #[error("product #{position} has an invalid price")]
    Price {
        position: usize,
        #[source]
        source: PriceError,
    },
}

pub struct ProductScraper {
    client: reqwest::Client,
    source_url: String,
    rating_range: RangeInclusive<f64>,
}

impl ProductScraper {
    pub fn new(
        source_url: String,
        timeout: Duration,
        rating_range: RangeInclusive<f64>,
    ) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(ProductScraper {
            client,
            source_url,
            rating_range,
        })
    }

    pub async fn fetch_products<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<Product>, ScrapeError> {
        log::info!("Fetching product listing from {}", self.source_url);

        let response = self.client.get(&self.source_url).send().await?;
        if !response.status().is_success() {
            return Err(ScrapeError::Status(response.status()));
        }
        let html_content = response.text().await?;

        let products = parse_products(&html_content, rng, &self.rating_range)?;
        log::info!("Scraped {} products", products.len());

        Ok(products)
    }
}

struct ListingSelectors {
    item: Selector,
    title: Selector,
    price: Selector,
    description: Selector,
}

impl ListingSelectors {
    fn new() -> Result<Self, ScrapeError> {
        Ok(ListingSelectors {
            item: selector(".thumbnail")?,
            title: selector(".title")?,
            price: selector(".price")?,
            description: selector(".description")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{css:?}: {e:?}")))
}

pub fn parse_products<R: Rng + ?Sized>(
    html_content: &str,
    rng: &mut R,
    rating_range: &RangeInclusive<f64>,
) -> Result<Vec<Product>, ScrapeError> {
    let selectors = ListingSelectors::new()?;
    let html_document = Html::parse_document(html_content);

    html_document
        .select(&selectors.item)
        .enumerate()
        .map(|(index, item)| -> Result<Product, ScrapeError> {
            let position = index + 1;
            let title = field_text(item, &selectors.title, "title", position)?;
            let price = field_text(item, &selectors.price, "price", position)?;
            let description = field_text(item, &selectors.description, "description", position)?;

            let price =
                parse_price(&price).map_err(|source| ScrapeError::Price { position, source })?;

            Ok(Product {
                title,
                price,
                rating: random_rating(&mut *rng, rating_range),
                description,
            })
        })
        .collect()
}

fn field_text(
    item: ElementRef<'_>,
    selector: &Selector,
    field: &'static str,
    position: usize,
) -> Result<String, ScrapeError> {
    item.select(selector)
        .next()
        .map(stripped_text)
        .ok_or(ScrapeError::MissingField { field, position })
}

fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}
