//! Product price lookup
//!
//! Fetches a product page and reads the `data-price-raw` attribute of the
//! first element carrying the `js-price-tag` class.

use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};
use shared::error::{AppError, ErrorCode};
use shared::models::{PriceQuote, PriceRequest};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Failed to fetch price: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to fetch price: upstream returned status code {0}")]
    Status(u16),
}

impl From<PriceError> for AppError {
    fn from(_: PriceError) -> Self {
        AppError::new(ErrorCode::PriceFetchFailed)
    }
}

/// Validated lookup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceKey {
    pub factory: String,
    pub collection: String,
    pub article: String,
}

#[derive(Clone)]
pub struct PriceFetcher {
    http: reqwest::Client,
    base_url: String,
    slug: Regex,
    price_tag: Selector,
}

impl PriceFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BoxError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            slug: Regex::new(r"^[a-zA-Z0-9_-]+$")?,
            price_tag: Selector::parse(".js-price-tag")
                .map_err(|e| format!("invalid price selector: {e}"))?,
        })
    }

    /// Check the three query parameters; every failure is reported
    pub fn validate(&self, request: &PriceRequest) -> Result<PriceKey, AppError> {
        let mut errors = Vec::new();
        let mut check = |field: &str, value: &Option<String>| -> String {
            let value = value.as_deref().unwrap_or("");
            if value.trim().is_empty() {
                errors.push(format!("{field}: This value should not be blank."));
            } else if !self.slug.is_match(value) {
                errors.push(format!("{field}: This value is not valid."));
            }
            value.to_string()
        };
        let factory = check("factory", &request.factory);
        let collection = check("collection", &request.collection);
        let article = check("article", &request.article);

        if !errors.is_empty() {
            return Err(
                AppError::validation("Invalid price request").with_detail("errors", errors),
            );
        }
        Ok(PriceKey {
            factory,
            collection,
            article,
        })
    }

    pub fn page_url(&self, key: &PriceKey) -> String {
        format!(
            "{}/{}/{}/a/{}",
            self.base_url, key.factory, key.collection, key.article
        )
    }

    /// Fetch the product page; `Ok(None)` when it carries no price tag
    pub async fn fetch_price(&self, key: &PriceKey) -> Result<Option<PriceQuote>, PriceError> {
        let response = self.http.get(self.page_url(key)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::Status(status.as_u16()));
        }
        let html = response.text().await?;

        Ok(self.extract_price(&html).map(|price| PriceQuote {
            price,
            factory: key.factory.clone(),
            collection: key.collection.clone(),
            article: key.article.clone(),
        }))
    }

    /// `data-price-raw` of the first `.js-price-tag` element
    pub fn extract_price(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let tag = document.select(&self.price_tag).next()?;
        tag.value().attr("data-price-raw").map(str::to_string)
    }
}
