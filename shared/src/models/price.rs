//! Product price lookup

use serde::{Deserialize, Serialize};

/// `GET /price` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceRequest {
    pub factory: Option<String>,
    pub collection: Option<String>,
    pub article: Option<String>,
}

/// Price scraped from a product page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Raw price text as published (`data-price-raw`)
    pub price: String,
    pub factory: String,
    pub collection: String,
    pub article: String,
}
