//! Order Model
//!
//! Orders are append-only: created by the XML intake or the generator,
//! never updated or deleted by the service.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::serde_helpers::{deserialize_datetime, serialize_datetime};

/// Persisted order row (`orders` table)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub hash: String,
    pub token: String,
    pub number: Option<String>,
    pub name: Option<String>,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub status: Option<i32>,
    /// Creation timestamp, immutable after insert
    #[serde(
        serialize_with = "serialize_datetime",
        deserialize_with = "deserialize_datetime"
    )]
    pub create_date: NaiveDateTime,
    pub locale: String,
    pub currency: String,
    pub pay_type: i32,
    pub vat_type: Option<i32>,
    pub vat_number: Option<String>,
    pub tax_number: Option<String>,
    /// Discount percent
    pub discount: Option<Decimal>,
    /// Delivery cost in order currency
    pub delivery: Option<Decimal>,
    pub delivery_type: Option<i32>,
    pub delivery_time_min: Option<NaiveDate>,
    pub delivery_time_max: Option<NaiveDate>,
    pub delivery_index: Option<String>,
    pub delivery_country: Option<i32>,
    pub delivery_region: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_building: Option<String>,
    pub delivery_phone_code: Option<String>,
    pub delivery_phone: Option<String>,
    pub cur_rate: f64,
}

/// Line item belonging to exactly one order (`orders_article` table)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderArticle {
    pub id: i64,
    pub orders_id: i64,
    pub article_id: Option<i64>,
    pub amount: f64,
    /// Unit price in article currency
    pub price: Decimal,
    pub price_eur: Option<Decimal>,
    pub currency: Option<String>,
    /// Unit of measure (two letters)
    pub measure: Option<String>,
    pub delivery_time_min: Option<NaiveDate>,
    pub delivery_time_max: Option<NaiveDate>,
    pub weight: f64,
    pub multiple_pallet: Option<i16>,
    pub packaging_count: f64,
    pub pallet: f64,
    pub packaging: f64,
    pub swimming_pool: bool,
    pub cur_rate: f64,
}

/// Order ready to be inserted; the store assigns the id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewOrder {
    pub hash: String,
    pub token: String,
    pub number: Option<String>,
    pub name: Option<String>,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub status: Option<i32>,
    pub create_date: NaiveDateTime,
    pub locale: String,
    pub currency: String,
    pub pay_type: i32,
    pub vat_type: Option<i32>,
    pub vat_number: Option<String>,
    pub tax_number: Option<String>,
    pub discount: Option<Decimal>,
    pub delivery: Option<Decimal>,
    pub delivery_type: Option<i32>,
    pub delivery_time_min: Option<NaiveDate>,
    pub delivery_time_max: Option<NaiveDate>,
    pub delivery_index: Option<String>,
    pub delivery_country: Option<i32>,
    pub delivery_region: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_building: Option<String>,
    pub delivery_phone_code: Option<String>,
    pub delivery_phone: Option<String>,
    pub articles: Vec<NewOrderArticle>,
}

/// Line item of a [`NewOrder`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewOrderArticle {
    pub article_id: Option<i64>,
    pub amount: f64,
    pub price: Decimal,
    pub price_eur: Option<Decimal>,
    pub currency: Option<String>,
    pub measure: Option<String>,
    pub delivery_time_min: Option<NaiveDate>,
    pub delivery_time_max: Option<NaiveDate>,
    pub weight: f64,
    pub multiple_pallet: Option<i16>,
    pub packaging_count: f64,
    pub pallet: f64,
    pub packaging: f64,
    pub swimming_pool: bool,
}

/// `GET /orders/{id}` payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSummary {
    pub id: i64,
    #[serde(
        serialize_with = "serialize_datetime",
        deserialize_with = "deserialize_datetime"
    )]
    pub create_date: NaiveDateTime,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            create_date: order.create_date,
        }
    }
}

/// Order together with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithArticles {
    #[serde(flatten)]
    pub order: Order,
    pub articles: Vec<OrderArticle>,
}

/// `POST /soap` success payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderCreated {
    pub message: String,
    pub id: i64,
}

impl OrderCreated {
    pub fn new(id: i64) -> Self {
        Self {
            message: "Order created".to_string(),
            id,
        }
    }
}
