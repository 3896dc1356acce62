//! XML order intake
//!
//! Accepts an `<order>` document, validates it and turns it into a
//! [`NewOrder`]. The server stamps `create_date`, `hash` and `token`.

use std::str::FromStr;

use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{NewOrder, NewOrderArticle};
use shared::util::now_naive;
use thiserror::Error;

use crate::db::OrderStore;
use crate::error::ServiceResult;
use crate::util::{generate_hash, generate_token};

const DEFAULT_LOCALE: &str = "en";
const DEFAULT_CURRENCY: &str = "EUR";
const DEFAULT_PAY_TYPE: i32 = 1;

/// `NUMERIC(precision, scale)` column bounds
#[derive(Debug, Clone, Copy)]
struct Numeric {
    precision: u32,
    scale: u32,
}

const DISCOUNT: Numeric = Numeric {
    precision: 5,
    scale: 2,
};
const AMOUNT: Numeric = Numeric {
    precision: 12,
    scale: 2,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Content-Type must be application/xml or text/xml")]
    UnsupportedContentType,

    #[error("Invalid XML: {0}")]
    Malformed(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for field {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },
}

impl From<IntakeError> for AppError {
    fn from(e: IntakeError) -> Self {
        match e {
            IntakeError::UnsupportedContentType => AppError::new(ErrorCode::UnsupportedContentType),
            IntakeError::Malformed(reason) => {
                AppError::new(ErrorCode::MalformedOrderXml).with_detail("reason", reason)
            }
            IntakeError::MissingField(field) => AppError::required_field(field),
            IntakeError::InvalidValue { field, value } => AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("Invalid value for field: {field}"),
            )
            .with_detail("field", field)
            .with_detail("value", value),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrderXml {
    name: Option<String>,
    user_id: Option<String>,
    number: Option<String>,
    status: Option<String>,
    email: Option<String>,
    locale: Option<String>,
    currency: Option<String>,
    pay_type: Option<String>,
    vat_type: Option<String>,
    vat_number: Option<String>,
    tax_number: Option<String>,
    discount: Option<String>,
    delivery: Option<String>,
    delivery_type: Option<String>,
    delivery_time_min: Option<String>,
    delivery_time_max: Option<String>,
    delivery_index: Option<String>,
    delivery_country: Option<String>,
    delivery_region: Option<String>,
    delivery_city: Option<String>,
    delivery_address: Option<String>,
    delivery_building: Option<String>,
    delivery_phone_code: Option<String>,
    delivery_phone: Option<String>,
    articles: Option<ArticlesXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArticlesXml {
    article: Vec<ArticleXml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArticleXml {
    article_id: Option<String>,
    amount: Option<String>,
    price: Option<String>,
    price_eur: Option<String>,
    currency: Option<String>,
    measure: Option<String>,
    delivery_time_min: Option<String>,
    delivery_time_max: Option<String>,
    weight: Option<String>,
    multiple_pallet: Option<String>,
    packaging_count: Option<String>,
    pallet: Option<String>,
    packaging: Option<String>,
    swimming_pool: Option<String>,
}

/// Accept `application/xml` and `text/xml`, parameters allowed
pub fn check_content_type(header: Option<&str>) -> Result<(), IntakeError> {
    let mime = header
        .and_then(|h| h.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();
    match mime.as_str() {
        "application/xml" | "text/xml" => Ok(()),
        _ => Err(IntakeError::UnsupportedContentType),
    }
}

fn check_root(body: &str) -> Result<(), IntakeError> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return if e.name().as_ref() == b"order" {
                    Ok(())
                } else {
                    Err(IntakeError::Malformed(format!(
                        "root element must be <order>, found <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )))
                };
            }
            Ok(Event::Eof) => return Err(IntakeError::Malformed("empty document".into())),
            Ok(_) => continue,
            Err(e) => return Err(IntakeError::Malformed(e.to_string())),
        }
    }
}

/// Blank elements count as absent
fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse<T: FromStr>(field: &'static str, value: Option<String>) -> Result<Option<T>, IntakeError> {
    text(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| IntakeError::InvalidValue { field, value: v })
        })
        .transpose()
}

/// Text that must fit a `VARCHAR(max_chars)` column
fn bounded(
    field: &'static str,
    value: Option<String>,
    max_chars: usize,
) -> Result<Option<String>, IntakeError> {
    match text(value) {
        Some(v) if v.chars().count() > max_chars => {
            Err(IntakeError::InvalidValue { field, value: v })
        }
        v => Ok(v),
    }
}

/// Decimal rounded to the column scale; integer digits beyond the precision are rejected
fn money(
    field: &'static str,
    value: Option<String>,
    column: Numeric,
) -> Result<Option<Decimal>, IntakeError> {
    let limit = Decimal::from(10i64.pow(column.precision - column.scale));
    text(value)
        .map(|v| {
            v.parse::<Decimal>()
                .ok()
                .map(|d| {
                    d.round_dp_with_strategy(column.scale, RoundingStrategy::MidpointAwayFromZero)
                })
                .filter(|d| d.abs() < limit)
                .ok_or(IntakeError::InvalidValue { field, value: v })
        })
        .transpose()
}

fn date(field: &'static str, value: Option<String>) -> Result<Option<NaiveDate>, IntakeError> {
    text(value)
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|_| IntakeError::InvalidValue { field, value: v })
        })
        .transpose()
}

fn flag(field: &'static str, value: Option<String>) -> Result<bool, IntakeError> {
    match text(value).as_deref() {
        None | Some("0") | Some("false") => Ok(false),
        Some("1") | Some("true") => Ok(true),
        Some(other) => Err(IntakeError::InvalidValue {
            field,
            value: other.to_string(),
        }),
    }
}

fn article(raw: ArticleXml) -> Result<NewOrderArticle, IntakeError> {
    Ok(NewOrderArticle {
        article_id: parse("article_id", raw.article_id)?,
        amount: parse("amount", raw.amount)?.unwrap_or(0.0),
        price: money("price", raw.price, AMOUNT)?.unwrap_or_default(),
        price_eur: money("price_eur", raw.price_eur, AMOUNT)?,
        currency: bounded("currency", raw.currency, 3)?,
        measure: bounded("measure", raw.measure, 2)?,
        delivery_time_min: date("delivery_time_min", raw.delivery_time_min)?,
        delivery_time_max: date("delivery_time_max", raw.delivery_time_max)?,
        weight: parse("weight", raw.weight)?.unwrap_or(0.0),
        multiple_pallet: parse("multiple_pallet", raw.multiple_pallet)?,
        packaging_count: parse("packaging_count", raw.packaging_count)?.unwrap_or(0.0),
        pallet: parse("pallet", raw.pallet)?.unwrap_or(0.0),
        packaging: parse("packaging", raw.packaging)?.unwrap_or(0.0),
        swimming_pool: flag("swimming_pool", raw.swimming_pool)?,
    })
}

/// Parse an `<order>` document into an insertable order
pub fn parse_order_xml(body: &str) -> Result<NewOrder, IntakeError> {
    check_root(body)?;
    let raw: OrderXml =
        quick_xml::de::from_str(body).map_err(|e| IntakeError::Malformed(e.to_string()))?;

    let name = bounded("name", raw.name, 200)?.ok_or(IntakeError::MissingField("name"))?;

    let articles = raw
        .articles
        .map(|a| a.article)
        .unwrap_or_default()
        .into_iter()
        .map(article)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NewOrder {
        hash: generate_hash(),
        token: generate_token(),
        number: bounded("number", raw.number, 32)?,
        name: Some(name),
        user_id: parse("user_id", raw.user_id)?,
        email: bounded("email", raw.email, 100)?,
        status: parse("status", raw.status)?,
        create_date: now_naive(),
        locale: bounded("locale", raw.locale, 5)?.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
        currency: bounded("currency", raw.currency, 3)?
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        pay_type: parse("pay_type", raw.pay_type)?.unwrap_or(DEFAULT_PAY_TYPE),
        vat_type: parse("vat_type", raw.vat_type)?,
        vat_number: bounded("vat_number", raw.vat_number, 100)?,
        tax_number: bounded("tax_number", raw.tax_number, 50)?,
        discount: money("discount", raw.discount, DISCOUNT)?,
        delivery: money("delivery", raw.delivery, AMOUNT)?,
        delivery_type: parse("delivery_type", raw.delivery_type)?,
        delivery_time_min: date("delivery_time_min", raw.delivery_time_min)?,
        delivery_time_max: date("delivery_time_max", raw.delivery_time_max)?,
        delivery_index: bounded("delivery_index", raw.delivery_index, 20)?,
        delivery_country: parse("delivery_country", raw.delivery_country)?,
        delivery_region: bounded("delivery_region", raw.delivery_region, 50)?,
        delivery_city: bounded("delivery_city", raw.delivery_city, 200)?,
        delivery_address: bounded("delivery_address", raw.delivery_address, 300)?,
        delivery_building: bounded("delivery_building", raw.delivery_building, 200)?,
        delivery_phone_code: bounded("delivery_phone_code", raw.delivery_phone_code, 20)?,
        delivery_phone: bounded("delivery_phone", raw.delivery_phone, 20)?,
        articles,
    })
}

/// Validate and persist an XML order, returning its id
pub async fn create_order(
    store: &dyn OrderStore,
    content_type: Option<&str>,
    body: &[u8],
) -> ServiceResult<i64> {
    check_content_type(content_type).map_err(AppError::from)?;
    let body = std::str::from_utf8(body)
        .map_err(|e| AppError::from(IntakeError::Malformed(e.to_string())))?;
    let order = parse_order_xml(body).map_err(AppError::from)?;
    let article_count = order.articles.len();
    let id = store.insert_order(order).await?;
    tracing::info!(order_id = id, articles = article_count, "Order created");
    Ok(id)
}
