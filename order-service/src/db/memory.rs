//! In-process order store
//!
//! Used when no `DATABASE_URL` is configured and by the test suite. Period
//! keys come from [`GroupBy::period_key`], which renders the same strings
//! as the PostgreSQL `to_char` patterns.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::models::{
    DateRange, GroupBy, NewOrder, NewOrderArticle, Order, OrderArticle, PeriodCount,
};
use tokio::sync::RwLock;

use super::{Grant, OrderStore, StoreResult};

#[derive(Default)]
struct Inner {
    orders: Vec<Order>,
    articles: Vec<OrderArticle>,
    next_order_id: i64,
    next_article_id: i64,
}

impl Inner {
    fn push(&mut self, order: NewOrder) -> i64 {
        self.next_order_id += 1;
        let id = self.next_order_id;

        for article in order.articles {
            self.next_article_id += 1;
            self.articles
                .push(article_row(self.next_article_id, id, article));
        }

        self.orders.push(Order {
            id,
            hash: order.hash,
            token: order.token,
            number: order.number,
            name: order.name,
            user_id: order.user_id,
            email: order.email,
            status: order.status,
            create_date: order.create_date,
            locale: order.locale,
            currency: order.currency,
            pay_type: order.pay_type,
            vat_type: order.vat_type,
            vat_number: order.vat_number,
            tax_number: order.tax_number,
            discount: order.discount,
            delivery: order.delivery,
            delivery_type: order.delivery_type,
            delivery_time_min: order.delivery_time_min,
            delivery_time_max: order.delivery_time_max,
            delivery_index: order.delivery_index,
            delivery_country: order.delivery_country,
            delivery_region: order.delivery_region,
            delivery_city: order.delivery_city,
            delivery_address: order.delivery_address,
            delivery_building: order.delivery_building,
            delivery_phone_code: order.delivery_phone_code,
            delivery_phone: order.delivery_phone,
            cur_rate: 1.0,
        });
        id
    }

    /// Per-period counts, ascending by key
    fn grouped(&self, group_by: GroupBy, range: &DateRange) -> BTreeMap<String, i64> {
        let mut periods = BTreeMap::new();
        for order in self.orders.iter().filter(|o| range.contains(&o.create_date)) {
            *periods
                .entry(group_by.period_key(&order.create_date))
                .or_insert(0) += 1;
        }
        periods
    }
}

fn article_row(id: i64, orders_id: i64, article: NewOrderArticle) -> OrderArticle {
    OrderArticle {
        id,
        orders_id,
        article_id: article.article_id,
        amount: article.amount,
        price: article.price,
        price_eur: article.price_eur,
        currency: article.currency,
        measure: article.measure,
        delivery_time_min: article.delivery_time_min,
        delivery_time_max: article.delivery_time_max,
        weight: article.weight,
        multiple_pallet: article.multiple_pallet,
        packaging_count: article.packaging_count,
        pallet: article.pallet,
        packaging: article.packaging,
        swimming_pool: article.swimming_pool,
        cur_rate: 1.0,
    }
}

#[derive(Default)]
pub struct MemoryOrderStore {
    inner: RwLock<Inner>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with one minimal order per timestamp
    pub fn with_create_dates(dates: impl IntoIterator<Item = NaiveDateTime>) -> Self {
        let mut inner = Inner::default();
        for (i, create_date) in dates.into_iter().enumerate() {
            inner.push(NewOrder {
                hash: format!("seed{i}"),
                token: format!("seed{i}"),
                name: Some(format!("Order {}", i + 1)),
                create_date,
                locale: "en".into(),
                currency: "EUR".into(),
                pay_type: 1,
                ..Default::default()
            });
        }
        Self {
            inner: RwLock::new(inner),
        }
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn count_orders(&self, range: &DateRange) -> StoreResult<i64> {
        let inner = self.inner.read().await;
        let total = inner
            .orders
            .iter()
            .filter(|o| range.contains(&o.create_date))
            .count();
        Ok(total as i64)
    }

    async fn count_periods(&self, group_by: GroupBy, range: &DateRange) -> StoreResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner.grouped(group_by, range).len() as i64)
    }

    async fn period_counts(
        &self,
        group_by: GroupBy,
        range: &DateRange,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Vec<PeriodCount>> {
        let inner = self.inner.read().await;
        let rows = inner
            .grouped(group_by, range)
            .into_iter()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|(period, order_count)| PeriodCount {
                period,
                order_count,
            })
            .collect();
        Ok(rows)
    }

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>> {
        let inner = self.inner.read().await;
        Ok(inner.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_articles(&self, order_id: i64) -> StoreResult<Vec<OrderArticle>> {
        let inner = self.inner.read().await;
        Ok(inner
            .articles
            .iter()
            .filter(|a| a.orders_id == order_id)
            .cloned()
            .collect())
    }

    async fn insert_order(&self, order: NewOrder) -> StoreResult<i64> {
        let mut inner = self.inner.write().await;
        Ok(inner.push(order))
    }

    async fn grants(&self) -> StoreResult<Vec<Grant>> {
        Ok(Vec::new())
    }
}
