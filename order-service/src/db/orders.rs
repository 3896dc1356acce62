//! PostgreSQL order store

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::models::{DateRange, GroupBy, NewOrder, Order, OrderArticle, PeriodCount};
use sqlx::PgPool;

use super::{Grant, OrderStore, StoreResult};

/// Creation-date filter shared by every statistics query; `$1`/`$2` are the
/// optional inclusive bounds.
const RANGE_FILTER: &str = "($1::TIMESTAMP IS NULL OR create_date >= $1) \
     AND ($2::TIMESTAMP IS NULL OR create_date <= $2)";

#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn bounds(range: &DateRange) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    (range.start, range.end)
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn count_orders(&self, range: &DateRange) -> StoreResult<i64> {
        let (start, end) = bounds(range);
        let sql = format!("SELECT COUNT(*) FROM orders WHERE {RANGE_FILTER}");
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn count_periods(&self, group_by: GroupBy, range: &DateRange) -> StoreResult<i64> {
        let (start, end) = bounds(range);
        let sql = format!(
            "SELECT COUNT(DISTINCT to_char(create_date, $3)) FROM orders WHERE {RANGE_FILTER}"
        );
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(start)
            .bind(end)
            .bind(group_by.sql_pattern())
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn period_counts(
        &self,
        group_by: GroupBy,
        range: &DateRange,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Vec<PeriodCount>> {
        let (start, end) = bounds(range);
        let sql = format!(
            r#"
            SELECT to_char(create_date, $3) AS period, COUNT(*) AS order_count
            FROM orders
            WHERE {RANGE_FILTER}
            GROUP BY 1
            ORDER BY 1 DESC
            LIMIT $4 OFFSET $5
            "#
        );
        let rows: Vec<PeriodCount> = sqlx::query_as(&sql)
            .bind(start)
            .bind(end)
            .bind(group_by.sql_pattern())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_order(&self, id: i64) -> StoreResult<Option<Order>> {
        let order: Option<Order> = sqlx::query_as(
            r#"
            SELECT id, hash, token, number, name, user_id, email, status, create_date,
                   locale, currency, pay_type, vat_type, vat_number, tax_number,
                   discount, delivery, delivery_type, delivery_time_min, delivery_time_max,
                   delivery_index, delivery_country, delivery_region, delivery_city,
                   delivery_address, delivery_building, delivery_phone_code, delivery_phone,
                   cur_rate
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    async fn find_articles(&self, order_id: i64) -> StoreResult<Vec<OrderArticle>> {
        let rows: Vec<OrderArticle> = sqlx::query_as(
            r#"
            SELECT id, orders_id, article_id, amount, price, price_eur, currency, measure,
                   delivery_time_min, delivery_time_max, weight, multiple_pallet,
                   packaging_count, pallet, packaging, swimming_pool, cur_rate
            FROM orders_article
            WHERE orders_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_order(&self, order: NewOrder) -> StoreResult<i64> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (
                hash, token, number, name, user_id, email, status, create_date,
                locale, currency, pay_type, vat_type, vat_number, tax_number,
                discount, delivery, delivery_type, delivery_time_min, delivery_time_max,
                delivery_index, delivery_country, delivery_region, delivery_city,
                delivery_address, delivery_building, delivery_phone_code, delivery_phone
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27
            )
            RETURNING id
            "#,
        )
        .bind(&order.hash)
        .bind(&order.token)
        .bind(&order.number)
        .bind(&order.name)
        .bind(order.user_id)
        .bind(&order.email)
        .bind(order.status)
        .bind(order.create_date)
        .bind(&order.locale)
        .bind(&order.currency)
        .bind(order.pay_type)
        .bind(order.vat_type)
        .bind(&order.vat_number)
        .bind(&order.tax_number)
        .bind(order.discount)
        .bind(order.delivery)
        .bind(order.delivery_type)
        .bind(order.delivery_time_min)
        .bind(order.delivery_time_max)
        .bind(&order.delivery_index)
        .bind(order.delivery_country)
        .bind(&order.delivery_region)
        .bind(&order.delivery_city)
        .bind(&order.delivery_address)
        .bind(&order.delivery_building)
        .bind(&order.delivery_phone_code)
        .bind(&order.delivery_phone)
        .fetch_one(&mut *tx)
        .await?;

        for article in &order.articles {
            sqlx::query(
                r#"
                INSERT INTO orders_article (
                    orders_id, article_id, amount, price, price_eur, currency, measure,
                    delivery_time_min, delivery_time_max, weight, multiple_pallet,
                    packaging_count, pallet, packaging, swimming_pool
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                "#,
            )
            .bind(id)
            .bind(article.article_id)
            .bind(article.amount)
            .bind(article.price)
            .bind(article.price_eur)
            .bind(&article.currency)
            .bind(&article.measure)
            .bind(article.delivery_time_min)
            .bind(article.delivery_time_max)
            .bind(article.weight)
            .bind(article.multiple_pallet)
            .bind(article.packaging_count)
            .bind(article.pallet)
            .bind(article.packaging)
            .bind(article.swimming_pool)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    async fn grants(&self) -> StoreResult<Vec<Grant>> {
        let rows: Vec<Grant> = sqlx::query_as(
            r#"
            SELECT privilege_type::TEXT AS privilege_type,
                   table_schema::TEXT AS table_schema,
                   table_name::TEXT AS table_name
            FROM information_schema.role_table_grants
            WHERE grantee = current_user
            ORDER BY table_schema, table_name, privilege_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
