//! Seed the order table with random test orders
//!
//! Usage: `generate-orders [count]` (default 1000). Requires `DATABASE_URL`.

use anyhow::{Context, Result, bail};
use order_service::db::{OrderStore, PgOrderStore};
use order_service::util::random_order;

const DEFAULT_COUNT: usize = 1000;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "generate_orders=info,order_service=info".into()),
        )
        .init();

    let count = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("invalid order count: {arg}"))?,
        None => DEFAULT_COUNT,
    };

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        bail!("DATABASE_URL must be set to generate orders");
    };
    let store = PgOrderStore::connect(&database_url)
        .await
        .context("failed to connect to the order database")?;

    let now = shared::util::now_naive();
    let mut rng = rand::thread_rng();
    for i in 0..count {
        let order = random_order(i, now, &mut rng);
        store
            .insert_order(order)
            .await
            .with_context(|| format!("failed to insert order {i}"))?;
    }

    tracing::info!(count, "Generated {count} test orders.");
    Ok(())
}
