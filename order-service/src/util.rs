//! Identifier helpers and seed data for new orders

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use shared::models::NewOrder;

/// Seed orders are spread over this many days before "now"
pub const SEED_SPREAD_DAYS: i64 = 365;

/// Opaque per-order hash (32 lowercase hex chars)
pub fn generate_hash() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Random access token: 16 random bytes, hex encoded
pub fn generate_token() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}

/// Test order `Order {index}` created up to a year before `now`
pub fn random_order<R: Rng + ?Sized>(index: usize, now: NaiveDateTime, rng: &mut R) -> NewOrder {
    let days_ago = rng.gen_range(0..=SEED_SPREAD_DAYS);
    NewOrder {
        hash: generate_hash(),
        token: generate_token(),
        name: Some(format!("Order {index}")),
        create_date: now - Duration::days(days_ago),
        locale: "en".into(),
        currency: "USD".into(),
        pay_type: rng.gen_range(1..=3),
        ..Default::default()
    }
}
