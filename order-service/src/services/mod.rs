//! Business logic behind the HTTP handlers

pub mod intake;
pub mod price;
pub mod search;
pub mod stats;

pub use price::PriceFetcher;
pub use search::SearchClient;
