//! order-service: order statistics, lookup, XML intake and search delegation
//!
//! The binary in `main.rs` wires [`config::Config`], [`state::AppState`] and
//! [`api::create_router`]; the library target exists so the router can be
//! driven in-process by tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;
pub mod util;
