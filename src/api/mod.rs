//! HTTP API handlers

mod classify;
mod health;

pub use classify::classify_routes;
pub use health::health_routes;
