pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod telemetry;
pub mod types;

pub use app::app;

#[cfg(test)]
pub mod testing;
