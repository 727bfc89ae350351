//! SwArifa - Summoners War defense counter lookup service
//!
//! Looks up defending compositions and their community counters through an
//! expiring key-value cache that falls back to stale data when swgt is down.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod notify;
pub mod store;
pub mod swgt;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sync_task;
