//! Adapters for the backing services a shard depends on.
//!
//! Each adapter is a cheaply cloneable handle built once during startup and then
//! shared with the bot runtime.

/// Redis cache client
pub mod cache;
/// Postgres relational store
pub mod postgres;
/// Worker pool HTTP client
pub mod worker;

pub use cache::Cache;
pub use postgres::Postgres;
pub use worker::WorkerPool;
