//! FactorLab Core: market data, return factors, trading calendars, session storage.
//!
//! - Data providers (Yahoo chart API, in-memory) and close-price alignment
//! - Daily return matrix and PCA factor model with chart datasets
//! - Exchange trading calendars
//! - SQLite store and the session recorder built on it
//! - TOML configuration with environment overrides

pub mod analysis;
pub mod calendar;
pub mod config;
pub mod data;
pub mod domain;
pub mod recorder;
pub mod store;
