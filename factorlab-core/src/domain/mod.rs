//! Domain types for FactorLab

pub mod stock_row;

pub use stock_row::{tag_rows, StockRow};
