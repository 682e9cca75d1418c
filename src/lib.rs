//! klineprep: turns raw kline records from a market-data feed into
//! chart-ready price, volume and moving-average series.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
