//! Core domain types and logic: timestamp normalization, record validation,
//! series assembly and moving averages.

pub mod chart_config;
pub mod config_validation;
pub mod demo;
pub mod error;
pub mod indicator;
pub mod interval;
pub mod ohlcv;
pub mod raw_record;
pub mod series;
pub mod timestamp;
pub mod validator;
