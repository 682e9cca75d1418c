//! Concrete adapter implementations for ports.

pub mod csv_feed_adapter;
pub mod file_config_adapter;
pub mod json_feed_adapter;
pub mod json_render_adapter;
pub mod system_clock;
