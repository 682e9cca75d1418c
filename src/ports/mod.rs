//! Port traits the domain depends on; adapters implement them.

pub mod clock_port;
pub mod config_port;
pub mod feed_port;
pub mod render_port;
