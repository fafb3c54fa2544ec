//! # Configuration
//!
//! Client-side configuration: where the API lives, where the application is
//! served from, and the request timeouts the front ends apply.

pub mod client;

pub use client::{ClientConfig, ConfigError, LogFormat, normalize_base_url};
