//! Core postbox library (config, logging, HTTP client).

pub mod api;
pub mod config;
pub mod logging;
