//! Translation resolution and language consistency engine for the Waybank
//! dashboard.

pub mod config;
pub mod error;
pub mod i18n;
