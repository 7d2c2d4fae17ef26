//! Infrastructure services
//!
//! - `cache`: Per-run resolution cache

pub mod cache;
