//! Utility modules for common functionality
//!
//! - `logging`: Logging configuration and setup
//! - `progress`: Spinner utilities for consistent CLI feedback

pub mod logging;
pub mod progress;
