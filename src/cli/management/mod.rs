//! Management and configuration commands

pub mod config;

pub use config::ConfigArgs;
