//! External services integration
//!
//! - URL building for the TouhouDB and Touhou Wiki APIs
//! - The transport that performs the requests

pub mod endpoints;
pub mod transport;

#[cfg(test)]
pub mod scripted;
