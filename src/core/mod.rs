//! Core functionality modules
//!
//! This module contains the resolution and traversal logic, organized into layers:
//! - `services`: Request building and the HTTP transport
//! - `infrastructure`: Cross-cutting concerns (resolution cache)
//! - `resolver`: Name-or-id resolution per entity kind
//! - `traversal`: The circle → album → song → lyrics walk
//! - `lyrics`: Touhou Wiki lyrics lookup

pub mod infrastructure;
pub mod lyrics;
pub mod models;
pub mod resolver;
pub mod services;
pub mod traversal;

pub use models::Identifier;
