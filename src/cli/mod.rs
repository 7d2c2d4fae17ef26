//! Command Line Interface module
//!
//! This module contains all CLI commands organized into logical submodules:
//! - `core`: The traversal steps (circle, albums, songs)
//! - `operations`: Single-song and lyrics lookups, full crawl
//! - `management`: Configuration inspection
//! - `report`: Text and JSON rendering shared by the commands

pub mod common;
pub mod core;
pub mod management;
pub mod operations;
pub mod report;
