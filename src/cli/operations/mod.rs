//! Operations beyond a single traversal step
//!
//! This module contains single-song lookups, raw lyrics lookups and the full
//! circle crawl.

pub mod crawl;
pub mod lyrics;
pub mod song;

pub use crawl::CrawlArgs;
pub use lyrics::LyricsArgs;
pub use song::SongArgs;
