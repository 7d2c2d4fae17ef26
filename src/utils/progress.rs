use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Centralized progress spinner creation for CLI commands
pub struct ProgressUtils;

impl ProgressUtils {
    /// Spinner shown on stderr while a traversal stage is running.
    /// Hidden when `quiet` is set so JSON output stays clean.
    pub fn create_traversal_spinner(quiet: bool) -> ProgressBar {
        if quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("valid spinner template"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}

/// Common progress messages
pub struct ProgressMessages;

impl ProgressMessages {
    pub const COMPLETED: &'static str = "✅ Completed";
    pub const FAILED: &'static str = "❌ Failed";

    pub fn resolving(kind: &str, input: &str) -> String {
        format!("🔍 Resolving {} {}", kind, input)
    }

    pub fn crawling(input: &str) -> String {
        format!("🕸️ Crawling circle {}", input)
    }

    pub fn lyrics_for(title: &str) -> String {
        format!("📜 Looking up lyrics for {}", title)
    }
}
