use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::core::Identifier;

/// A circle, album or song given by name or numeric ID
#[derive(Args, Debug, Clone)]
pub struct IdentifierArgs {
    /// Name or numeric TouhouDB ID
    #[arg(value_name = "NAME_OR_ID")]
    pub input: String,

    /// Treat the input as a name even if it is all digits
    #[arg(long)]
    pub by_name: bool,
}

impl IdentifierArgs {
    pub fn identifier(&self) -> Identifier {
        Identifier::parse(&self.input, self.by_name)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the JSON report to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Include raw detail payloads in JSON output
    #[arg(long)]
    pub full: bool,
}

impl OutputArgs {
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

#[derive(Args, Debug, Clone)]
pub struct LyricsFlags {
    /// Skip Touhou Wiki lyrics lookups
    #[arg(long, conflicts_with = "lyrics")]
    pub no_lyrics: bool,

    /// Force Touhou Wiki lyrics lookups even if disabled in config
    #[arg(long)]
    pub lyrics: bool,
}

impl LyricsFlags {
    pub fn include_lyrics(&self) -> Option<bool> {
        match (self.lyrics, self.no_lyrics) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
