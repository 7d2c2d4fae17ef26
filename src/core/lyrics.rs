use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::core::services::endpoints::Endpoints;
use crate::core::services::transport::Transport;

#[derive(Deserialize, Debug)]
struct ParseResponse {
    parse: Option<ParsedPage>,
    error: Option<WikiError>,
}

#[derive(Deserialize, Debug)]
struct ParsedPage {
    #[serde(default)]
    wikitext: Option<String>,
}

#[derive(Deserialize, Debug)]
struct WikiError {
    code: String,
    #[serde(default)]
    info: Option<String>,
}

/// Best-effort lyrics lookup against the Touhou Wiki `Lyrics:` pages.
///
/// Never fails: a missing page, a bad status or a broken body all yield `None`.
pub struct LyricsLookup<'a> {
    transport: &'a dyn Transport,
    endpoints: &'a Endpoints,
}

impl<'a> LyricsLookup<'a> {
    pub fn new(transport: &'a dyn Transport, endpoints: &'a Endpoints) -> Self {
        Self { transport, endpoints }
    }

    /// Raw wikitext of `Lyrics: {title}`.
    pub async fn lookup(&self, title: &str) -> Option<String> {
        let url = self.endpoints.lyrics_by_song_title(title);

        let response = match self.transport.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Lyrics request for '{}' failed: {}", title, e);
                return None;
            }
        };

        if !response.is_success() {
            warn!("Failed to fetch lyrics for '{}'. Status code: {}", title, response.status);
            return None;
        }

        let parsed: ParseResponse = match response.json() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Unreadable lyrics response for '{}': {}", title, e);
                return None;
            }
        };

        if let Some(error) = parsed.error {
            info!(
                "No lyrics page for '{}' ({}: {})",
                title,
                error.code,
                error.info.as_deref().unwrap_or("no details")
            );
            return None;
        }

        let wikitext = parsed
            .parse
            .and_then(|page| page.wikitext)
            .filter(|text| !text.trim().is_empty());

        match &wikitext {
            Some(text) => debug!("Fetched {} bytes of lyrics for '{}'", text.len(), title),
            None => info!("Lyrics page for '{}' is empty", title),
        }

        wikitext
    }
}
