use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::error::FetchError;

/// The three entity levels exposed by TouhouDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Circle,
    Album,
    Song,
}

impl EntityKind {
    /// Path segment used by the TouhouDB API for this kind.
    pub fn api_segment(&self) -> &'static str {
        match self {
            EntityKind::Circle => "artists",
            EntityKind::Album => "albums",
            EntityKind::Song => "songs",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Circle => "circle",
            EntityKind::Album => "album",
            EntityKind::Song => "song",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name-or-id input, decided once at the call boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    ByName(String),
    ById(u64),
}

impl Identifier {
    /// Parse a command-line argument. All-digit input is treated as an ID
    /// unless `force_name` is set (some circles have numeric names).
    pub fn parse(input: &str, force_name: bool) -> Self {
        let trimmed = input.trim();
        if !force_name && !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = trimmed.parse::<u64>() {
                return Identifier::ById(id);
            }
        }
        Identifier::ByName(trimmed.to_string())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::ByName(name) => write!(f, "'{}'", name),
            Identifier::ById(id) => write!(f, "#{}", id),
        }
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier::ByName(name.to_string())
    }
}

/// Lightweight item of a search or listing page.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub default_name: Option<String>,
}

impl SearchItem {
    pub fn display_name(&self) -> Option<&str> {
        self.default_name.as_deref().or(self.name.as_deref())
    }

    pub fn require_id(&self, kind: EntityKind) -> Result<u64, FetchError> {
        self.id.ok_or(FetchError::MissingField { kind, field: "id" })
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Full payload returned by a `/details` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DetailRecord {
    pub kind: EntityKind,
    pub payload: Value,
}

impl DetailRecord {
    pub fn new(kind: EntityKind, payload: Value) -> Self {
        Self { kind, payload }
    }

    /// Canonical ID carried by the payload. Song details nest it under `song`.
    pub fn entity_id(&self) -> Option<u64> {
        let top_level = self.payload.get("id").and_then(Value::as_u64);
        match self.kind {
            EntityKind::Song => self.embedded_song().and_then(|s| s.get("id")).and_then(Value::as_u64).or(top_level),
            _ => top_level,
        }
    }

    pub fn require_id(&self) -> Result<u64, FetchError> {
        self.entity_id().ok_or(FetchError::MissingField {
            kind: self.kind,
            field: "id",
        })
    }

    pub fn display_name(&self) -> Option<&str> {
        let source = match self.kind {
            EntityKind::Song => self.embedded_song().unwrap_or(&self.payload),
            _ => &self.payload,
        };
        name_of(source)
    }

    /// The `song` sub-record of a song details payload, when it is an object.
    pub fn embedded_song(&self) -> Option<&Value> {
        self.payload.get("song").filter(|song| song.is_object())
    }

    /// Song references listed in an album details payload, in track order.
    pub fn song_refs(&self) -> Vec<SongRef> {
        let Some(tracks) = self.payload.get("songs").and_then(Value::as_array) else {
            return Vec::new();
        };

        tracks
            .iter()
            .filter_map(|track| {
                let song = track.get("song");
                let id = song.and_then(|s| s.get("id")).and_then(Value::as_u64);
                let name = track
                    .get("name")
                    .and_then(Value::as_str)
                    .or_else(|| song.and_then(name_of));
                match (id, name) {
                    (Some(id), Some(name)) if !name.is_empty() => Some(SongRef {
                        id,
                        name: name.to_string(),
                    }),
                    _ => {
                        debug!("Skipping album track without song id or name: {}", track);
                        None
                    }
                }
            })
            .collect()
    }
}

fn name_of(value: &Value) -> Option<&str> {
    value
        .get("defaultName")
        .and_then(Value::as_str)
        .or_else(|| value.get("name").and_then(Value::as_str))
        .filter(|name| !name.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CircleSummary {
    pub id: u64,
    pub name: String,
    pub record: DetailRecord,
}

#[derive(Debug)]
pub struct AlbumSummary {
    /// `None` when the listing item carried no ID; `songs` then holds the error.
    pub id: Option<u64>,
    pub title: String,
    /// Song references from the album details, or why they could not be fetched.
    pub songs: Result<Vec<SongRef>, FetchError>,
}

impl AlbumSummary {
    pub fn song_refs(&self) -> &[SongRef] {
        match &self.songs {
            Ok(refs) => refs,
            Err(_) => &[],
        }
    }
}

#[derive(Debug)]
pub struct CircleAlbums {
    pub circle: CircleSummary,
    pub albums: Vec<AlbumSummary>,
}

#[derive(Debug, Clone)]
pub struct SongDetail {
    pub id: u64,
    pub name: String,
    pub album_id: Option<u64>,
    pub record: DetailRecord,
    pub lyrics: Option<String>,
}

/// One position of a song fan-out; failures stay in place.
#[derive(Debug)]
pub struct SongEntry {
    pub song_ref: SongRef,
    pub outcome: Result<SongDetail, FetchError>,
}

#[derive(Debug)]
pub struct AlbumSongs {
    pub id: u64,
    pub title: String,
    pub entries: Vec<SongEntry>,
}

#[derive(Debug)]
pub struct CrawledAlbum {
    pub summary: AlbumSummary,
    pub entries: Vec<SongEntry>,
}

#[derive(Debug)]
pub struct CircleCrawl {
    pub circle: CircleSummary,
    pub albums: Vec<CrawledAlbum>,
}
