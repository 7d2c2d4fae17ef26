//! Rendering of traversal results, as text for the terminal or as JSON reports.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use tracing::info;

use crate::cli::common::OutputArgs;
use crate::core::infrastructure::cache::CacheStats;
use crate::core::models::{
    AlbumSongs, AlbumSummary, CircleCrawl, CircleSummary, SongDetail, SongEntry, SongRef,
};

#[derive(Serialize)]
pub struct Report<T: Serialize> {
    metadata: ReportMetadata,
    data: T,
}

#[derive(Serialize)]
struct ReportMetadata {
    generated_at: String,
    tool: String,
    version: String,
    command: String,
    input: String,
}

impl<T: Serialize> Report<T> {
    pub fn new(command: &str, input: &str, data: T) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: chrono::Utc::now().to_rfc3339(),
                tool: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                command: command.to_string(),
                input: input.to_string(),
            },
            data,
        }
    }
}

#[derive(Serialize)]
pub struct CircleReport {
    id: u64,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
}

impl CircleReport {
    pub fn new(circle: &CircleSummary, full: bool) -> Self {
        Self {
            id: circle.id,
            name: circle.name.clone(),
            detail: full.then(|| circle.record.payload.clone()),
        }
    }
}

#[derive(Serialize)]
pub struct AlbumReport {
    id: Option<u64>,
    title: String,
    songs: Vec<SongRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&AlbumSummary> for AlbumReport {
    fn from(album: &AlbumSummary) -> Self {
        Self {
            id: album.id,
            title: album.title.clone(),
            songs: album.song_refs().to_vec(),
            error: album.songs.as_ref().err().map(|e| e.to_string()),
        }
    }
}

#[derive(Serialize)]
pub struct SongReport {
    position: usize,
    id: u64,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    album_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lyrics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
}

impl SongReport {
    pub fn from_detail(position: usize, song: &SongDetail, full: bool) -> Self {
        Self {
            position,
            id: song.id,
            name: song.name.clone(),
            album_id: song.album_id,
            lyrics: song.lyrics.clone(),
            detail: full.then(|| song.record.payload.clone()),
            error: None,
            status_code: None,
        }
    }

    pub fn from_entry(position: usize, entry: &SongEntry, full: bool) -> Self {
        match &entry.outcome {
            Ok(song) => Self::from_detail(position, song, full),
            Err(e) => Self {
                position,
                id: entry.song_ref.id,
                name: entry.song_ref.name.clone(),
                album_id: None,
                lyrics: None,
                detail: None,
                error: Some(e.to_string()),
                status_code: e.status_code(),
            },
        }
    }
}

fn song_reports(entries: &[SongEntry], full: bool) -> Vec<SongReport> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| SongReport::from_entry(i + 1, entry, full))
        .collect()
}

#[derive(Serialize)]
pub struct AlbumListReport {
    albums: Vec<AlbumReport>,
}

impl AlbumListReport {
    pub fn new(albums: &[AlbumSummary]) -> Self {
        Self {
            albums: albums.iter().map(AlbumReport::from).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct AlbumSongsReport {
    id: u64,
    title: String,
    songs: Vec<SongReport>,
}

impl AlbumSongsReport {
    pub fn new(album: &AlbumSongs, full: bool) -> Self {
        Self {
            id: album.id,
            title: album.title.clone(),
            songs: song_reports(&album.entries, full),
        }
    }
}

#[derive(Serialize)]
pub struct CrawlReport {
    circle: CircleReport,
    albums: Vec<CrawledAlbumReport>,
}

#[derive(Serialize)]
struct CrawledAlbumReport {
    #[serde(flatten)]
    album: AlbumReport,
    song_details: Vec<SongReport>,
}

impl CrawlReport {
    pub fn new(crawl: &CircleCrawl, full: bool) -> Self {
        Self {
            circle: CircleReport::new(&crawl.circle, full),
            albums: crawl
                .albums
                .iter()
                .map(|album| CrawledAlbumReport {
                    album: AlbumReport::from(&album.summary),
                    song_details: song_reports(&album.entries, full),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct LyricsReport {
    pub title: String,
    pub lyrics: Option<String>,
}

/// Print `report` as JSON when requested, otherwise run `render_text`,
/// then write the JSON report to `--output` if given.
pub fn emit<T: Serialize>(output: &OutputArgs, report: &Report<T>, render_text: impl FnOnce()) -> Result<()> {
    if output.is_json() {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        render_text();
    }

    if let Some(path) = &output.output {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}

pub fn print_circle(circle: &CircleSummary) {
    println!("\n🎤 Circle: {} (#{})", circle.name, circle.id);
    for (label, key) in [("Type", "artistType"), ("Status", "status"), ("Description", "description")] {
        if let Some(value) = circle.record.payload.get(key).and_then(Value::as_str) {
            if !value.is_empty() {
                println!("  {}: {}", label, value);
            }
        }
    }
}

pub fn print_albums(circle: &str, albums: &[AlbumSummary]) {
    println!("\n💿 Albums of {} ({}):", circle, albums.len());
    for album in albums {
        print_album_summary(album);
    }
}

fn album_id_label(album: &AlbumSummary) -> String {
    album.id.map_or_else(|| "no id".to_string(), |id| format!("#{}", id))
}

fn print_album_summary(album: &AlbumSummary) {
    println!("  Album Title: {}", album.title);
    println!("  Album ID: {}", album_id_label(album));
    match &album.songs {
        Ok(refs) if refs.is_empty() => println!("    (no songs listed)"),
        Ok(refs) => {
            for song in refs {
                println!("    {}: {}", song.name, song.id);
            }
        }
        Err(e) => println!("    ❌ {}", e),
    }
}

pub fn print_album_songs(album: &AlbumSongs) {
    println!("\n💿 {} (#{})", album.title, album.id);
    print_entries(&album.entries);
    print_entry_totals(&album.entries);
}

fn print_entries(entries: &[SongEntry]) {
    for (i, entry) in entries.iter().enumerate() {
        match &entry.outcome {
            Ok(song) => {
                let lyrics = if song.lyrics.is_some() { "📜" } else { "  " };
                println!("  {:>2}. {} {} (#{})", i + 1, lyrics, song.name, song.id);
            }
            Err(e) => println!("  {:>2}. ❌ {} (#{}): {}", i + 1, entry.song_ref.name, entry.song_ref.id, e),
        }
    }
}

fn print_entry_totals(entries: &[SongEntry]) {
    let fetched = entries.iter().filter(|e| e.outcome.is_ok()).count();
    let with_lyrics = entries
        .iter()
        .filter(|e| matches!(&e.outcome, Ok(song) if song.lyrics.is_some()))
        .count();

    println!("\n📊 Summary:");
    println!("  ✅ Fetched: {}", fetched);
    println!("  ❌ Failed: {}", entries.len() - fetched);
    println!("  📜 With lyrics: {}", with_lyrics);
}

pub fn print_song(song: &SongDetail) {
    println!("\n🎵 {} (#{})", song.name, song.id);
    if let Some(embedded) = song.record.embedded_song() {
        if let Some(artists) = embedded.get("artistString").and_then(Value::as_str) {
            println!("  Artists: {}", artists);
        }
        if let Some(song_type) = embedded.get("songType").and_then(Value::as_str) {
            println!("  Type: {}", song_type);
        }
    }
    print_lyrics(&song.name, song.lyrics.as_deref());
}

pub fn print_lyrics(title: &str, lyrics: Option<&str>) {
    match lyrics {
        Some(text) => println!("\nLyrics for {}:\n{}", title, text),
        None => println!("\nNo lyrics found for {}", title),
    }
}

pub fn print_crawl(crawl: &CircleCrawl) {
    print_circle(&crawl.circle);
    for album in &crawl.albums {
        println!("\n💿 {} ({})", album.summary.title, album_id_label(&album.summary));
        if let Err(e) = &album.summary.songs {
            println!("  ❌ {}", e);
            continue;
        }
        print_entries(&album.entries);
    }

    let entries: Vec<&SongEntry> = crawl.albums.iter().flat_map(|a| &a.entries).collect();
    let failed_albums = crawl.albums.iter().filter(|a| a.summary.songs.is_err()).count();
    let failed_songs = entries.iter().filter(|e| e.outcome.is_err()).count();

    println!("\n🕸️ Crawl Complete!");
    println!("  💿 Albums: {} ({} failed)", crawl.albums.len(), failed_albums);
    println!("  🎵 Songs: {} ({} failed)", entries.len(), failed_songs);
}

pub fn print_cache_stats(stats: &[CacheStats]) {
    println!("\n🗂️ Resolution cache:");
    for stat in stats {
        println!(
            "  {}: {} entries, {} lookups, {:.1}% hits",
            stat.kind, stat.total_entries, stat.lookups, stat.hit_rate_percent
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{DetailRecord, EntityKind};
    use crate::error::{FetchError, UpstreamError};
    use serde_json::json;

    fn song_detail(id: u64, name: &str) -> SongDetail {
        SongDetail {
            id,
            name: name.to_string(),
            album_id: Some(4468),
            record: DetailRecord::new(EntityKind::Song, json!({ "song": { "id": id, "name": name } })),
            lyrics: Some("la la".to_string()),
        }
    }

    #[test]
    fn test_album_songs_report_keeps_failures_in_place() {
        let album = AlbumSongs {
            id: 4468,
            title: "Foreground Eclipse Demo CD Vol.01".to_string(),
            entries: vec![
                SongEntry {
                    song_ref: SongRef { id: 501, name: "Feel The Flow".to_string() },
                    outcome: Ok(song_detail(501, "Feel The Flow")),
                },
                SongEntry {
                    song_ref: SongRef { id: 502, name: "White Wind".to_string() },
                    outcome: Err(FetchError::Upstream(UpstreamError::Status {
                        url: "https://touhoudb.com/api/songs/502/details".to_string(),
                        status: 503,
                    })),
                },
            ],
        };

        let value = serde_json::to_value(AlbumSongsReport::new(&album, false)).unwrap();
        let songs = value["songs"].as_array().unwrap();

        assert_eq!(songs[0]["position"], 1);
        assert_eq!(songs[0]["lyrics"], "la la");
        assert!(songs[0].get("detail").is_none());
        assert!(songs[0].get("error").is_none());

        assert_eq!(songs[1]["position"], 2);
        assert_eq!(songs[1]["name"], "White Wind");
        assert_eq!(songs[1]["status_code"], 503);
        assert!(songs[1]["error"].as_str().unwrap().contains("503"));
    }

    #[test]
    fn test_full_report_includes_payload() {
        let report = SongReport::from_detail(1, &song_detail(7, "Petal"), true);
        let value = serde_json::to_value(report).unwrap();
        assert_eq!(value["detail"]["song"]["id"], 7);
    }

    #[test]
    fn test_report_metadata() {
        let report = Report::new("lyrics", "White Wind", LyricsReport { title: "White Wind".to_string(), lyrics: None });
        let value = serde_json::to_value(report).unwrap();
        assert_eq!(value["metadata"]["command"], "lyrics");
        assert_eq!(value["metadata"]["tool"], "touhoudb-cli");
        assert!(value["data"]["lyrics"].is_null());
    }
}
