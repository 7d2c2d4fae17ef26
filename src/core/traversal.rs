//! Circle → albums → album details → songs → song details → lyrics.
//!
//! Every request is awaited before the next one is issued. Resolution
//! failures abort the call that triggered them; failures of individual albums
//! or songs inside a fan-out are recorded in place and the walk continues.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::infrastructure::cache::CacheStats;
use crate::core::lyrics::LyricsLookup;
use crate::core::models::{
    AlbumSongs, AlbumSummary, CircleAlbums, CircleCrawl, CircleSummary, CrawledAlbum, DetailRecord, EntityKind,
    Identifier, SearchItem, SearchPage, SongDetail, SongEntry, SongRef,
};
use crate::core::resolver::{fetch_detail_record, EntityResolver};
use crate::core::services::endpoints::Endpoints;
use crate::core::services::transport::Transport;
use crate::error::FetchError;

#[derive(Debug, Clone)]
pub struct TraversalOptions {
    /// Look up wiki lyrics for every fetched song.
    pub include_lyrics: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self { include_lyrics: true }
    }
}

pub struct Traversal {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    options: TraversalOptions,
    circles: EntityResolver,
    albums: EntityResolver,
    songs: EntityResolver,
}

impl Traversal {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints, options: TraversalOptions) -> Self {
        Self {
            transport,
            endpoints,
            options,
            circles: EntityResolver::new(EntityKind::Circle),
            albums: EntityResolver::new(EntityKind::Album),
            songs: EntityResolver::new(EntityKind::Song),
        }
    }

    pub fn cache_stats(&self) -> Vec<CacheStats> {
        [&self.circles, &self.albums, &self.songs]
            .iter()
            .map(|resolver| resolver.cache().get_stats())
            .collect()
    }

    pub async fn lookup_circle(&mut self, identifier: &Identifier) -> Result<CircleSummary, FetchError> {
        let record = self
            .circles
            .resolve(self.transport.as_ref(), &self.endpoints, identifier)
            .await?;
        let id = record.require_id()?;
        let name = record.display_name().unwrap_or("Unknown Circle").to_string();

        info!("Resolved circle {} to #{} ({})", identifier, id, name);
        Ok(CircleSummary { id, name, record })
    }

    /// Albums of a circle, each with the song references of its details.
    pub async fn fetch_albums_for_circle(&mut self, identifier: &Identifier) -> Result<Vec<AlbumSummary>, FetchError> {
        Ok(self.circle_albums(identifier).await?.albums)
    }

    async fn circle_albums(&mut self, identifier: &Identifier) -> Result<CircleAlbums, FetchError> {
        let circle = self.lookup_circle(identifier).await?;

        let url = self.endpoints.albums_for_circle(circle.id);
        let page: SearchPage = self.transport.get(&url).await?.expect_json()?;
        info!(
            "Circle #{} lists {} album(s) ({} in total upstream)",
            circle.id,
            page.items.len(),
            page.total_count.unwrap_or(page.items.len() as u64)
        );

        let mut albums = Vec::with_capacity(page.items.len());
        for item in &page.items {
            albums.push(self.album_summary(item).await);
        }

        Ok(CircleAlbums { circle, albums })
    }

    /// Details of every song on an album, in track order.
    pub async fn fetch_song_details_for_album(&mut self, identifier: &Identifier) -> Result<AlbumSongs, FetchError> {
        let record = self
            .albums
            .resolve(self.transport.as_ref(), &self.endpoints, identifier)
            .await?;
        let id = record.require_id()?;
        let title = record.display_name().unwrap_or("Unknown Title").to_string();
        let refs = record.song_refs();

        info!("Album #{} ({}) has {} song(s)", id, title, refs.len());
        let entries = self.fetch_songs(id, &refs).await;

        Ok(AlbumSongs { id, title, entries })
    }

    /// Full walk of a circle. Song references already extracted from album
    /// details are reused, so each album's details are requested once.
    pub async fn crawl_circle(&mut self, identifier: &Identifier) -> Result<CircleCrawl, FetchError> {
        let CircleAlbums { circle, albums } = self.circle_albums(identifier).await?;

        let mut crawled = Vec::with_capacity(albums.len());
        for summary in albums {
            let entries = match (summary.id, &summary.songs) {
                (Some(album_id), Ok(refs)) => self.fetch_songs(album_id, refs).await,
                _ => Vec::new(),
            };
            crawled.push(CrawledAlbum { summary, entries });
        }

        Ok(CircleCrawl { circle, albums: crawled })
    }

    /// Resolve one song by name or ID, without album context.
    pub async fn lookup_song(&mut self, identifier: &Identifier) -> Result<SongDetail, FetchError> {
        let record = self
            .songs
            .resolve(self.transport.as_ref(), &self.endpoints, identifier)
            .await?;
        let id = record.require_id()?;
        let name = record.display_name().unwrap_or("Unknown Title").to_string();

        let lyrics = self.lyrics_for(&record).await;
        Ok(SongDetail {
            id,
            name,
            album_id: None,
            record,
            lyrics,
        })
    }

    pub async fn lookup_lyrics(&self, title: &str) -> Option<String> {
        LyricsLookup::new(self.transport.as_ref(), &self.endpoints).lookup(title).await
    }

    async fn album_summary(&self, item: &SearchItem) -> AlbumSummary {
        let title = item.display_name().unwrap_or("Unknown Title").to_string();
        let id = match item.require_id(EntityKind::Album) {
            Ok(id) => id,
            Err(e) => {
                warn!("Skipping listed album '{}': {}", title, e);
                return AlbumSummary {
                    id: None,
                    title,
                    songs: Err(e),
                };
            }
        };
        debug!("Fetching details for album #{} ({})", id, title);

        let url = self.endpoints.details_by_id(EntityKind::Album, id);
        let songs = fetch_detail_record(self.transport.as_ref(), EntityKind::Album, &url)
            .await
            .map(|record| record.song_refs());

        if let Err(e) = &songs {
            warn!("Failed to fetch album #{} ({}): {}", id, title, e);
        }

        AlbumSummary {
            id: Some(id),
            title,
            songs,
        }
    }

    async fn fetch_songs(&self, album_id: u64, refs: &[SongRef]) -> Vec<SongEntry> {
        let mut entries = Vec::with_capacity(refs.len());
        for song_ref in refs {
            debug!("Processing: {}", song_ref.name);
            let outcome = self.fetch_song(song_ref, album_id).await;
            if let Err(e) = &outcome {
                warn!("Failed to fetch song #{} ({}): {}", song_ref.id, song_ref.name, e);
            }
            entries.push(SongEntry {
                song_ref: song_ref.clone(),
                outcome,
            });
        }
        entries
    }

    async fn fetch_song(&self, song_ref: &SongRef, album_id: u64) -> Result<SongDetail, FetchError> {
        let url = self.endpoints.song_details(song_ref.id, Some(album_id));
        let record = fetch_detail_record(self.transport.as_ref(), EntityKind::Song, &url).await?;

        let lyrics = self.lyrics_for(&record).await;
        Ok(SongDetail {
            id: record.entity_id().unwrap_or(song_ref.id),
            name: record.display_name().unwrap_or(&song_ref.name).to_string(),
            album_id: Some(album_id),
            record,
            lyrics,
        })
    }

    async fn lyrics_for(&self, record: &DetailRecord) -> Option<String> {
        if !self.options.include_lyrics {
            return None;
        }

        match record.payload.get("song") {
            Some(song) if song.is_object() => {}
            Some(other) => {
                warn!("Unexpected format for 'song' field, expected an object: {}", other);
                return None;
            }
            None => return None,
        }

        let title = record.display_name()?;
        self.lookup_lyrics(title).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::scripted::ScriptedTransport;
    use crate::error::UpstreamError;
    use serde_json::json;

    const DEMO_CD: &str = "Foreground Eclipse Demo CD Vol.01";

    fn endpoints() -> Endpoints {
        Endpoints::parse("https://touhoudb.com/", "https://en.touhouwiki.net/api.php").unwrap()
    }

    fn traversal(transport: &Arc<ScriptedTransport>, include_lyrics: bool) -> Traversal {
        Traversal::new(transport.clone(), endpoints(), TraversalOptions { include_lyrics })
    }

    fn song(id: u64, name: &str) -> serde_json::Value {
        json!({ "song": { "id": id, "defaultName": name, "name": name }, "lyricsFromParents": [] })
    }

    fn felt_catalog() -> ScriptedTransport {
        ScriptedTransport::new()
            .json("/api/artists", json!({ "items": [{ "id": 17, "defaultName": "FELT" }] }))
            .json("/api/artists/17/details", json!({ "id": 17, "name": "FELT" }))
            .json(
                "/api/albums",
                json!({ "items": [
                    { "id": 300, "defaultName": "Sky Stories" },
                    { "id": 100, "defaultName": "A Flower" }
                ], "totalCount": 2 }),
            )
            .json(
                "/api/albums/300/details",
                json!({ "id": 300, "name": "Sky Stories", "songs": [
                    { "id": 1, "name": "Blue Sky", "song": { "id": 31 } },
                    { "id": 2, "name": "Night Sky", "song": { "id": 32 } }
                ] }),
            )
            .json(
                "/api/albums/100/details",
                json!({ "id": 100, "name": "A Flower", "songs": [
                    { "id": 3, "name": "Petal", "song": { "id": 41 } }
                ] }),
            )
            .json("/api/songs/31/details", song(31, "Blue Sky"))
            .json("/api/songs/32/details", song(32, "Night Sky"))
            .json("/api/songs/41/details", song(41, "Petal"))
    }

    fn demo_cd_catalog() -> ScriptedTransport {
        ScriptedTransport::new()
            .json_when("/api/albums", "query", DEMO_CD, json!({ "items": [{ "id": 4468, "defaultName": DEMO_CD }] }))
            .json(
                "/api/albums/4468/details",
                json!({ "id": 4468, "name": DEMO_CD, "songs": [
                    { "id": 10, "name": "Feel The Flow", "song": { "id": 501 } },
                    { "id": 11, "name": "White Wind", "song": { "id": 502 } },
                    { "id": 12, "name": "Mirror Image", "song": { "id": 503 } }
                ] }),
            )
            .json("/api/songs/501/details", song(501, "Feel The Flow"))
            .status("/api/songs/502/details", 503)
            .json("/api/songs/503/details", song(503, "Mirror Image"))
            .json_when(
                "/api.php",
                "page",
                "Lyrics: Feel The Flow",
                json!({ "parse": { "wikitext": "Feel The Flow lyrics" } }),
            )
            .json("/api.php", json!({ "error": { "code": "missingtitle" } }))
    }

    #[tokio::test]
    async fn test_albums_for_circle_by_name() {
        let transport = Arc::new(felt_catalog());
        let mut traversal = traversal(&transport, false);

        let albums = traversal.fetch_albums_for_circle(&Identifier::from("FELT")).await.unwrap();

        let ids: Vec<Option<u64>> = albums.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![Some(300), Some(100)], "upstream order must be preserved");
        assert_eq!(albums[0].title, "Sky Stories");
        assert_eq!(
            albums[0].song_refs(),
            &[
                SongRef { id: 31, name: "Blue Sky".to_string() },
                SongRef { id: 32, name: "Night Sky".to_string() },
            ]
        );
        assert_eq!(albums[1].song_refs().len(), 1);

        assert_eq!(
            transport.request_paths(),
            vec![
                "/api/artists",
                "/api/artists/17/details",
                "/api/albums",
                "/api/albums/300/details",
                "/api/albums/100/details",
            ]
        );

        let listing = &transport.requests()[2];
        assert!(listing.query_pairs().any(|(k, v)| k == "artistId[]" && v == "17"));
    }

    #[tokio::test]
    async fn test_albums_for_circle_isolates_album_failures() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .json("/api/artists/17/details", json!({ "id": 17, "name": "FELT" }))
                .json("/api/albums", json!({ "items": [{ "id": 1, "name": "Broken" }, { "id": 2, "name": "Fine" }] }))
                .html("/api/albums/1/details", 200, "<html>error</html>")
                .json("/api/albums/2/details", json!({ "id": 2, "songs": [] })),
        );
        let mut traversal = traversal(&transport, false);

        let albums = traversal.fetch_albums_for_circle(&Identifier::ById(17)).await.unwrap();

        assert_eq!(albums.len(), 2);
        assert!(albums[0].songs.is_err());
        assert!(albums[1].songs.as_ref().unwrap().is_empty());
        assert_eq!(transport.count("/api/artists"), 0);
    }

    #[tokio::test]
    async fn test_listed_album_without_id_keeps_its_place() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .json("/api/artists/17/details", json!({ "id": 17, "name": "FELT" }))
                .json(
                    "/api/albums",
                    json!({ "items": [{ "id": 1, "name": "Fine" }, { "name": "Draft without id" }, { "id": 3, "name": "Also fine" }] }),
                )
                .json("/api/albums/1/details", json!({ "id": 1, "songs": [{ "name": "A", "song": { "id": 11 } }] }))
                .json("/api/albums/3/details", json!({ "id": 3, "songs": [] })),
        );
        let mut traversal = traversal(&transport, false);

        let albums = traversal.fetch_albums_for_circle(&Identifier::ById(17)).await.unwrap();

        assert_eq!(albums.len(), 3);
        assert_eq!(albums[0].song_refs().len(), 1);
        assert_eq!(albums[1].id, None);
        assert_eq!(albums[1].title, "Draft without id");
        assert!(matches!(
            albums[1].songs,
            Err(FetchError::MissingField { kind: EntityKind::Album, field: "id" })
        ));
        assert_eq!(albums[2].id, Some(3));
        assert_eq!(
            transport.request_paths(),
            vec![
                "/api/artists/17/details",
                "/api/albums",
                "/api/albums/1/details",
                "/api/albums/3/details",
            ]
        );
    }

    #[tokio::test]
    async fn test_albums_for_circle_propagates_resolution_failure() {
        let transport = Arc::new(ScriptedTransport::new().json("/api/artists", json!({ "items": [] })));
        let mut traversal = traversal(&transport, false);

        let err = traversal
            .fetch_albums_for_circle(&Identifier::from("Nobody"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::NotFound { kind: EntityKind::Circle, .. }));
        assert_eq!(transport.request_paths(), vec!["/api/artists"]);
    }

    #[tokio::test]
    async fn test_albums_for_circle_requires_circle_id() {
        let transport = Arc::new(ScriptedTransport::new().json("/api/artists/5/details", json!({ "name": "No Id" })));
        let mut traversal = traversal(&transport, false);

        let err = traversal.fetch_albums_for_circle(&Identifier::ById(5)).await.unwrap_err();
        assert!(matches!(err, FetchError::MissingField { field: "id", .. }));
    }

    #[tokio::test]
    async fn test_album_listing_failure_is_upstream_error() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .json("/api/artists/17/details", json!({ "id": 17 }))
                .status("/api/albums", 502),
        );
        let mut traversal = traversal(&transport, false);

        let err = traversal.fetch_albums_for_circle(&Identifier::ById(17)).await.unwrap_err();
        assert!(matches!(err, FetchError::Upstream(UpstreamError::Status { status: 502, .. })));
    }

    #[tokio::test]
    async fn test_song_details_isolate_failing_song() {
        let transport = Arc::new(demo_cd_catalog());
        let mut traversal = traversal(&transport, true);

        let album = traversal
            .fetch_song_details_for_album(&Identifier::from(DEMO_CD))
            .await
            .unwrap();

        assert_eq!(album.id, 4468);
        assert_eq!(album.title, DEMO_CD);
        assert_eq!(album.entries.len(), 3);

        let names: Vec<&str> = album.entries.iter().map(|e| e.song_ref.name.as_str()).collect();
        assert_eq!(names, vec!["Feel The Flow", "White Wind", "Mirror Image"]);

        let first = album.entries[0].outcome.as_ref().unwrap();
        assert_eq!(first.id, 501);
        assert_eq!(first.album_id, Some(4468));
        assert_eq!(first.lyrics.as_deref(), Some("Feel The Flow lyrics"));

        assert_eq!(album.entries[1].outcome.as_ref().unwrap_err().status_code(), Some(503));

        let third = album.entries[2].outcome.as_ref().unwrap();
        assert_eq!(third.name, "Mirror Image");
        assert!(third.lyrics.is_none());

        let song_requests: Vec<_> = transport
            .requests()
            .into_iter()
            .filter(|url| url.path().starts_with("/api/songs/"))
            .collect();
        assert_eq!(song_requests.len(), 3);
        assert!(song_requests
            .iter()
            .all(|url| url.query_pairs().any(|(k, v)| k == "albumId" && v == "4468")));

        // No lyrics lookup for the song whose details failed.
        assert_eq!(transport.count("/api.php"), 2);
    }

    #[tokio::test]
    async fn test_lyrics_can_be_disabled() {
        let transport = Arc::new(demo_cd_catalog());
        let mut traversal = traversal(&transport, false);

        let album = traversal.fetch_song_details_for_album(&Identifier::ById(4468)).await.unwrap();

        assert!(album.entries[0].outcome.as_ref().unwrap().lyrics.is_none());
        assert_eq!(transport.count("/api.php"), 0);
        assert_eq!(transport.count("/api/albums"), 0);
    }

    #[tokio::test]
    async fn test_song_without_embedded_record_skips_lyrics() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .json(
                    "/api/albums/1/details",
                    json!({ "id": 1, "name": "Single", "songs": [{ "name": "Odd", "song": { "id": 9 } }] }),
                )
                .json("/api/songs/9/details", json!({ "song": "not an object" })),
        );
        let mut traversal = traversal(&transport, true);

        let album = traversal.fetch_song_details_for_album(&Identifier::ById(1)).await.unwrap();
        let detail = album.entries[0].outcome.as_ref().unwrap();

        assert_eq!(detail.id, 9);
        assert_eq!(detail.name, "Odd");
        assert!(detail.lyrics.is_none());
        assert_eq!(transport.count("/api.php"), 0);
    }

    #[tokio::test]
    async fn test_crawl_reuses_album_song_refs() {
        let transport = Arc::new(felt_catalog());
        let mut traversal = traversal(&transport, false);

        let crawl = traversal.crawl_circle(&Identifier::from("FELT")).await.unwrap();

        assert_eq!(crawl.circle.id, 17);
        assert_eq!(crawl.circle.name, "FELT");
        assert_eq!(crawl.albums.len(), 2);
        assert_eq!(crawl.albums[0].entries.len(), 2);
        assert_eq!(crawl.albums[1].entries.len(), 1);
        assert!(crawl.albums.iter().flat_map(|a| &a.entries).all(|e| e.outcome.is_ok()));

        assert_eq!(transport.count("/api/albums/300/details"), 1);
        assert_eq!(transport.count("/api/albums/100/details"), 1);
        assert_eq!(
            transport.request_paths()[5..],
            ["/api/songs/31/details", "/api/songs/32/details", "/api/songs/41/details"]
        );
    }

    #[tokio::test]
    async fn test_crawl_skips_songs_of_failed_album() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .json("/api/artists/17/details", json!({ "id": 17, "name": "FELT" }))
                .json("/api/albums", json!({ "items": [{ "id": 1, "name": "Broken" }, { "id": 2, "name": "Fine" }] }))
                .status("/api/albums/1/details", 500)
                .json(
                    "/api/albums/2/details",
                    json!({ "id": 2, "songs": [{ "name": "Petal", "song": { "id": 41 } }] }),
                )
                .json("/api/songs/41/details", song(41, "Petal")),
        );
        let mut traversal = traversal(&transport, false);

        let crawl = traversal.crawl_circle(&Identifier::ById(17)).await.unwrap();

        assert_eq!(crawl.albums.len(), 2);
        assert_eq!(crawl.albums[0].summary.songs.as_ref().unwrap_err().status_code(), Some(500));
        assert!(crawl.albums[0].entries.is_empty());
        assert_eq!(crawl.albums[1].entries.len(), 1);
        assert!(crawl.albums[1].entries[0].outcome.is_ok());
        assert_eq!(
            transport.request_paths(),
            vec![
                "/api/artists/17/details",
                "/api/albums",
                "/api/albums/1/details",
                "/api/albums/2/details",
                "/api/songs/41/details",
            ]
        );
    }

    #[tokio::test]
    async fn test_lookup_song_by_name_with_lyrics() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .json("/api/songs", json!({ "items": [{ "id": 502, "name": "White Wind" }] }))
                .json("/api/songs/502/details", song(502, "White Wind"))
                .json("/api.php", json!({ "parse": { "wikitext": "wind" } })),
        );
        let mut traversal = traversal(&transport, true);

        let detail = traversal.lookup_song(&Identifier::from("White Wind")).await.unwrap();

        assert_eq!(detail.id, 502);
        assert_eq!(detail.album_id, None);
        assert_eq!(detail.lyrics.as_deref(), Some("wind"));

        let stats = traversal.cache_stats();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[2].kind, EntityKind::Song);
        assert_eq!(stats[2].total_entries, 1);
    }
}
