use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::models::EntityKind;

/// Albums listed per circle; only the first page is ever requested.
pub const ALBUM_PAGE_SIZE: u32 = 20;

pub const ALBUM_LIST_FIELDS: &str = "AdditionalNames,MainPicture,ReleaseEvent";

/// Options sent with every circle (artist) search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleSearchOptions {
    pub allow_base_voicebanks: bool,
    pub child_tags: bool,
    pub start: u32,
    pub max_results: u32,
    pub get_total_count: bool,
}

impl Default for CircleSearchOptions {
    fn default() -> Self {
        Self {
            allow_base_voicebanks: false,
            child_tags: true,
            start: 0,
            max_results: 10,
            get_total_count: true,
        }
    }
}

/// Builds request URLs for TouhouDB and the Touhou Wiki API.
///
/// Every method is a pure function of its inputs; base URLs are validated
/// when the configuration is loaded.
#[derive(Debug, Clone)]
pub struct Endpoints {
    touhoudb: Url,
    wiki_api: Url,
    circle_search: CircleSearchOptions,
}

impl Endpoints {
    pub fn new(touhoudb: Url, wiki_api: Url) -> Self {
        Self {
            touhoudb,
            wiki_api,
            circle_search: CircleSearchOptions::default(),
        }
    }

    pub fn parse(touhoudb: &str, wiki_api: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(touhoudb)?, Url::parse(wiki_api)?))
    }

    pub fn with_circle_search(mut self, options: CircleSearchOptions) -> Self {
        self.circle_search = options;
        self
    }

    pub fn circle_search(&self) -> &CircleSearchOptions {
        &self.circle_search
    }

    fn api(&self, path: &str) -> Url {
        let mut url = self.touhoudb.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}/api/{}", base, path));
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    /// Search request for `kind`, matching `query` by name.
    pub fn search_by_name(&self, kind: EntityKind, query: &str) -> Url {
        let mut url = self.api(kind.api_segment());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            if kind == EntityKind::Circle {
                let options = &self.circle_search;
                pairs
                    .append_pair("allowBaseVoicebanks", bool_param(options.allow_base_voicebanks))
                    .append_pair("childTags", bool_param(options.child_tags))
                    .append_pair("start", &options.start.to_string())
                    .append_pair("maxResults", &options.max_results.to_string())
                    .append_pair("getTotalCount", bool_param(options.get_total_count));
            }
        }
        url
    }

    pub fn details_by_id(&self, kind: EntityKind, id: u64) -> Url {
        self.api(&format!("{}/{}/details", kind.api_segment(), id))
    }

    /// Song details, scoped to the album the song was listed in when known.
    pub fn song_details(&self, song_id: u64, album_id: Option<u64>) -> Url {
        let mut url = self.details_by_id(EntityKind::Song, song_id);
        if let Some(album_id) = album_id {
            url.query_pairs_mut().append_pair("albumId", &album_id.to_string());
        }
        url
    }

    /// Main albums of a circle, first page only.
    pub fn albums_for_circle(&self, circle_id: u64) -> Url {
        let mut url = self.api(EntityKind::Album.api_segment());
        url.query_pairs_mut()
            .append_pair("query", "")
            .append_pair("artistId[]", &circle_id.to_string())
            .append_pair("fields", ALBUM_LIST_FIELDS)
            .append_pair("lang", "Default")
            .append_pair("nameMatchMode", "Auto")
            .append_pair("sort", "Name")
            .append_pair("discTypes", "Unknown")
            .append_pair("artistParticipationStatus", "OnlyMainAlbums")
            .append_pair("childVoicebanks", "false")
            .append_pair("deleted", "false")
            .append_pair("start", "0")
            .append_pair("maxResults", &ALBUM_PAGE_SIZE.to_string())
            .append_pair("getTotalCount", "true");
        url
    }

    /// Wiki page-parse request for the `Lyrics: {title}` page.
    pub fn lyrics_by_song_title(&self, title: &str) -> Url {
        let mut url = self.wiki_api.clone();
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("action", "parse")
            .append_pair("format", "json")
            .append_pair("page", &format!("Lyrics: {}", title))
            .append_pair("redirect", "0")
            .append_pair("prop", "wikitext|properties")
            .append_pair("utf8", "1")
            .append_pair("formatversion", "2");
        url
    }
}

fn bool_param(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
