use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::core::infrastructure::cache::ResolutionCache;
use crate::core::models::{DetailRecord, EntityKind, Identifier, SearchPage};
use crate::core::services::endpoints::Endpoints;
use crate::core::services::transport::Transport;
use crate::error::FetchError;

/// Resolves name-or-id input for one entity kind into its detail record.
///
/// Names are searched once per run and the first search result is taken as
/// the canonical match. The cache only memoizes the name to ID mapping; the
/// detail record is fetched on every call.
#[derive(Debug)]
pub struct EntityResolver {
    kind: EntityKind,
    cache: ResolutionCache,
}

impl EntityResolver {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            cache: ResolutionCache::new(kind),
        }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub async fn resolve(
        &mut self,
        transport: &dyn Transport,
        endpoints: &Endpoints,
        identifier: &Identifier,
    ) -> Result<DetailRecord, FetchError> {
        let id = self.resolve_id(transport, endpoints, identifier).await?;
        fetch_detail_record(transport, self.kind, &endpoints.details_by_id(self.kind, id)).await
    }

    /// Canonical ID for `identifier`, searching only for uncached names.
    pub async fn resolve_id(
        &mut self,
        transport: &dyn Transport,
        endpoints: &Endpoints,
        identifier: &Identifier,
    ) -> Result<u64, FetchError> {
        let name = match identifier {
            Identifier::ById(id) => return Ok(*id),
            Identifier::ByName(name) if name.trim().is_empty() => {
                return Err(FetchError::NotFound {
                    kind: self.kind,
                    query: name.clone(),
                })
            }
            Identifier::ByName(name) => name,
        };

        if let Some(id) = self.cache.get(name) {
            return Ok(id);
        }

        info!("Searching {} '{}'", self.kind, name);
        let url = endpoints.search_by_name(self.kind, name);
        let page: SearchPage = transport.get(&url).await?.expect_json()?;

        let first = page.items.first().ok_or_else(|| FetchError::NotFound {
            kind: self.kind,
            query: name.clone(),
        })?;
        let id = first.require_id(self.kind)?;

        debug!(
            "{} '{}' matched #{} ({}) out of {} result(s)",
            self.kind,
            name,
            id,
            first.display_name().unwrap_or("unnamed"),
            page.items.len()
        );

        Ok(self.cache.insert(name, id))
    }
}

/// GET a details endpoint and wrap its JSON payload.
pub async fn fetch_detail_record(
    transport: &dyn Transport,
    kind: EntityKind,
    url: &Url,
) -> Result<DetailRecord, FetchError> {
    let payload: Value = transport.get(url).await?.expect_json()?;
    Ok(DetailRecord::new(kind, payload))
}
