use std::sync::Arc;
use tracing::debug;
use crate::config::Config;
use crate::core::services::transport::{HttpTransport, Transport};
use crate::core::traversal::{Traversal, TraversalOptions};
use crate::error::Result;

/// Centralized factory for creating the services a command needs
pub struct ServiceFactory {
    config: Arc<Config>,
}

impl ServiceFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Create the pooled HTTP transport shared by one run
    pub fn create_transport(&self) -> Result<Arc<dyn Transport>> {
        let transport = HttpTransport::new(&self.config.user_agent, self.config.request_timeout())?;
        Ok(Arc::new(transport))
    }

    /// Create a traversal over a fresh transport and empty caches.
    /// `include_lyrics` overrides the configured default when set.
    pub fn create_traversal(&self, include_lyrics: Option<bool>) -> Result<Traversal> {
        let options = TraversalOptions {
            include_lyrics: include_lyrics.unwrap_or(self.config.include_lyrics),
        };
        let endpoints = self.config.endpoints()?;
        debug!("Circle search options: {:?}", endpoints.circle_search());

        Ok(Traversal::new(self.create_transport()?, endpoints, options))
    }

    /// Get configuration reference
    pub fn config(&self) -> Arc<Config> {
        self.config.clone()
    }
}
