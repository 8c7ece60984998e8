//! Mutable run state threaded through step actions.
//!
//! Values produced mid-run (live URL, content site id) live here instead of
//! in ambient globals, so each step declares what it reads and writes.

use crate::config::SiteConfig;
use anyhow::{anyhow, Result};

#[derive(Debug)]
pub struct RunContext {
    pub config: SiteConfig,
    pub live_url: Option<String>,
    pub content_site_id: Option<String>,
}

impl RunContext {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            live_url: None,
            content_site_id: None,
        }
    }

    /// The site's public URL, available once the resolve-live-url step ran.
    pub fn live_url(&self) -> Result<&str> {
        self.live_url
            .as_deref()
            .ok_or_else(|| anyhow!("live URL not resolved yet"))
    }

    /// The content-cloud site id, available once registration ran.
    pub fn content_site_id(&self) -> Result<&str> {
        self.content_site_id
            .as_deref()
            .ok_or_else(|| anyhow!("content site not registered yet"))
    }
}
