//! Content-cloud CLI adapter.

use crate::config::SiteConfig;
use crate::tools::process;
use anyhow::{anyhow, Result};

pub trait ContentCloudCli {
    /// Register the deployed site and return the assigned site id.
    fn register_site(&self, url: &str) -> Result<String>;
    fn configure_webhook(&self, site_id: &str, webhook_url: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ContentCli {
    bin: String,
}

impl ContentCli {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            bin: config.content_cli.clone(),
        }
    }
}

impl ContentCloudCli for ContentCli {
    fn register_site(&self, url: &str) -> Result<String> {
        let out = process::run(&self.bin, &["site", "create", "--url", url], None)?;
        parse_site_id(&out.stdout)
            .ok_or_else(|| anyhow!("no site id in {} output", self.bin))
    }

    fn configure_webhook(&self, site_id: &str, webhook_url: &str) -> Result<()> {
        process::run(
            &self.bin,
            &["site", "configure", site_id, "--webhook-url", webhook_url],
            None,
        )?;
        Ok(())
    }
}

/// The CLI prints the id as the last token of the first non-empty line.
fn parse_site_id(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.split_whitespace().last())
        .map(str::to_string)
}

/// Derive the webhook endpoint from the site's live URL: forced to https,
/// no trailing slash.
pub fn webhook_url(live_url: &str) -> String {
    let base = live_url.trim().trim_end_matches('/');
    let base = match base.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => base.to_string(),
    };
    format!("{base}/api/content-cloud/webhook")
}
