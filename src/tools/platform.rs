//! Hosting-platform CLI adapter.
//!
//! All repository and environment interactions flow through the platform
//! CLI, including the clone used by the manifest patch step; the CLI manages
//! its own credentials.

use crate::config::SiteConfig;
use crate::tools::process;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    Git,
    Sftp,
}

impl ConnectionMode {
    pub fn name(self) -> &'static str {
        match self {
            ConnectionMode::Git => "git",
            ConnectionMode::Sftp => "sftp",
        }
    }
}

pub trait HostingCli {
    fn auth(&self, token: &str) -> Result<()>;
    fn create_site(&self, upstream: &str, label: &str) -> Result<()>;
    fn env_url(&self) -> Result<String>;
    fn set_connection_mode(&self, mode: ConnectionMode) -> Result<()>;
    fn clear_cache(&self) -> Result<()>;
    fn enable_search(&self) -> Result<()>;
    /// Clone the site repository under `dest`; returns the checkout path.
    fn clone_repository(&self, dest: &Path) -> Result<PathBuf>;
    /// Run a command (drush, wp, composer) on the remote environment.
    fn remote_exec(&self, shell: &str, args: &[&str]) -> Result<String>;
}

/// Process-backed implementation driving the configured platform binary.
#[derive(Debug, Clone)]
pub struct PlatformCli {
    bin: String,
    site: String,
    env: String,
    org: String,
    region: String,
}

impl PlatformCli {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            bin: config.hosting_cli.clone(),
            site: config.site_name.clone(),
            env: config.environment.clone(),
            org: config.org_id.clone(),
            region: config.region.clone(),
        }
    }

    fn site_env(&self) -> String {
        format!("{}.{}", self.site, self.env)
    }
}

impl HostingCli for PlatformCli {
    fn auth(&self, token: &str) -> Result<()> {
        process::run(&self.bin, &["auth:login", "--machine-token", token], None)?;
        Ok(())
    }

    fn create_site(&self, upstream: &str, label: &str) -> Result<()> {
        process::run(
            &self.bin,
            &[
                "site:create",
                &self.site,
                label,
                upstream,
                "--org",
                &self.org,
                "--region",
                &self.region,
            ],
            None,
        )?;
        Ok(())
    }

    fn env_url(&self) -> Result<String> {
        let site_env = self.site_env();
        let out = process::run(&self.bin, &["env:view", &site_env, "--print"], None)?;
        let url = out
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| anyhow!("no URL in {} env:view output", self.bin))?;
        Ok(url.to_string())
    }

    fn set_connection_mode(&self, mode: ConnectionMode) -> Result<()> {
        let site_env = self.site_env();
        process::run(&self.bin, &["connection:set", &site_env, mode.name()], None)?;
        Ok(())
    }

    fn clear_cache(&self) -> Result<()> {
        let site_env = self.site_env();
        process::run(&self.bin, &["env:clear-cache", &site_env], None)?;
        Ok(())
    }

    fn enable_search(&self) -> Result<()> {
        process::run(&self.bin, &["solr:enable", &self.site], None)?;
        Ok(())
    }

    fn clone_repository(&self, dest: &Path) -> Result<PathBuf> {
        let dest_str = dest
            .to_str()
            .ok_or_else(|| anyhow!("clone destination is not valid UTF-8"))?;
        process::run(&self.bin, &["site:clone", &self.site, dest_str], None)?;
        let repo = dest.join(&self.site);
        if !repo.is_dir() {
            return Err(anyhow!("clone did not produce {}", repo.display()));
        }
        Ok(repo)
    }

    fn remote_exec(&self, shell: &str, args: &[&str]) -> Result<String> {
        let site_env = self.site_env();
        let mut argv: Vec<&str> = vec![shell, &site_env, "--"];
        argv.extend_from_slice(args);
        let out = process::run(&self.bin, &argv, None)?;
        Ok(out.stdout)
    }
}
