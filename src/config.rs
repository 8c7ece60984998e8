//! Site configuration loading and validation.
//!
//! Configuration is assembled in layers, lowest precedence first: built-in
//! defaults, a JSON config file, `SITEUP_*` environment variables
//! (optionally via a dotenv file). CLI flags override the result.

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const SITE_NAME_PATTERN: &str = "^[a-z0-9][a-z0-9-]*$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    Drupal,
    Wordpress,
}

impl SiteType {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "drupal" => Ok(SiteType::Drupal),
            "wordpress" | "wp" => Ok(SiteType::Wordpress),
            other => Err(anyhow!(
                "unknown site type {other:?} (expected drupal or wordpress)"
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SiteType::Drupal => "drupal",
            SiteType::Wordpress => "wordpress",
        }
    }

    /// Upstream the hosting platform clones the new site from.
    pub fn upstream(&self) -> &'static str {
        match self {
            SiteType::Drupal => "drupal-composer-managed",
            SiteType::Wordpress => "wordpress",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site_name: String,
    pub org_id: String,
    pub region: String,
    pub admin_email: String,
    pub admin_password: String,
    pub site_type: SiteType,
    /// Hosting-platform machine token; when absent the CLI is assumed to be
    /// authenticated already and the authenticate step is omitted.
    pub machine_token: Option<String>,
    /// Hosting environment the pipeline operates on.
    pub environment: String,
    /// Binary name of the hosting-platform CLI.
    pub hosting_cli: String,
    /// Binary name of the content-cloud CLI.
    pub content_cli: String,
    /// Composer packages required on Drupal sites.
    pub packages: Vec<String>,
    /// Modules enabled on Drupal sites.
    pub modules: Vec<String>,
    /// Plugins installed and activated on WordPress sites.
    pub plugins: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: String::new(),
            org_id: String::new(),
            region: "us".to_string(),
            admin_email: String::new(),
            admin_password: String::new(),
            site_type: SiteType::Drupal,
            machine_token: None,
            environment: "dev".to_string(),
            hosting_cli: "terminus".to_string(),
            content_cli: "pcc".to_string(),
            packages: vec!["drupal/search_api_solr".to_string()],
            modules: vec!["search_api_solr".to_string()],
            plugins: vec!["content-publisher".to_string()],
        }
    }
}

/// Inputs that steer config assembly, taken from the CLI surface.
pub struct LoadOptions<'a> {
    pub config_path: Option<&'a Path>,
    pub env_file: Option<&'a Path>,
    pub site_type: Option<SiteType>,
}

/// Assemble and validate the effective config.
pub fn load(opts: &LoadOptions<'_>) -> Result<SiteConfig> {
    let config = assemble(opts)?;
    validate(&config)?;
    Ok(config)
}

/// Assemble the effective config from defaults, environment, and file
/// without validating it; `doctor` reports validation itself.
pub fn assemble(opts: &LoadOptions<'_>) -> Result<SiteConfig> {
    match opts.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("load env file {}", path.display()))?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    let mut config = match opts.config_path.map(Path::to_path_buf).or_else(discover_config_path) {
        Some(path) => read_config(&path)?,
        None => SiteConfig::default(),
    };
    apply_env(&mut config)?;
    if let Some(site_type) = opts.site_type {
        config.site_type = site_type;
    }
    Ok(config)
}

/// Load a config file in the stable JSON format.
pub fn read_config(path: &Path) -> Result<SiteConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: SiteConfig =
        serde_json::from_slice(&bytes).context("parse site config JSON")?;
    Ok(config)
}

/// Validate the assembled config before the pipeline is built.
pub fn validate(config: &SiteConfig) -> Result<()> {
    let site_name = Regex::new(SITE_NAME_PATTERN).context("compile site name pattern")?;
    if !site_name.is_match(&config.site_name) {
        return Err(anyhow!(
            "site name {:?} must be lowercase alphanumeric with hyphens",
            config.site_name
        ));
    }
    for (field, value) in [
        ("org id", &config.org_id),
        ("admin email", &config.admin_email),
        ("admin password", &config.admin_password),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!("{field} must be set"));
        }
    }
    if !config.admin_email.contains('@') {
        return Err(anyhow!(
            "admin email {:?} is not an address",
            config.admin_email
        ));
    }
    Ok(())
}

fn discover_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("siteup.json");
    if local.is_file() {
        return Some(local);
    }
    let user = dirs::config_dir()?.join("siteup/config.json");
    user.is_file().then_some(user)
}

fn apply_env(config: &mut SiteConfig) -> Result<()> {
    apply_vars(config, |key| env::var(key).ok())
}

fn apply_vars<F>(config: &mut SiteConfig, get: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = get("SITEUP_SITE_NAME") {
        config.site_name = v;
    }
    if let Some(v) = get("SITEUP_ORG_ID") {
        config.org_id = v;
    }
    if let Some(v) = get("SITEUP_REGION") {
        config.region = v;
    }
    if let Some(v) = get("SITEUP_ADMIN_EMAIL") {
        config.admin_email = v;
    }
    if let Some(v) = get("SITEUP_ADMIN_PASSWORD") {
        config.admin_password = v;
    }
    if let Some(v) = get("SITEUP_MACHINE_TOKEN") {
        config.machine_token = Some(v);
    }
    if let Some(v) = get("SITEUP_ENV") {
        config.environment = v;
    }
    if let Some(v) = get("SITEUP_HOSTING_CLI") {
        config.hosting_cli = v;
    }
    if let Some(v) = get("SITEUP_CONTENT_CLI") {
        config.content_cli = v;
    }
    if let Some(v) = get("SITEUP_SITE_TYPE") {
        config.site_type = SiteType::parse(&v)?;
    }
    if let Some(v) = get("SITEUP_PACKAGES") {
        config.packages = shell_words::split(&v).context("parse SITEUP_PACKAGES")?;
    }
    if let Some(v) = get("SITEUP_MODULES") {
        config.modules = shell_words::split(&v).context("parse SITEUP_MODULES")?;
    }
    if let Some(v) = get("SITEUP_PLUGINS") {
        config.plugins = shell_words::split(&v).context("parse SITEUP_PLUGINS")?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample() -> SiteConfig {
    SiteConfig {
        site_name: "demo-site".to_string(),
        org_id: "org-1".to_string(),
        admin_email: "admin@example.com".to_string(),
        admin_password: "hunter2".to_string(),
        ..SiteConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn env_vars_override_defaults() {
        let mut config = SiteConfig::default();
        apply_vars(
            &mut config,
            lookup(&[
                ("SITEUP_SITE_NAME", "my-site"),
                ("SITEUP_SITE_TYPE", "WordPress"),
                ("SITEUP_MACHINE_TOKEN", "tok"),
                ("SITEUP_PACKAGES", "drupal/a drupal/b"),
            ]),
        )
        .unwrap();
        assert_eq!(config.site_name, "my-site");
        assert_eq!(config.site_type, SiteType::Wordpress);
        assert_eq!(config.machine_token.as_deref(), Some("tok"));
        assert_eq!(config.packages, vec!["drupal/a", "drupal/b"]);
    }

    #[test]
    fn unknown_site_type_is_rejected() {
        let mut config = SiteConfig::default();
        let err = apply_vars(&mut config, lookup(&[("SITEUP_SITE_TYPE", "joomla")]))
            .unwrap_err();
        assert!(err.to_string().contains("joomla"));
    }

    #[test]
    fn site_type_parse_accepts_aliases() {
        assert_eq!(SiteType::parse("drupal").unwrap(), SiteType::Drupal);
        assert_eq!(SiteType::parse(" WP ").unwrap(), SiteType::Wordpress);
        assert!(SiteType::parse("static").is_err());
    }

    #[test]
    fn validate_rejects_bad_site_names() {
        let mut config = sample();
        for bad in ["", "Has-Caps", "-leading", "under_score"] {
            config.site_name = bad.to_string();
            assert!(validate(&config).is_err(), "accepted {bad:?}");
        }
        config.site_name = "ok-123".to_string();
        validate(&config).unwrap();
    }

    #[test]
    fn validate_requires_admin_email_shape() {
        let mut config = sample();
        config.admin_email = "not-an-address".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn config_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("siteup.json");
        let config = sample();
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.site_name, config.site_name);
        assert_eq!(loaded.site_type, config.site_type);
        assert_eq!(loaded.packages, config.packages);
    }

    #[test]
    fn partial_config_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("siteup.json");
        std::fs::write(&path, r#"{"site_name": "partial"}"#).unwrap();
        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.site_name, "partial");
        assert_eq!(loaded.environment, "dev");
        assert_eq!(loaded.hosting_cli, "terminus");
    }
}
