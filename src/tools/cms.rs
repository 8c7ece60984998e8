//! CMS shell adapter.
//!
//! drush and wp-cli run on the remote environment through the hosting CLI's
//! command passthrough, so no local CMS install is required.

use crate::config::SiteType;
use crate::tools::platform::HostingCli;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct CmsShell<H> {
    hosting: H,
    site_type: SiteType,
}

impl<H: HostingCli> CmsShell<H> {
    pub fn new(hosting: H, site_type: SiteType) -> Self {
        Self { hosting, site_type }
    }

    /// Run the CMS installer with the configured admin account.
    pub fn site_install(&self, url: &str, title: &str, email: &str, password: &str) -> Result<()> {
        match self.site_type {
            SiteType::Drupal => {
                let site_name = format!("--site-name={title}");
                let mail = format!("--account-mail={email}");
                let pass = format!("--account-pass={password}");
                self.hosting
                    .remote_exec("drush", &["site:install", &site_name, &mail, &pass, "-y"])?;
            }
            SiteType::Wordpress => {
                let url_arg = format!("--url={url}");
                let title_arg = format!("--title={title}");
                let email_arg = format!("--admin_email={email}");
                let pass_arg = format!("--admin_password={password}");
                self.hosting.remote_exec(
                    "wp",
                    &[
                        "core",
                        "install",
                        &url_arg,
                        &title_arg,
                        "--admin_user=admin",
                        &email_arg,
                        &pass_arg,
                    ],
                )?;
            }
        }
        Ok(())
    }

    /// Require a composer package on a Drupal site. The spec may carry extra
    /// composer flags; it is split shell-style.
    pub fn require_package(&self, spec: &str) -> Result<()> {
        let parts =
            shell_words::split(spec).with_context(|| format!("parse package spec {spec:?}"))?;
        let mut args = vec!["require"];
        args.extend(parts.iter().map(String::as_str));
        self.hosting.remote_exec("composer", &args)?;
        Ok(())
    }

    /// Enable a Drupal module.
    pub fn enable_module(&self, name: &str) -> Result<()> {
        self.hosting.remote_exec("drush", &["en", name, "-y"])?;
        Ok(())
    }

    /// Install and activate a WordPress plugin.
    pub fn install_plugin(&self, spec: &str) -> Result<()> {
        let parts =
            shell_words::split(spec).with_context(|| format!("parse plugin spec {spec:?}"))?;
        let mut args = vec!["plugin", "install"];
        args.extend(parts.iter().map(String::as_str));
        args.push("--activate");
        self.hosting.remote_exec("wp", &args)?;
        Ok(())
    }
}
