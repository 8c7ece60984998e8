//! Pipeline construction: the ordered step list per site type.
//!
//! The step list, including each step's failure policy, is fixed here before
//! the run starts; the orchestrator never reclassifies a failure.

use crate::config::{SiteConfig, SiteType};
use crate::console;
use crate::manifest::{self, ManifestDoc, PatchOutcome};
use crate::step::Step;
use crate::tools::cms::CmsShell;
use crate::tools::content::{self, ContentCli, ContentCloudCli};
use crate::tools::git::{self, Committed};
use crate::tools::platform::{ConnectionMode, HostingCli, PlatformCli};
use crate::workdir::WorkdirGuard;

pub fn build(config: &SiteConfig) -> Vec<Step> {
    let platform = PlatformCli::new(config);
    let content_cli = ContentCli::new(config);
    let cms = CmsShell::new(platform.clone(), config.site_type);

    let mut steps = Vec::new();

    if let Some(token) = config.machine_token.clone() {
        let p = platform.clone();
        steps.push(Step::new(
            "authenticate",
            "Authenticate the hosting CLI",
            move |_ctx| p.auth(&token),
        ));
    }

    let p = platform.clone();
    let upstream = config.site_type.upstream();
    steps.push(Step::new(
        "create-site",
        format!(
            "Create the {} site on the hosting platform",
            config.site_type.name()
        ),
        move |ctx| p.create_site(upstream, &ctx.config.site_name),
    ));

    let p = platform.clone();
    steps.push(Step::new(
        "resolve-live-url",
        "Look up the environment URL",
        move |ctx| {
            let url = p.env_url()?;
            tracing::info!(url = url.as_str(), "environment URL resolved");
            ctx.live_url = Some(url);
            Ok(())
        },
    ));

    let p = platform.clone();
    steps.push(Step::new(
        "connection-sftp",
        "Switch the environment to SFTP mode for installs",
        move |_ctx| p.set_connection_mode(ConnectionMode::Sftp),
    ));

    let installer = cms.clone();
    steps.push(Step::new(
        "install-cms",
        "Run the CMS installer with the admin account",
        move |ctx| {
            let url = ctx.live_url()?.to_string();
            installer.site_install(
                &url,
                &ctx.config.site_name,
                &ctx.config.admin_email,
                &ctx.config.admin_password,
            )
        },
    ));

    match config.site_type {
        SiteType::Drupal => {
            let composer = cms.clone();
            steps.push(Step::new(
                "install-packages",
                "Require the search packages via composer",
                move |ctx| {
                    for spec in &ctx.config.packages {
                        composer.require_package(spec)?;
                    }
                    Ok(())
                },
            ));

            let modules = cms;
            steps.push(Step::new(
                "enable-modules",
                "Enable the search modules",
                move |ctx| {
                    for name in &ctx.config.modules {
                        modules.enable_module(name)?;
                    }
                    Ok(())
                },
            ));

            let p = platform.clone();
            steps.push(Step::non_fatal(
                "clear-cache",
                "Clear the environment cache",
                move |_ctx| p.clear_cache(),
            ));

            let p = platform.clone();
            steps.push(Step::non_fatal(
                "enable-search",
                "Enable the search service (may already be enabled)",
                move |_ctx| p.enable_search(),
            ));

            let p = platform.clone();
            steps.push(Step::new(
                "connection-git",
                "Switch the environment back to git mode",
                move |_ctx| p.set_connection_mode(ConnectionMode::Git),
            ));

            let p = platform;
            steps.push(Step::new(
                "configure-manifest",
                "Patch the platform manifest in a fresh clone and push it",
                move |_ctx| {
                    let guard = WorkdirGuard::enter()?;
                    let repo = p.clone_repository(guard.path())?;
                    let mut doc = ManifestDoc::load(&repo.join(manifest::MANIFEST_FILE))?;
                    doc.ensure_api_version();
                    doc.ensure_search_block();
                    match doc.save()? {
                        PatchOutcome::Unchanged => console::info("no changes to commit"),
                        PatchOutcome::Changed => {
                            let committed =
                                git::commit_and_push(&repo, "Enable platform search")?;
                            if committed == Committed::Nothing {
                                console::info("no changes to commit");
                            }
                        }
                    }
                    Ok(())
                },
            ));
        }
        SiteType::Wordpress => {
            let plugins = cms;
            steps.push(Step::new(
                "install-plugins",
                "Install and activate the plugins",
                move |ctx| {
                    for spec in &ctx.config.plugins {
                        plugins.install_plugin(spec)?;
                    }
                    Ok(())
                },
            ));

            let p = platform;
            steps.push(Step::non_fatal(
                "clear-cache",
                "Clear the environment cache",
                move |_ctx| p.clear_cache(),
            ));
        }
    }

    let c = content_cli.clone();
    steps.push(Step::new(
        "register-content",
        "Register the site with the content cloud",
        move |ctx| {
            let url = ctx.live_url()?.to_string();
            let id = c.register_site(&url)?;
            console::info(&format!("content site id {id}"));
            ctx.content_site_id = Some(id);
            Ok(())
        },
    ));

    let c = content_cli;
    steps.push(Step::new(
        "configure-webhook",
        "Point the content-cloud webhook at the site",
        move |ctx| {
            let hook = content::webhook_url(ctx.live_url()?);
            c.configure_webhook(ctx.content_site_id()?, &hook)
        },
    ));

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::step::FailurePolicy;

    fn names(steps: &[Step]) -> Vec<&str> {
        steps.iter().map(Step::name).collect()
    }

    #[test]
    fn drupal_pipeline_runs_search_and_manifest_steps_in_order() {
        let mut cfg = config::sample();
        cfg.machine_token = Some("tok".to_string());
        let steps = build(&cfg);
        assert_eq!(
            names(&steps),
            vec![
                "authenticate",
                "create-site",
                "resolve-live-url",
                "connection-sftp",
                "install-cms",
                "install-packages",
                "enable-modules",
                "clear-cache",
                "enable-search",
                "connection-git",
                "configure-manifest",
                "register-content",
                "configure-webhook",
            ]
        );
    }

    #[test]
    fn wordpress_pipeline_skips_search_and_manifest() {
        let mut cfg = config::sample();
        cfg.site_type = SiteType::Wordpress;
        let steps = build(&cfg);
        let names = names(&steps);
        assert!(!names.contains(&"enable-search"));
        assert!(!names.contains(&"connection-git"));
        assert!(!names.contains(&"configure-manifest"));
        assert!(names.contains(&"install-plugins"));
        assert_eq!(names.last(), Some(&"configure-webhook"));
    }

    #[test]
    fn authenticate_is_omitted_without_a_machine_token() {
        let steps = build(&config::sample());
        assert_eq!(names(&steps).first(), Some(&"create-site"));
    }

    #[test]
    fn only_best_effort_steps_are_non_fatal() {
        let mut cfg = config::sample();
        cfg.machine_token = Some("tok".to_string());
        for step in &build(&cfg) {
            let expected = matches!(step.name(), "clear-cache" | "enable-search");
            assert_eq!(
                step.policy() == FailurePolicy::NonFatal,
                expected,
                "unexpected policy for {}",
                step.name()
            );
        }
    }
}
