//! Preflight checks for the external collaborators.

use crate::config::{self, SiteConfig};
use crate::console;

/// Report tool availability and config health; true when everything resolves.
pub fn run(config: &SiteConfig) -> bool {
    let mut ok = true;
    for bin in [config.hosting_cli.as_str(), config.content_cli.as_str(), "git"] {
        match which::which(bin) {
            Ok(path) => console::success(&format!("{bin}: {}", path.display())),
            Err(_) => {
                console::warning(&format!("{bin}: not found on PATH"));
                ok = false;
            }
        }
    }
    match config::validate(config) {
        Ok(()) => console::success("configuration valid"),
        Err(err) => {
            console::warning(&format!("configuration: {err:#}"));
            ok = false;
        }
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tools_fail_the_preflight() {
        let mut config = crate::config::sample();
        config.hosting_cli = "siteup-no-such-hosting-cli".to_string();
        config.content_cli = "siteup-no-such-content-cli".to_string();
        assert!(!run(&config));
    }
}
