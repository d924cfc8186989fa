//! `waymark check` command implementation.

use std::path::PathBuf;

use clap::Args;
use waymark_config::Config;
use waymark_site::{MatchMode, SiteMap};

use crate::commands::build_site_map;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover waymark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Builds the route table from the sidebar spec, then verifies that
    /// every internal navbar and footer link resolves to a real route.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let map = build_site_map(&config)?;

        output.info(&format!(
            "Sidebar spec: {}",
            config.docs_resolved.sidebar_file.display()
        ));
        output.info(&format!(
            "Built {} routes from {} navigation nodes",
            map.table.len(),
            map.nav.len()
        ));

        let broken = broken_links(&config, &map);
        if broken.is_empty() {
            output.success("All internal links resolve");
            return Ok(());
        }

        for (label, to) in &broken {
            output.warning(&format!("Broken link: \"{label}\" -> {to}"));
        }
        Err(CliError::Validation(format!(
            "{} internal link(s) do not resolve",
            broken.len()
        )))
    }
}

/// Collect navbar and footer links whose `to` path falls through to the
/// wildcard route.
fn broken_links(config: &Config, map: &SiteMap) -> Vec<(String, String)> {
    config
        .links()
        .filter_map(|link| {
            let to = link.to.as_ref()?;
            let entry = map.table.resolve(to);
            (entry.match_mode == MatchMode::Wildcard).then(|| (link.label.clone(), to.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use waymark_config::LinkConfig;
    use waymark_site::{NavTree, RouteOptions, RouteTable, SidebarSpec, StandalonePage};

    use super::*;

    fn sample_map() -> SiteMap {
        let sidebar =
            SidebarSpec::from_yaml("name: docs\nentries:\n  - guide/intro\n").unwrap();
        let nav = NavTree::build(&sidebar).unwrap();
        let table = RouteTable::build(
            &nav,
            &sidebar.name,
            &[StandalonePage::new("/", "home")],
            &RouteOptions::default(),
        )
        .unwrap();
        SiteMap { nav, table }
    }

    fn link(label: &str, to: &str) -> LinkConfig {
        LinkConfig {
            label: label.to_string(),
            to: Some(to.to_string()),
            href: None,
            position: None,
        }
    }

    #[test]
    fn test_broken_links_empty_when_all_resolve() {
        let mut config = Config::default();
        config.navbar.items.push(link("Guide", "/docs/guide/intro"));
        config.navbar.items.push(link("Home", "/"));

        assert!(broken_links(&config, &sample_map()).is_empty());
    }

    #[test]
    fn test_broken_links_reports_wildcard_fallthrough() {
        let mut config = Config::default();
        config.navbar.items.push(link("Guide", "/docs/guide/intro"));
        config.navbar.items.push(link("Missing", "/docs/missing"));

        let broken = broken_links(&config, &sample_map());
        assert_eq!(
            broken,
            vec![("Missing".to_string(), "/docs/missing".to_string())]
        );
    }

    #[test]
    fn test_broken_links_ignores_external_href() {
        let mut config = Config::default();
        config.navbar.items.push(LinkConfig {
            label: "GitHub".to_string(),
            to: None,
            href: Some("https://github.com/waymarkdocs/waymark".to_string()),
            position: None,
        });

        assert!(broken_links(&config, &sample_map()).is_empty());
    }
}
