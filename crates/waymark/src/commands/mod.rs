//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod routes;
pub(crate) mod serve;

use std::sync::Arc;

pub(crate) use check::CheckArgs;
pub(crate) use routes::RoutesArgs;
pub(crate) use serve::ServeArgs;
use waymark_config::Config;
use waymark_site::{FsSpecSource, RouteOptions, SiteMap, SiteRouter, StandalonePage};

use crate::error::CliError;

/// Build the site map once from configuration.
///
/// Used by offline commands that need the route table without starting
/// the server.
pub(crate) fn build_site_map(config: &Config) -> Result<Arc<SiteMap>, CliError> {
    let pages = config
        .pages
        .iter()
        .map(|page| StandalonePage::new(page.path.clone(), page.target.clone()))
        .collect();
    let source = FsSpecSource::new(config.docs_resolved.sidebar_file.clone(), pages);
    let options = RouteOptions {
        route_base: config.docs_resolved.route_base.clone(),
        not_found_target: config.docs_resolved.not_found_target.clone(),
    };

    let router = SiteRouter::new(Arc::new(source), options);
    Ok(router.rebuild()?)
}
