//! Candidate enumeration from the directory page.

use gym_map_browser::Session;
use gym_map_models::SiteCandidate;

use crate::ScrapeError;
use crate::config::TargetConfig;

/// Collects the ordered candidate list from the directory page,
/// excluding gyms marked as not yet open.
///
/// There is nothing to recover from a broken directory page, so any
/// failure here (navigation fault, selector matching nothing) is fatal
/// to the whole run.
///
/// # Errors
///
/// Returns [`ScrapeError::Discovery`] on any failure.
pub async fn discover_sites(
    session: &mut dyn Session,
    config: &TargetConfig,
) -> Result<Vec<SiteCandidate>, ScrapeError> {
    session
        .navigate(&config.listing_url)
        .await
        .map_err(|e| ScrapeError::Discovery {
            message: format!("failed to load {}: {e}", config.listing_url),
        })?;

    let links = session
        .links(&config.link_selector)
        .await
        .map_err(|e| ScrapeError::Discovery {
            message: format!("failed to query {:?}: {e}", config.link_selector),
        })?;

    if links.is_empty() {
        return Err(ScrapeError::Discovery {
            message: format!("no gym links matched selector {:?}", config.link_selector),
        });
    }

    let marker = config.opening_soon_marker.to_lowercase();
    let candidates: Vec<SiteCandidate> = links
        .into_iter()
        .filter(|link| !link.text.to_lowercase().contains(&marker))
        .map(|link| SiteCandidate {
            name: link.text,
            url: link.href,
        })
        .collect();

    log::info!("Found {} active gyms on the directory page", candidates.len());
    Ok(candidates)
}
