//! Hostname-based scraper selection.

use crate::models::Config;
use crate::services::scraper::Scraper;

/// Pick the first site profile whose pattern occurs in `hostname`, or the
/// generic scraper when none does.
pub fn select_scraper<'a>(hostname: &str, config: &'a Config) -> Scraper<'a> {
    config
        .sites
        .iter()
        .find_map(|profile| {
            if profile.matches(hostname) {
                log::debug!("Using '{}' scraper for {}", profile.name, hostname);
                Some(Scraper::for_site(profile, config))
            } else {
                None
            }
        })
        .unwrap_or_else(|| {
            log::debug!("No site scraper for {}, using generic", hostname);
            Scraper::generic(config)
        })
}
