// src/pipeline/validate.rs

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load the configuration at `config_path` (defaults when absent) and
/// validate it, selectors included.
pub fn run_validate(config_path: &Path) -> Result<Config> {
    log::info!("Validating configuration...");

    let config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        log::warn!(
            "No config at {}, validating built-in defaults",
            config_path.display()
        );
        Config::default()
    };

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let selector_count = config.common.all().count()
        + config
            .sites
            .iter()
            .map(|s| s.selectors.all().count())
            .sum::<usize>();
    log::info!("✓ Config OK");
    log::info!("  min confidence: {}", config.classifier.min_confidence);
    log::info!(
        "  site scrapers: {}",
        config
            .sites
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    log::info!("  selectors: {}", selector_count);
    log::info!(
        "  user agent: {} (timeout {}s, {} concurrent)",
        config.crawler.user_agent,
        config.crawler.timeout_secs,
        config.crawler.max_concurrent
    );

    Ok(config)
}
