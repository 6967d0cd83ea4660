use crate::config::types::{Config, FetcherConfig, OutputConfig, SitemapConfig};
use crate::job::PartialJobOptions;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_sitemap_config(&config.sitemap)?;
    validate_job_defaults(&config.defaults)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates request identity and timeouts
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be greater than 0".to_string(),
        ));
    }

    if config.navigation_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "navigation_timeout_ms must be greater than 0".to_string(),
        ));
    }

    if config.max_redirects > 30 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 30, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

/// Validates sitemap traversal limits
fn validate_sitemap_config(config: &SitemapConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 || config.max_depth > 16 {
        return Err(ConfigError::Validation(format!(
            "sitemap max_depth must be between 1 and 16, got {}",
            config.max_depth
        )));
    }

    if config.max_sitemaps < 1 {
        return Err(ConfigError::Validation(format!(
            "sitemap max_sitemaps must be >= 1, got {}",
            config.max_sitemaps
        )));
    }

    Ok(())
}

/// Validates job option overrides
fn validate_job_defaults(defaults: &PartialJobOptions) -> Result<(), ConfigError> {
    if let Some(concurrency) = defaults.link_check_concurrency {
        if !(1..=64).contains(&concurrency) {
            return Err(ConfigError::Validation(format!(
                "link_check_concurrency must be between 1 and 64, got {}",
                concurrency
            )));
        }
    }

    let delays = [
        ("link_batch_delay_ms", defaults.link_batch_delay_ms),
        ("link_batch_jitter_ms", defaults.link_batch_jitter_ms),
        ("navigation_delay_ms", defaults.navigation_delay_ms),
        ("navigation_jitter_ms", defaults.navigation_jitter_ms),
    ];
    for (name, value) in delays {
        if let Some(v) = value {
            if v < 0 {
                return Err(ConfigError::Validation(format!(
                    "{} cannot be negative, got {}",
                    name, v
                )));
            }
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(config.database_path.as_deref(), Some(p) if p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if matches!(config.report_path.as_deref(), Some(p) if p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
