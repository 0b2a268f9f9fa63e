use crate::config::types::{Config, CrawlerConfig, OutputConfig, ScheduleConfig, UserAgentConfig};
use crate::url::normalize_seed;
use crate::ConfigError;
use url::Url;

pub const MIN_PAGES_LIMIT: u32 = 1;
pub const MAX_PAGES_LIMIT: u32 = 500;
pub const MIN_DELAY_SECONDS: f64 = 0.1;
pub const MAX_DELAY_SECONDS: f64 = 10.0;
pub const MIN_LOOP_INTERVAL_MINUTES: u64 = 1;
pub const MAX_LOOP_INTERVAL_MINUTES: u64 = 1440;

const MIN_TIMEOUT_SECONDS: u64 = 1;
const MAX_TIMEOUT_SECONDS: u64 = 120;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_schedule_config(&config.schedule)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !(MIN_PAGES_LIMIT..=MAX_PAGES_LIMIT).contains(&config.max_pages) {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between {} and {}, got {}",
            MIN_PAGES_LIMIT, MAX_PAGES_LIMIT, config.max_pages
        )));
    }

    // NaN fails the range check as well
    if !(MIN_DELAY_SECONDS..=MAX_DELAY_SECONDS).contains(&config.delay_seconds) {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be between {} and {}, got {}",
            MIN_DELAY_SECONDS, MAX_DELAY_SECONDS, config.delay_seconds
        )));
    }

    if !(MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&config.timeout_seconds) {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be between {} and {}, got {}",
            MIN_TIMEOUT_SECONDS, MAX_TIMEOUT_SECONDS, config.timeout_seconds
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.export_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "export-dir cannot be empty".to_string(),
        ));
    }

    if config.formats.is_empty() {
        return Err(ConfigError::Validation(
            "formats must name at least one export format".to_string(),
        ));
    }

    Ok(())
}

/// Validates loop mode settings
fn validate_schedule_config(config: &ScheduleConfig) -> Result<(), ConfigError> {
    if let Some(minutes) = config.loop_interval_minutes {
        if !(MIN_LOOP_INTERVAL_MINUTES..=MAX_LOOP_INTERVAL_MINUTES).contains(&minutes) {
            return Err(ConfigError::Validation(format!(
                "loop-interval-minutes must be between {} and {}, got {}",
                MIN_LOOP_INTERVAL_MINUTES, MAX_LOOP_INTERVAL_MINUTES, minutes
            )));
        }
    }

    Ok(())
}

/// Validates seed URLs after scheme defaulting
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    for seed in seeds {
        normalize_seed(seed).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            seeds: vec!["https://example.com/".to_string()],
            ..Config::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_max_pages_bounds() {
        let mut config = valid_config();

        config.crawler.max_pages = 1;
        assert!(validate(&config).is_ok());
        config.crawler.max_pages = 500;
        assert!(validate(&config).is_ok());

        config.crawler.max_pages = 0;
        assert!(validate(&config).is_err());
        config.crawler.max_pages = 501;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_delay_bounds() {
        let mut config = valid_config();

        config.crawler.delay_seconds = 0.1;
        assert!(validate(&config).is_ok());
        config.crawler.delay_seconds = 10.0;
        assert!(validate(&config).is_ok());

        config.crawler.delay_seconds = 0.05;
        assert!(validate(&config).is_err());
        config.crawler.delay_seconds = 10.5;
        assert!(validate(&config).is_err());
        config.crawler.delay_seconds = f64::NAN;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = valid_config();
        config.crawler.timeout_seconds = 0;
        assert!(validate(&config).is_err());
        config.crawler.timeout_seconds = 121;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_crawler_name() {
        let mut config = valid_config();
        config.user_agent.crawler_name = "Invalid Name!".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_contact_url() {
        let mut config = valid_config();
        config.user_agent.contact_url = Some("not a url".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_empty_format_list_rejected() {
        let mut config = valid_config();
        config.output.formats.clear();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(msg)) if msg.contains("formats")
        ));
    }

    #[test]
    fn test_loop_interval_bounds() {
        let mut config = valid_config();

        config.schedule.loop_interval_minutes = Some(1);
        assert!(validate(&config).is_ok());
        config.schedule.loop_interval_minutes = Some(1440);
        assert!(validate(&config).is_ok());

        config.schedule.loop_interval_minutes = Some(0);
        assert!(validate(&config).is_err());
        config.schedule.loop_interval_minutes = Some(1441);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_seed_without_scheme_is_accepted() {
        let mut config = valid_config();
        config.seeds = vec!["example.com/start".to_string()];
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_non_http_seed_rejected() {
        let mut config = valid_config();
        config.seeds = vec!["ftp://example.com/".to_string()];
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }
}
