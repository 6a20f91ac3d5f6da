use crate::config::types::{Config, CrawlerConfig, OutputConfig, SummarizerConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_summarizer_config(&config.summarizer)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !config.fetch_delay_seconds.is_finite() || config.fetch_delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "fetch_delay_seconds must be a non-negative number, got {}",
            config.fetch_delay_seconds
        )));
    }

    if config.request_timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates summarizer endpoint and model options
fn validate_summarizer_config(config: &SummarizerConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation(
            "summarizer host cannot be empty".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation(
            "summarizer port must be between 1 and 65535".to_string(),
        ));
    }

    if !config.endpoint.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "summarizer endpoint must start with '/', got '{}'",
            config.endpoint
        )));
    }

    Url::parse(&config.endpoint_url()).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid summarizer endpoint '{}': {}",
            config.endpoint_url(),
            e
        ))
    })?;

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "temperature must be between 0.0 and 2.0, got {}",
            config.temperature
        )));
    }

    if config.max_tokens == 0 {
        return Err(ConfigError::Validation(
            "max_tokens must be >= 1".to_string(),
        ));
    }

    if config.min_words > config.max_words {
        return Err(ConfigError::Validation(format!(
            "min_words ({}) cannot exceed max_words ({})",
            config.min_words, config.max_words
        )));
    }

    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "summarizer timeout_seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut config = Config::default();
        config.user_agent.crawler_name = "Bad Name!".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = "Good-Name2".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_contact_url() {
        let mut config = Config::default();
        config.user_agent.contact_url = Some("not a url".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_fetch_delay() {
        let mut config = Config::default();
        config.crawler.fetch_delay_seconds = -1.0;
        assert!(validate(&config).is_err());

        config.crawler.fetch_delay_seconds = f64::NAN;
        assert!(validate(&config).is_err());

        config.crawler.fetch_delay_seconds = 0.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_summarizer() {
        let mut config = Config::default();
        config.summarizer.endpoint = "v1/chat/completions".to_string();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.summarizer.temperature = 2.5;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.summarizer.min_words = 300;
        config.summarizer.max_words = 100;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.summarizer.host = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_output_dir() {
        let mut config = Config::default();
        config.output.output_dir = std::path::PathBuf::new();
        assert!(validate(&config).is_err());
    }
}
