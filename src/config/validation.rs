use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} must be an http(s) URL, got: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("api.user_id must not be empty")]
    EmptyUserId,

    #[error("poll.max_attempts must be at least 1")]
    ZeroPollCeiling,

    #[error("poll.interval_ms must be at least 1")]
    ZeroPollInterval,
}

/// Validate a loaded configuration before it is handed to the workflow.
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    check_url("api.base_url", &config.api.base_url)?;
    check_url("api.content_base_url", &config.api.content_base_url)?;

    if config.api.user_id.trim().is_empty() {
        return Err(ValidationError::EmptyUserId);
    }
    if config.poll.max_attempts == 0 {
        return Err(ValidationError::ZeroPollCeiling);
    }
    if config.poll.interval_ms == 0 {
        return Err(ValidationError::ZeroPollInterval);
    }

    Ok(())
}

fn check_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_user_id_rejected() {
        let mut config = Config::default();
        config.api.user_id = "  ".to_string();
        assert!(matches!(validate(&config), Err(ValidationError::EmptyUserId)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = Config::default();
        config.poll.interval_ms = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::ZeroPollInterval)
        ));
    }
}
