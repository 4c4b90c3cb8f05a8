//! 静态配置校验
//!
//! 启动时检查配置取值，非法值直接拒绝启动。

use super::StaticConfig;

/// Upper bound for generated short codes
pub const MAX_SHORT_CODE_LENGTH: usize = 10;
/// Below this the collision rate makes the bounded retry pointless
pub const MIN_SHORT_CODE_LENGTH: usize = 4;

/// 校验静态配置，返回所有问题
pub fn validate_static_config(config: &StaticConfig) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    let len = config.share.code_length;
    if !(MIN_SHORT_CODE_LENGTH..=MAX_SHORT_CODE_LENGTH).contains(&len) {
        problems.push(format!(
            "share.code_length must be between {} and {}, got {}",
            MIN_SHORT_CODE_LENGTH, MAX_SHORT_CODE_LENGTH, len
        ));
    }

    if config.share.max_attempts == 0 {
        problems.push("share.max_attempts must be at least 1".to_string());
    }

    if config.timeline.max_page_size == 0 {
        problems.push("timeline.max_page_size must be at least 1".to_string());
    }

    if config.timeline.default_page_size == 0
        || config.timeline.default_page_size > config.timeline.max_page_size
    {
        problems.push(format!(
            "timeline.default_page_size must be between 1 and {}, got {}",
            config.timeline.max_page_size, config.timeline.default_page_size
        ));
    }

    if config.auth.access_token_minutes == 0 {
        problems.push("auth.access_token_minutes must be at least 1".to_string());
    }

    if config.database.database_url.trim().is_empty() {
        problems.push("database.database_url must not be empty".to_string());
    }

    if !matches!(config.logging.format.as_str(), "text" | "json") {
        problems.push(format!(
            "logging.format must be 'text' or 'json', got '{}'",
            config.logging.format
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_static_config(&StaticConfig::default()).is_ok());
    }

    #[test]
    fn test_code_length_out_of_range() {
        let mut config = StaticConfig::default();
        config.share.code_length = 11;
        let problems = validate_static_config(&config).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("share.code_length"));

        config.share.code_length = 3;
        assert!(validate_static_config(&config).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = StaticConfig::default();
        config.share.max_attempts = 0;
        assert!(validate_static_config(&config).is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        let mut config = StaticConfig::default();
        config.timeline.default_page_size = 100;
        config.timeline.max_page_size = 50;
        assert!(validate_static_config(&config).is_err());
    }

    #[test]
    fn test_multiple_problems_collected() {
        let mut config = StaticConfig::default();
        config.share.max_attempts = 0;
        config.logging.format = "yaml".to_string();
        let problems = validate_static_config(&config).unwrap_err();
        assert_eq!(problems.len(), 2);
    }
}
