//! configuration validation stuff
use crate::{config::options::*, validator, validator_nested};

/// trait for validating config structs
pub trait Validate {
    /// validate the config
    fn validate(&self) -> Result<(), Vec<String>>;

    /// check if the config is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// level names accepted by the logging setup
const VALID_LOG_LEVELS: &[&str] = &[
    "t", "trace", "trc", "d", "debug", "dbg", "i", "info", "inf", "w", "warn", "wrn", "e",
    "error", "err",
];

validator! { LoggingConfig,
    level => |v: &String| VALID_LOG_LEVELS.contains(&v.to_lowercase().as_str()),
        "must be one of trace, debug, info, warn or error";
}

impl Validate for FilterCfg {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors: Vec<String> = Vec::new();

        if let Some(ref rules) = self.blacklist {
            if rules.iter().any(|rule| rule.trim().is_empty()) {
                errors.push("blacklist: must not contain blank rules".to_string());
            }
        }

        if let (Some(min), Some(max)) = (self.min_post_score, self.max_post_score) {
            if min > max {
                errors.push("min_post_score: must not be greater than max_post_score".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

validator_nested! { E6PostCfg,
    fields: {
        version => |v: &u32| *v == 1, "must be 1";
        base_url => |v: &String| v.starts_with("http://") || v.starts_with("https://"),
            "must be a valid http(s) url";
    }
    nested: {
        filter;
        logging;
    }
}

/// format validation errors in a nice way
pub fn format_validation_errors(errors: &[String]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, err) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, err));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_level_is_reported() {
        let cfg = LoggingConfig {
            level: Some("loud".to_string()),
            ..Default::default()
        };

        let errors = cfg.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("level:"));
    }

    #[test]
    fn test_nested_errors_are_prefixed() {
        let cfg = E6PostCfg {
            base_url: Some("e621.net".to_string()),
            filter: Some(FilterCfg {
                blacklist: Some(vec!["  ".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let errors = cfg.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "base_url: must be a valid http(s) url".to_string(),
                "filter.blacklist: must not contain blank rules".to_string(),
            ]
        );
    }

    #[test]
    fn test_inverted_score_window() {
        let cfg = FilterCfg {
            min_post_score: Some(10),
            max_post_score: Some(0),
            ..Default::default()
        };

        assert!(!cfg.is_valid());
    }

    #[test]
    fn test_format_validation_errors() {
        let out = format_validation_errors(&["a: bad".to_string(), "b: worse".to_string()]);
        assert_eq!(
            out,
            "Configuration validation failed:\n  1. a: bad\n  2. b: worse\n"
        );
    }
}
