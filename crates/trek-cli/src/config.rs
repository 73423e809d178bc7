//! Extractor configuration file

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use trek_core::ExtractorConfig;

/// Load the extractor configuration, falling back to defaults without a file.
pub fn load(path: Option<&Path>) -> Result<ExtractorConfig> {
    let Some(path) = path else {
        return Ok(ExtractorConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Parse TOML; keys left out keep their default values.
pub fn parse(text: &str) -> Result<ExtractorConfig> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_file() {
        let config = load(None).unwrap();
        assert_eq!(config.index_section_id, "Television");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Some(Path::new("/nonexistent/trekpedia.toml"))).unwrap_err();
        assert!(err.to_string().contains("trekpedia.toml"));
    }

    #[test]
    fn test_parse_partial() {
        let config = parse(
            r#"
            site_origin = "https://en.m.wikipedia.org"
            exception_series = ["Picard"]

            [[overrides.season_counts]]
            series = "Prodigy"
            reported = 1
            corrected = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.site_origin, "https://en.m.wikipedia.org");
        assert_eq!(config.exception_series, vec!["Picard".to_string()]);
        assert_eq!(config.overrides.season_count("prodigy", 1), 2);
        assert_eq!(config.default_heading_tag, "h2");
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        assert!(parse("exception_series = 3").is_err());
    }
}
