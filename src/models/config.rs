//! Host-supplied tool configuration
//!
//! The host passes `{ fontSizes, defaultSize }` (camelCase) when it constructs
//! the tool. Every field is optional; anything unusable falls back to the
//! built-in defaults and produces a warning instead of an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::font_size::{default_font_sizes, FontSizeOption};

/// Size highlighted in the menu when the selection carries no size
pub const DEFAULT_SIZE: &str = "14px";

static CSS_LENGTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)(?:px|pt|pc|em|rem|ex|ch|vw|vh|vmin|vmax|%|cm|mm|in)$")
        .expect("valid CSS length pattern")
});

/// Check that `value` looks like a CSS length such as `14px` or `1.5rem`
pub fn is_css_length(value: &str) -> bool {
    CSS_LENGTH.is_match(value.trim())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolConfig {
    pub font_sizes: Vec<FontSizeOption>,
    pub default_size: String,
    /// Offer a "Default" entry that strips the size from the selection
    pub allow_clear: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            font_sizes: default_font_sizes(),
            default_size: DEFAULT_SIZE.to_string(),
            allow_clear: true,
        }
    }
}

impl ToolConfig {
    /// Parse a config from JSON, e.g. the `config` block of an editor setup
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Repair the config in place and describe what was wrong with it.
    ///
    /// Invalid lengths and duplicates are kept (the host may know better),
    /// an empty size list is replaced by the defaults.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.font_sizes.is_empty() {
            warnings.push("fontSizes is empty, using the default sizes".to_string());
            self.font_sizes = default_font_sizes();
        }

        let mut seen = HashSet::new();
        for option in &self.font_sizes {
            if !is_css_length(&option.size) {
                warnings.push(format!("'{}' is not a CSS length", option.size));
            }
            if !seen.insert(option.size.as_str()) {
                warnings.push(format!("duplicate font size '{}'", option.size));
            }
        }

        if self.default_size.trim().is_empty() {
            warnings.push("defaultSize is empty, using 14px".to_string());
            self.default_size = DEFAULT_SIZE.to_string();
        } else if !is_css_length(&self.default_size) {
            warnings.push(format!("defaultSize '{}' is not a CSS length", self.default_size));
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_length() {
        assert!(is_css_length("14px"));
        assert!(is_css_length("1.5rem"));
        assert!(is_css_length(".8em"));
        assert!(is_css_length("120%"));
        assert!(!is_css_length("large"));
        assert!(!is_css_length("14"));
        assert!(!is_css_length(""));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ToolConfig::from_json(r#"{"defaultSize": "16px"}"#).unwrap();
        assert_eq!(config.default_size, "16px");
        assert_eq!(config.font_sizes.len(), 7);
        assert!(config.allow_clear);
    }

    #[test]
    fn test_custom_sizes() {
        let config = ToolConfig::from_json(
            r#"{"fontSizes": [{"size": "10px", "label": "Tiny"}, {"size": "40px", "label": "Huge"}]}"#,
        )
        .unwrap();
        assert_eq!(config.font_sizes.len(), 2);
        assert_eq!(config.font_sizes[1].label, "Huge");
        assert_eq!(config.default_size, DEFAULT_SIZE);
    }

    #[test]
    fn test_validate_empty_sizes_falls_back() {
        let mut config = ToolConfig {
            font_sizes: vec![],
            ..Default::default()
        };
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.font_sizes, default_font_sizes());
    }

    #[test]
    fn test_validate_reports_bad_and_duplicate_sizes() {
        let mut config = ToolConfig {
            font_sizes: vec![
                FontSizeOption::new("14px", "A"),
                FontSizeOption::new("14px", "B"),
                FontSizeOption::new("huge", "C"),
            ],
            ..Default::default()
        };
        let warnings = config.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.contains("huge")));
        // kept as given
        assert_eq!(config.font_sizes.len(), 3);
    }

    #[test]
    fn test_default_config_is_clean() {
        assert!(ToolConfig::default().validate().is_empty());
    }
}
