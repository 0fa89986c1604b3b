//! Static tool metadata read by the host editor
//!
//! The sanitize allow-list is the persisted-markup contract: the host keeps
//! `<span class="font-size-tool" style="...">` and strips anything else.

use serde::{Deserialize, Serialize};

/// Tag of the wrapper element
pub const WRAPPER_TAG: &str = "span";

/// Reserved class marking a wrapper as ours
pub const MARKER_CLASS: &str = "font-size-tool";

/// Inline style property carried by the wrapper
pub const FONT_SIZE_PROPERTY: &str = "font-size";

pub const SHORTCUT: &str = "CMD+SHIFT+F";

pub const TITLE: &str = "Font Size";

/// Allowed attributes for a span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanRule {
    pub class: String,
    pub style: bool,
}

/// Markup shapes the host may persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeConfig {
    pub span: SpanRule,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            span: SpanRule {
                class: MARKER_CLASS.to_string(),
                style: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetadata {
    pub is_inline: bool,
    pub shortcut: String,
    pub title: String,
    pub sanitize: SanitizeConfig,
}

impl Default for ToolMetadata {
    fn default() -> Self {
        Self {
            is_inline: true,
            shortcut: SHORTCUT.to_string(),
            title: TITLE.to_string(),
            sanitize: SanitizeConfig::default(),
        }
    }
}
