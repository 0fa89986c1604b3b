//! Plain data models shared by the engine and the JavaScript API

pub mod config;
pub mod font_size;
pub mod metadata;

// Re-export commonly used types
pub use config::{is_css_length, ToolConfig, DEFAULT_SIZE};
pub use font_size::{default_font_sizes, FontSizeOption, SelectionState, SizeChoice};
pub use metadata::{SanitizeConfig, SpanRule, ToolMetadata, FONT_SIZE_PROPERTY, MARKER_CLASS, WRAPPER_TAG};
