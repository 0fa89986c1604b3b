//! Font size options and selection state

use serde::{Deserialize, Serialize};

/// One entry of the size menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizeOption {
    /// CSS length applied to the wrapper, e.g. "14px"
    pub size: String,
    /// Human readable name shown in the menu
    pub label: String,
}

impl FontSizeOption {
    pub fn new(size: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            label: label.into(),
        }
    }

    /// Text shown for this option in the menu, e.g. "Large (18px)"
    pub fn menu_text(&self) -> String {
        format!("{} ({})", self.label, self.size)
    }
}

/// The built-in size ladder, 12px to 28px
pub fn default_font_sizes() -> Vec<FontSizeOption> {
    vec![
        FontSizeOption::new("12px", "Small"),
        FontSizeOption::new("14px", "Normal"),
        FontSizeOption::new("16px", "Medium"),
        FontSizeOption::new("18px", "Large"),
        FontSizeOption::new("20px", "Extra Large"),
        FontSizeOption::new("24px", "XXL"),
        FontSizeOption::new("28px", "XXXL"),
    ]
}

/// Whether a font size is in effect at the current selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub has_size: bool,
    pub current_size: Option<String>,
}

impl SelectionState {
    /// No size in effect
    pub fn none() -> Self {
        Self::default()
    }

    pub fn sized(size: impl Into<String>) -> Self {
        Self {
            has_size: true,
            current_size: Some(size.into()),
        }
    }

    /// Size to display, only when one is actually in effect
    pub fn display_size(&self) -> Option<&str> {
        if self.has_size {
            self.current_size.as_deref().filter(|s| !s.is_empty())
        } else {
            None
        }
    }
}

/// What the user picked from the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeChoice {
    /// Wrap the selection in a span with this CSS length
    Size(String),
    /// Strip any font size from the selection
    Clear,
}

impl SizeChoice {
    pub fn size(size: impl Into<String>) -> Self {
        SizeChoice::Size(size.into())
    }
}
