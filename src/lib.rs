//! Font Size Tool WASM Module
//!
//! Inline tool for block-based rich-text editors: a toolbar button, a menu
//! of sizes, and the markup transformation that wraps the selection in a
//! `<span class="font-size-tool" style="font-size: ...">`.

pub mod api;
pub mod dom;
pub mod error;
pub mod models;
pub mod tool;

// Re-export commonly used types
pub use error::{DomError, DomResult, ToolError};
pub use models::{FontSizeOption, SelectionState, SizeChoice, ToolConfig, ToolMetadata};
pub use tool::FontSizeTool;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console")]
    {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Debug).is_err() {
            log::debug!("logger was already initialized");
        }
    }

    log::info!("Font size tool WASM module initialized");
}
