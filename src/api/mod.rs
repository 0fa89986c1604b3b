//! Font Size Tool WASM API
//!
//! JavaScript-facing surface of the tool.
//!
//! # Module Structure
//!
//! - `helpers`: serialization and host option parsing
//! - `tool`: the exported `FontSizeTool` class the host editor instantiates

pub mod helpers;
pub mod tool;

pub use tool::WasmFontSizeTool;
