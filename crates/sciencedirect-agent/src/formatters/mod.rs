//! Output formatters for the terminal and JSON.

mod json;
mod text;

pub use self::json::*;
pub use text::*;
