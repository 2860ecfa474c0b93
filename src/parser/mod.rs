//! Parser for the two-layer placeholder description

pub mod lexer;
mod placeholder;

pub use lexer::Placeholder;
pub use placeholder::{parse_layers, ParsedLayers};
