//! Code synthesis: derived text fragments for regenerating a header.

pub mod includes;
pub mod synthesizer;
pub mod types;

pub use synthesizer::{CodeSynthesizer, HeaderFields};
pub use types::map_types;
