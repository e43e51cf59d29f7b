//! headergen: semantic models of C++ class headers and the text fields
//! needed to regenerate them.

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod parsing;
pub mod pipeline;
pub mod synthesis;
pub mod types;

pub use config::Settings;
pub use error::{
    HeaderError, HeaderResult, ModelError, ModelResult, ParseError, ParseResult,
};
pub use model::{AccessSpecifier, ClassModel, HeaderModel, MethodEntry, VariableEntry};
pub use parsing::{HeaderParser, ModelBuilder, parse_header};
pub use synthesis::{CodeSynthesizer, HeaderFields};
pub use types::{Position, SourceLocation, Span};
