//! From header text to [`HeaderModel`](crate::model::HeaderModel).
//!
//! `parser` owns the tree-sitter front end, `walker` turns the tree into
//! [`HeaderListener`] events and `builder` listens to those events.

pub mod builder;
pub mod listener;
pub mod parser;
pub mod walker;

pub use builder::ModelBuilder;
pub use listener::{
    AccessSpecifierContext, ClassHeadContext, FragmentContext, HeaderListener, Indirection,
    IndirectTypeContext, MemberFunctionContext, MemberVariableContext, PreprocessorContext,
};
pub use parser::{HeaderParser, parse_header};
pub use walker::HeaderWalker;
