//! Semantic model of a single C++ class header.

mod access;
mod header;

pub use access::AccessSpecifier;
pub use header::{ClassModel, HeaderModel, MethodEntry, VariableEntry};
