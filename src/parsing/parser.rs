//! C++ header parser: tree-sitter front end plus model construction

use super::builder::ModelBuilder;
use super::walker::HeaderWalker;
use crate::error::{HeaderResult, ParseError, ParseResult};
use crate::model::HeaderModel;
use tracing::debug;
use tree_sitter::{Node, Parser, Tree};

pub struct HeaderParser {
    parser: Parser,
}

impl std::fmt::Debug for HeaderParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderParser")
            .field("language", &"C++")
            .finish()
    }
}

impl HeaderParser {
    pub fn new() -> ParseResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .map_err(|e| ParseError::ParserInit {
                language: "C++".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { parser })
    }

    /// Parse `code` into a syntax tree.
    ///
    /// A tree containing any `ERROR` or `MISSING` node is rejected with the
    /// position of the first one; no partial tree is handed out.
    pub fn parse_tree(&mut self, code: &str, file_name: &str) -> ParseResult<Tree> {
        let tree = self
            .parser
            .parse(code, None)
            .ok_or_else(|| ParseError::NoTree {
                file: file_name.to_string(),
            })?;

        if let Some(error_node) = first_error(tree.root_node()) {
            let point = error_node.start_position();
            let reason = if error_node.is_missing() {
                format!("missing {}", error_node.kind())
            } else {
                let snippet = code
                    .get(error_node.byte_range())
                    .and_then(|text| text.lines().next())
                    .unwrap_or("")
                    .trim();
                format!("unexpected input '{snippet}'")
            };
            return Err(ParseError::SyntaxError {
                file: file_name.to_string(),
                line: point.row + 1,
                column: point.column,
                reason,
            });
        }

        Ok(tree)
    }

    /// Parse a header and build its model in a single traversal
    pub fn parse(&mut self, code: &str, file_name: &str) -> HeaderResult<HeaderModel> {
        let tree = self.parse_tree(code, file_name)?;

        let mut builder = ModelBuilder::new(code, file_name);
        HeaderWalker::new(code).walk(&tree, &mut builder)?;
        let model = builder.finish()?;

        debug!(
            "modeled {file_name}: class={:?}, {} includes, {} directives",
            model.class().map(|class| class.name()),
            model.includes().len(),
            model.statements().len()
        );
        Ok(model)
    }
}

/// First `ERROR`/`MISSING` node in document order
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Convenience wrapper: fresh parser, one header
pub fn parse_header(code: &str, file_name: &str) -> HeaderResult<HeaderModel> {
    HeaderParser::new()?.parse(code, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeaderError;

    #[test]
    fn test_parser_creation() {
        let parser = HeaderParser::new().expect("Failed to create header parser");
        assert_eq!(format!("{parser:?}"), "HeaderParser { language: \"C++\" }");
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let code = "class Foo {\npublic:\n    void run() @@;\n};\n";
        let err = parse_header(code, "Foo.h").unwrap_err();
        match err {
            HeaderError::Parse(ParseError::SyntaxError { file, line, .. }) => {
                assert_eq!(file, "Foo.h");
                assert_eq!(line, 3);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_header_without_class() {
        let model = parse_header("#include <vector>\n", "empty.h").unwrap();
        assert!(model.class().is_none());
        assert_eq!(model.includes(), ["#include <vector>"]);
    }
}
