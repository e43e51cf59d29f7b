//! tree-sitter-cpp adapter that drives a [`HeaderListener`]
//!
//! The walker does one depth-first pass over the tree and reports the node
//! kinds the header model cares about. It only computes byte offsets; any
//! text the model keeps is sliced by the listener from the same buffer.

use super::listener::{
    AccessSpecifierContext, ClassHeadContext, FragmentContext, HeaderListener, Indirection,
    IndirectTypeContext, MemberFunctionContext, MemberVariableContext, PreprocessorContext,
};
use crate::error::ModelResult;
use crate::model::AccessSpecifier;
use crate::types::{Position, Span};
use tracing::trace;
use tree_sitter::{Node, Tree};

/// Node kinds that can name a class in a base clause
const CLASS_NAME_KINDS: &[&str] = &["type_identifier", "qualified_identifier", "template_type"];

/// Node kinds that can be registered for forward declaration
const FORWARD_DECLARABLE_KINDS: &[&str] = &["type_identifier", "qualified_identifier"];

/// Class-like specifiers; any of them with a body inside a class is nested
const CLASS_KEY_KINDS: &[&str] = &["class_specifier", "struct_specifier", "union_specifier"];

fn span(node: Node) -> Span {
    node.byte_range().into()
}

fn position(node: Node) -> Position {
    let point = node.start_position();
    Position::new(point.row + 1, point.column)
}

/// Children of `node` paired with the grammar field they occupy
fn children_with_fields<'t>(node: Node<'t>) -> Vec<(Option<&'static str>, Node<'t>)> {
    let mut children = Vec::with_capacity(node.child_count());
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            children.push((cursor.field_name(), cursor.node()));
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    children
}

/// Named, non-comment children
fn significant_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();
    children
}

/// Every non-comment token inside a parameter list except the parentheses.
/// A bare `...` is an anonymous token, so named children are not enough.
fn parameter_tokens<'t>(list: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = list.walk();
    let tokens: Vec<Node<'t>> = list
        .children(&mut cursor)
        .filter(|child| !child.is_extra() && !matches!(child.kind(), "(" | ")"))
        .collect();
    tokens
}

/// Peel pointer and reference declarators, returning the inner declarator and
/// the outermost indirection found on the way.
fn unwrap_indirection(mut node: Node) -> (Node, Option<Indirection>) {
    let mut indirection = None;
    loop {
        let inner = match node.kind() {
            "pointer_declarator" | "abstract_pointer_declarator" => {
                indirection.get_or_insert(Indirection::Pointer);
                node.child_by_field_name("declarator")
            }
            "reference_declarator" | "abstract_reference_declarator" => {
                indirection.get_or_insert(Indirection::Reference);
                significant_children(node).pop()
            }
            _ => None,
        };
        match inner {
            Some(inner) => node = inner,
            None => break,
        }
    }
    (node, indirection)
}

/// Walks a parsed header and reports declarations to a listener
pub struct HeaderWalker<'s> {
    source: &'s str,
}

impl<'s> HeaderWalker<'s> {
    pub fn new(source: &'s str) -> Self {
        Self { source }
    }

    /// Walk the whole tree. Stops at the first listener error.
    pub fn walk<L: HeaderListener>(&self, tree: &Tree, listener: &mut L) -> ModelResult<()> {
        self.visit(tree.root_node(), listener, false)
    }

    fn text(&self, node: Node) -> &'s str {
        let source: &'s str = self.source;
        source.get(node.byte_range()).unwrap_or("")
    }

    fn walk_items<L: HeaderListener>(
        &self,
        container: Node,
        listener: &mut L,
        in_class: bool,
    ) -> ModelResult<()> {
        for (_, child) in children_with_fields(container) {
            if !child.is_named() || child.is_extra() {
                continue;
            }
            self.visit(child, listener, in_class)?;
        }
        Ok(())
    }

    fn visit<L: HeaderListener>(
        &self,
        node: Node,
        listener: &mut L,
        in_class: bool,
    ) -> ModelResult<()> {
        match node.kind() {
            "translation_unit" | "declaration_list" => self.walk_items(node, listener, in_class),
            "namespace_definition" | "linkage_specification" => {
                match node.child_by_field_name("body") {
                    Some(body) => self.visit(body, listener, in_class),
                    None => Ok(()),
                }
            }
            "preproc_include" => listener.enter_preprocessor_include(&PreprocessorContext {
                span: span(node),
                position: position(node),
            }),
            "preproc_def" | "preproc_function_def" | "preproc_call" => {
                listener.enter_preprocessor_directive(&PreprocessorContext {
                    span: span(node),
                    position: position(node),
                })
            }
            "preproc_if" | "preproc_ifdef" | "preproc_elif" | "preproc_elifdef"
            | "preproc_else" => self.visit_conditional(node, listener, in_class),
            "class_specifier" => self.visit_class_specifier(node, listener, false),
            "struct_specifier" if node.child_by_field_name("body").is_none() => {
                self.visit_forward_declaration(node, listener)
            }
            "declaration" => match node.child_by_field_name("type") {
                // `class Foo { ... } instance;`
                Some(type_node) if type_node.kind() == "class_specifier" => {
                    self.visit_class_specifier(type_node, listener, false)
                }
                _ => Ok(()),
            },
            "access_specifier" if in_class => self.visit_access_specifier(node, listener),
            "field_declaration" if in_class => self.visit_field_declaration(node, listener),
            "function_definition" if in_class => match node.child_by_field_name("declarator") {
                Some(declarator) => self.visit_member_function(node, declarator, listener),
                None => Ok(()),
            },
            "friend_declaration" if in_class => {
                listener.exit_friend_declaration(&FragmentContext {
                    span: span(node),
                    position: position(node),
                })
            }
            "type_definition" => listener.exit_typedef(&FragmentContext {
                span: span(node),
                position: position(node),
            }),
            "alias_declaration" | "using_declaration" => {
                listener.exit_using_declaration(&FragmentContext {
                    span: span(node),
                    position: position(node),
                })
            }
            "template_declaration" => {
                trace!("skipping template declaration at {:?}", position(node));
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// `#if`/`#ifdef`/`#elif`/`#else` blocks: the header line and the closing
    /// `#endif` become directives, the contents are walked in place.
    fn visit_conditional<L: HeaderListener>(
        &self,
        node: Node,
        listener: &mut L,
        in_class: bool,
    ) -> ModelResult<()> {
        let header_end = node
            .child_by_field_name("condition")
            .or_else(|| node.child_by_field_name("name"))
            .or_else(|| node.child(0))
            .map(|header| header.end_byte())
            .unwrap_or_else(|| node.end_byte());
        listener.enter_preprocessor_directive(&PreprocessorContext {
            span: Span::new(node.start_byte(), header_end),
            position: position(node),
        })?;

        for (field, child) in children_with_fields(node) {
            if matches!(field, Some("condition") | Some("name")) {
                continue;
            }
            if child.kind() == "#endif" {
                listener.enter_preprocessor_directive(&PreprocessorContext {
                    span: span(child),
                    position: position(child),
                })?;
                continue;
            }
            if !child.is_named() || child.is_extra() {
                continue;
            }
            self.visit(child, listener, in_class)?;
        }
        Ok(())
    }

    /// A class definition. Inside another class any class key counts, and an
    /// anonymous type is reported under its class key.
    fn visit_class_specifier<L: HeaderListener>(
        &self,
        node: Node,
        listener: &mut L,
        nested: bool,
    ) -> ModelResult<()> {
        let Some(body) = node.child_by_field_name("body") else {
            return self.visit_forward_declaration(node, listener);
        };
        let name = match node.child_by_field_name("name").or_else(|| node.child(0)) {
            Some(name) if nested || name.is_named() => name,
            _ => {
                trace!("skipping anonymous class at {:?}", position(node));
                return Ok(());
            }
        };

        let base_class = children_with_fields(node)
            .into_iter()
            .find(|(_, child)| child.kind() == "base_class_clause")
            .and_then(|(_, clause)| {
                children_with_fields(clause)
                    .into_iter()
                    .map(|(_, child)| child)
                    .find(|child| CLASS_NAME_KINDS.contains(&child.kind()))
            })
            .map(span);

        let head = ClassHeadContext {
            name: span(name),
            base_class,
            position: position(node),
        };
        listener.enter_class_definition(&head)?;
        self.walk_items(body, listener, true)?;
        listener.exit_class_definition(&head)
    }

    /// `class Foo;` at namespace scope. The span runs through the semicolon.
    fn visit_forward_declaration<L: HeaderListener>(
        &self,
        node: Node,
        listener: &mut L,
    ) -> ModelResult<()> {
        let end = match node.next_sibling() {
            Some(next) if next.kind() == ";" => next.end_byte(),
            _ => node.end_byte(),
        };
        listener.exit_forward_declaration(&FragmentContext {
            span: Span::new(node.start_byte(), end),
            position: position(node),
        })
    }

    fn visit_access_specifier<L: HeaderListener>(
        &self,
        node: Node,
        listener: &mut L,
    ) -> ModelResult<()> {
        let keyword = self.text(node).trim_end_matches(':').trim();
        match keyword.parse::<AccessSpecifier>() {
            Ok(access) => listener.exit_access_specifier(&AccessSpecifierContext {
                access,
                position: position(node),
            }),
            Err(_) => {
                trace!("unrecognized access specifier {keyword:?}");
                Ok(())
            }
        }
    }

    fn visit_field_declaration<L: HeaderListener>(
        &self,
        node: Node,
        listener: &mut L,
    ) -> ModelResult<()> {
        let declarators: Vec<Node> = children_with_fields(node)
            .into_iter()
            .filter(|(field, _)| *field == Some("declarator"))
            .map(|(_, child)| child)
            .collect();

        if let Some(type_node) = node.child_by_field_name("type") {
            if CLASS_KEY_KINDS.contains(&type_node.kind()) {
                if type_node.child_by_field_name("body").is_some() {
                    return self.visit_class_specifier(type_node, listener, true);
                }
                if declarators.is_empty() {
                    // `class Foo;` inside the class body, semicolon included
                    return listener.exit_forward_declaration(&FragmentContext {
                        span: span(node),
                        position: position(node),
                    });
                }
            }
        }

        let Some(first) = declarators.first().copied() else {
            return Ok(());
        };
        let (inner, _) = unwrap_indirection(first);
        if inner.kind() == "function_declarator" {
            self.visit_member_function(node, first, listener)
        } else {
            self.visit_member_variables(node, listener)
        }
    }

    /// Span of the declaration specifiers that form a type: the `type` field
    /// plus any cv-qualifiers ahead of the first declarator.
    fn specifier_span(&self, node: Node, include_qualifiers: bool) -> Option<Span> {
        let type_node = node.child_by_field_name("type")?;
        let declarator_start = node
            .child_by_field_name("declarator")
            .map(|declarator| declarator.start_byte())
            .unwrap_or_else(|| node.end_byte());

        let mut result = span(type_node);
        if include_qualifiers {
            for (_, child) in children_with_fields(node) {
                if child.kind() == "type_qualifier" && child.start_byte() < declarator_start {
                    result.start = result.start.min(child.start_byte());
                    result.end = result.end.max(child.end_byte());
                }
            }
        }
        Some(result)
    }

    /// Extend a type span over the `*`/`&` tokens that sit between it and the
    /// inner declarator.
    fn through_indirection(&self, type_span: Span, inner_start: usize) -> Span {
        if inner_start <= type_span.end {
            return type_span;
        }
        let gap = self.source.get(type_span.end..inner_start).unwrap_or("");
        Span::new(type_span.start, type_span.end + gap.trim_end().len())
    }

    /// Span of the `*`/`&` tokens between a declarator's start and its name
    fn declarator_prefix(&self, declarator: Node, inner: Node) -> Option<Span> {
        let start = declarator.start_byte();
        let gap = self.source.get(start..inner.start_byte())?.trim_end();
        (!gap.is_empty()).then(|| Span::new(start, start + gap.len()))
    }

    fn unsupported_declarator<L: HeaderListener>(
        &self,
        declarator: Node,
        listener: &mut L,
    ) -> ModelResult<()> {
        trace!(
            "unsupported {} declarator at {:?}",
            declarator.kind(),
            position(declarator)
        );
        listener.exit_unsupported_declarator(&FragmentContext {
            span: span(declarator),
            position: position(declarator),
        })
    }

    fn has_child(&self, node: Node, kind: &str, text: &str) -> bool {
        children_with_fields(node)
            .into_iter()
            .any(|(_, child)| child.kind() == kind && self.text(child) == text)
    }

    fn report_indirect_type<L: HeaderListener>(
        &self,
        type_node: Option<Node>,
        indirection: Option<Indirection>,
        listener: &mut L,
    ) -> ModelResult<()> {
        let (Some(type_node), Some(indirection)) = (type_node, indirection) else {
            return Ok(());
        };
        if !FORWARD_DECLARABLE_KINDS.contains(&type_node.kind()) || self.text(type_node).contains('<')
        {
            return Ok(());
        }
        listener.exit_indirect_type(&IndirectTypeContext {
            type_name: span(type_node),
            indirection,
            position: position(type_node),
        })
    }

    fn visit_member_function<L: HeaderListener>(
        &self,
        node: Node,
        declarator: Node,
        listener: &mut L,
    ) -> ModelResult<()> {
        let Some(type_span) = self.specifier_span(node, true) else {
            trace!("skipping constructor/destructor at {:?}", position(node));
            return Ok(());
        };
        let (function, return_indirection) = unwrap_indirection(declarator);
        let Some(name) = function.child_by_field_name("declarator") else {
            return Ok(());
        };
        if !matches!(
            name.kind(),
            "field_identifier" | "identifier" | "operator_name" | "qualified_identifier"
        ) {
            // `void (*cb)(int);` and friends
            return self.unsupported_declarator(declarator, listener);
        }

        let parameter_list = function.child_by_field_name("parameters");
        let parameters = parameter_list.and_then(|list| {
            let tokens = parameter_tokens(list);
            match (tokens.first(), tokens.last()) {
                (Some(first), Some(last)) => Some(Span::covering(span(*first), span(*last))),
                _ => None,
            }
        });

        self.report_indirect_type(
            node.child_by_field_name("type"),
            return_indirection,
            listener,
        )?;
        if let Some(list) = parameter_list {
            for param in significant_children(list) {
                let Some(param_declarator) = param.child_by_field_name("declarator") else {
                    continue;
                };
                let (_, indirection) = unwrap_indirection(param_declarator);
                self.report_indirect_type(param.child_by_field_name("type"), indirection, listener)?;
            }
        }

        let context = MemberFunctionContext {
            return_type: self.through_indirection(type_span, function.start_byte()),
            name: span(name),
            parameters,
            is_const: self.has_child(function, "type_qualifier", "const"),
            is_static: self.has_child(node, "storage_class_specifier", "static"),
            has_override: self.has_child(function, "virtual_specifier", "override")
                || self.has_child(node, "virtual_specifier", "override"),
            position: position(node),
        };
        listener.exit_member_function(&context)
    }

    /// One event per declarator of a data member declaration
    fn visit_member_variables<L: HeaderListener>(
        &self,
        node: Node,
        listener: &mut L,
    ) -> ModelResult<()> {
        let Some(type_span) = self.specifier_span(node, false) else {
            return Ok(());
        };
        let type_node = node.child_by_field_name("type");
        let is_static = self.has_child(node, "storage_class_specifier", "static");
        let is_const = self.has_child(node, "type_qualifier", "const");

        // Pair each declarator with the initializer that follows it
        let mut declarators: Vec<(Node, Option<Span>)> = Vec::new();
        let mut pending_assign: Option<usize> = None;
        for (field, child) in children_with_fields(node) {
            match field {
                Some("declarator") => {
                    declarators.push((child, None));
                    pending_assign = None;
                }
                Some("default_value") => {
                    let start = pending_assign.take().unwrap_or_else(|| child.start_byte());
                    if let Some(last) = declarators.last_mut() {
                        last.1 = Some(Span::new(start, child.end_byte()));
                    }
                }
                _ if child.kind() == "=" => pending_assign = Some(child.start_byte()),
                _ => {}
            }
        }

        for (index, (declarator, default_value)) in declarators.into_iter().enumerate() {
            let (inner, indirection) = unwrap_indirection(declarator);
            if !matches!(inner.kind(), "field_identifier" | "array_declarator") {
                self.unsupported_declarator(declarator, listener)?;
                continue;
            }

            self.report_indirect_type(type_node, indirection, listener)?;

            // Only the first declarator's indirection is contiguous with the type
            let (type_name, declarator_prefix) = if index == 0 {
                (self.through_indirection(type_span, inner.start_byte()), None)
            } else {
                (type_span, self.declarator_prefix(declarator, inner))
            };
            listener.exit_member_variable(&MemberVariableContext {
                type_name,
                declarator_prefix,
                name: span(inner),
                default_value,
                is_static,
                is_const,
                position: position(declarator),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::HeaderParser;

    /// Records every event as a line of source text
    struct Recorder<'s> {
        source: &'s str,
        events: Vec<String>,
    }

    impl<'s> Recorder<'s> {
        fn text(&self, span: Span) -> &'s str {
            let source: &'s str = self.source;
            &source[span.as_range()]
        }

        fn record(&mut self, event: String) -> ModelResult<()> {
            self.events.push(event);
            Ok(())
        }
    }

    impl HeaderListener for Recorder<'_> {
        fn enter_preprocessor_directive(&mut self, ctx: &PreprocessorContext) -> ModelResult<()> {
            let text = self.text(ctx.span).trim();
            self.record(format!("directive {text}"))
        }

        fn enter_class_definition(&mut self, ctx: &ClassHeadContext) -> ModelResult<()> {
            let name = self.text(ctx.name);
            self.record(format!("class {name}"))
        }

        fn exit_class_definition(&mut self, ctx: &ClassHeadContext) -> ModelResult<()> {
            let name = self.text(ctx.name);
            self.record(format!("end {name}"))
        }

        fn exit_member_function(&mut self, ctx: &MemberFunctionContext) -> ModelResult<()> {
            let params = ctx.parameters.map(|span| self.text(span)).unwrap_or("");
            let line = format!(
                "method {}|{}|{params}",
                self.text(ctx.return_type),
                self.text(ctx.name)
            );
            self.record(line)
        }

        fn exit_member_variable(&mut self, ctx: &MemberVariableContext) -> ModelResult<()> {
            let prefix = ctx.declarator_prefix.map(|span| self.text(span)).unwrap_or("");
            let line = format!(
                "variable {}{prefix}|{}",
                self.text(ctx.type_name),
                self.text(ctx.name)
            );
            self.record(line)
        }

        fn exit_indirect_type(&mut self, ctx: &IndirectTypeContext) -> ModelResult<()> {
            let line = format!("indirect {} {:?}", self.text(ctx.type_name), ctx.indirection);
            self.record(line)
        }

        fn exit_unsupported_declarator(&mut self, ctx: &FragmentContext) -> ModelResult<()> {
            let text = self.text(ctx.span);
            self.record(format!("unsupported {text}"))
        }
    }

    fn events(source: &str) -> Vec<String> {
        let tree = HeaderParser::new()
            .unwrap()
            .parse_tree(source, "test.h")
            .unwrap();
        let mut recorder = Recorder {
            source,
            events: Vec::new(),
        };
        HeaderWalker::new(source).walk(&tree, &mut recorder).unwrap();
        recorder.events
    }

    #[test]
    fn test_conditional_directive_spans() {
        let source = "#ifndef A_H\n#define A_H\nclass A {};\n#endif\n";
        assert_eq!(
            events(source),
            [
                "directive #ifndef A_H",
                "directive #define A_H",
                "class A",
                "end A",
                "directive #endif",
            ]
        );
    }

    #[test]
    fn test_return_type_runs_through_indirection() {
        let source = "class A {\n    const Foo* get() const;\n    Bar &bar();\n};\n";
        assert_eq!(
            events(source),
            [
                "class A",
                "indirect Foo Pointer",
                "method const Foo*|get|",
                "indirect Bar Reference",
                "method Bar &|bar|",
                "end A",
            ]
        );
    }

    #[test]
    fn test_parameter_span_includes_variadic_token() {
        let source = "class A {\n    void log(const char* fmt, ...);\n    bool init(...);\n};\n";
        assert_eq!(
            events(source),
            [
                "class A",
                "method void|log|const char* fmt, ...",
                "method bool|init|...",
                "end A",
            ]
        );
    }

    #[test]
    fn test_later_declarators_carry_their_prefix() {
        let source = "class P {\n    Foo* a, *b;\n    Foo** pp;\n};\n";
        assert_eq!(
            events(source),
            [
                "class P",
                "indirect Foo Pointer",
                "variable Foo*|a",
                "indirect Foo Pointer",
                "variable Foo*|b",
                "indirect Foo Pointer",
                "variable Foo**|pp",
                "end P",
            ]
        );
    }

    #[test]
    fn test_nested_types_are_reported_as_classes() {
        let source = "class Outer {\n    struct Inner { int a; };\n    union { int i; };\n};\n";
        assert_eq!(
            events(source),
            [
                "class Outer",
                "class Inner",
                "variable int|a",
                "end Inner",
                "class union",
                "variable int|i",
                "end union",
                "end Outer",
            ]
        );
    }

    #[test]
    fn test_function_pointer_member_is_reported() {
        let source = "class P {\n    void (*cb)(int);\n    int count;\n};\n";
        assert_eq!(
            events(source),
            ["class P", "unsupported (*cb)(int)", "variable int|count", "end P"]
        );
    }

    #[test]
    fn test_unwrap_indirection_reports_outermost() {
        let source = "int *&r = p;";
        let tree = HeaderParser::new()
            .unwrap()
            .parse_tree(source, "test.h")
            .unwrap();
        let declaration = tree.root_node().named_child(0).unwrap();
        let init = declaration.child_by_field_name("declarator").unwrap();
        let declarator = init.child_by_field_name("declarator").unwrap();

        let (inner, indirection) = unwrap_indirection(declarator);
        assert_eq!(inner.kind(), "identifier");
        assert_eq!(indirection, Some(Indirection::Pointer));
    }
}
