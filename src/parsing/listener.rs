//! Traversal events consumed by the model builder
//!
//! A syntax-tree walker reports what it sees through [`HeaderListener`]
//! callbacks. Contexts carry byte spans into the original buffer rather than
//! text, so the listener decides what to slice and the walker never
//! re-serializes nodes.

use crate::error::ModelResult;
use crate::model::AccessSpecifier;
use crate::types::{Position, Span};

/// Head of a class definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassHeadContext {
    /// Class name, or the class key of an anonymous nested type
    pub name: Span,
    /// First base class named in the base clause
    pub base_class: Option<Span>,
    pub position: Position,
}

/// `public:` / `protected:` / `private:` section start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessSpecifierContext {
    pub access: AccessSpecifier,
    pub position: Position,
}

/// A member function declaration or inline definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberFunctionContext {
    /// From the first type token through any `*`/`&` before the name
    pub return_type: Span,
    pub name: Span,
    /// First to last parameter token, excluding the parentheses
    pub parameters: Option<Span>,
    pub is_const: bool,
    pub is_static: bool,
    pub has_override: bool,
    pub position: Position,
}

/// One declarator of a data member declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberVariableContext {
    pub type_name: Span,
    /// `*`/`&` tokens of a later declarator in `Foo* a, *b;`, which belong
    /// to the type but are not contiguous with it
    pub declarator_prefix: Option<Span>,
    pub name: Span,
    /// `= value` or a braced initializer
    pub default_value: Option<Span>,
    pub is_static: bool,
    pub is_const: bool,
    pub position: Position,
}

/// A declaration kept verbatim (typedef, using, friend, forward declaration)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentContext {
    pub span: Span,
    pub position: Position,
}

/// A preprocessor line; its text is trimmed before storing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessorContext {
    pub span: Span,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indirection {
    Pointer,
    Reference,
}

/// A pointer or reference to a named class type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndirectTypeContext {
    /// The (possibly qualified) pointee type name
    pub type_name: Span,
    pub indirection: Indirection,
    pub position: Position,
}

/// Callbacks for one depth-first traversal of a header's syntax tree.
///
/// Every callback defaults to a no-op. Returning an error stops the walk;
/// nothing after the failing event is reported.
pub trait HeaderListener {
    fn enter_preprocessor_directive(&mut self, _ctx: &PreprocessorContext) -> ModelResult<()> {
        Ok(())
    }

    fn enter_preprocessor_include(&mut self, _ctx: &PreprocessorContext) -> ModelResult<()> {
        Ok(())
    }

    fn enter_class_definition(&mut self, _ctx: &ClassHeadContext) -> ModelResult<()> {
        Ok(())
    }

    fn exit_class_definition(&mut self, _ctx: &ClassHeadContext) -> ModelResult<()> {
        Ok(())
    }

    fn exit_access_specifier(&mut self, _ctx: &AccessSpecifierContext) -> ModelResult<()> {
        Ok(())
    }

    fn exit_member_function(&mut self, _ctx: &MemberFunctionContext) -> ModelResult<()> {
        Ok(())
    }

    fn exit_member_variable(&mut self, _ctx: &MemberVariableContext) -> ModelResult<()> {
        Ok(())
    }

    fn exit_typedef(&mut self, _ctx: &FragmentContext) -> ModelResult<()> {
        Ok(())
    }

    fn exit_using_declaration(&mut self, _ctx: &FragmentContext) -> ModelResult<()> {
        Ok(())
    }

    fn exit_forward_declaration(&mut self, _ctx: &FragmentContext) -> ModelResult<()> {
        Ok(())
    }

    fn exit_friend_declaration(&mut self, _ctx: &FragmentContext) -> ModelResult<()> {
        Ok(())
    }

    fn exit_indirect_type(&mut self, _ctx: &IndirectTypeContext) -> ModelResult<()> {
        Ok(())
    }

    /// A member whose declarator has no name/type split, such as a function
    /// pointer. The span covers the declarator.
    fn exit_unsupported_declarator(&mut self, _ctx: &FragmentContext) -> ModelResult<()> {
        Ok(())
    }
}
