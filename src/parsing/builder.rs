//! Listener that turns traversal events into a [`HeaderModel`].

use super::listener::{
    AccessSpecifierContext, ClassHeadContext, FragmentContext, HeaderListener,
    IndirectTypeContext, MemberFunctionContext, MemberVariableContext, PreprocessorContext,
};
use crate::error::{ModelError, ModelResult};
use crate::model::{AccessSpecifier, ClassModel, HeaderModel, MethodEntry, VariableEntry};
use crate::types::{Position, SourceLocation, Span};
use tracing::{debug, trace};

/// Builds the model for one header file.
///
/// Holds the original source buffer so every opaque fragment is sliced from
/// it verbatim. The access cursor lives here and starts out public for each
/// new builder; one builder serves exactly one traversal.
pub struct ModelBuilder<'a> {
    source: &'a str,
    file_name: String,
    model: HeaderModel,
    current_class: Option<ClassModel>,
    current_access: AccessSpecifier,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(source: &'a str, file_name: impl Into<String>) -> Self {
        Self {
            source,
            file_name: file_name.into(),
            model: HeaderModel::new(),
            current_class: None,
            current_access: AccessSpecifier::default(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn current_access(&self) -> AccessSpecifier {
        self.current_access
    }

    /// Hand over the finished model. Fails if a class was left open.
    pub fn finish(self) -> ModelResult<HeaderModel> {
        if let Some(class) = self.current_class {
            return Err(ModelError::UnclosedClass {
                name: class.name().to_string(),
            });
        }
        Ok(self.model)
    }

    /// Exact source text covered by `span`
    fn text(&self, span: Span) -> ModelResult<&'a str> {
        let source: &'a str = self.source;
        source.get(span.as_range()).ok_or(ModelError::InvalidSpan {
            start: span.start,
            end: span.end,
            len: source.len(),
        })
    }

    fn location(&self, position: Position) -> SourceLocation {
        SourceLocation::new(self.file_name.as_str(), position)
    }

    fn open_class(&mut self, position: Position) -> ModelResult<&mut ClassModel> {
        let file_name = &self.file_name;
        self.current_class
            .as_mut()
            .ok_or_else(|| ModelError::NoOpenClass {
                location: SourceLocation::new(file_name.as_str(), position),
            })
    }
}

impl HeaderListener for ModelBuilder<'_> {
    fn enter_preprocessor_directive(&mut self, ctx: &PreprocessorContext) -> ModelResult<()> {
        let text = self.text(ctx.span)?.trim();
        trace!("directive: {text}");
        self.model.add_statement(text);
        Ok(())
    }

    fn enter_preprocessor_include(&mut self, ctx: &PreprocessorContext) -> ModelResult<()> {
        let text = self.text(ctx.span)?.trim();
        trace!("include: {text}");
        self.model.add_include(text);
        Ok(())
    }

    fn enter_class_definition(&mut self, ctx: &ClassHeadContext) -> ModelResult<()> {
        if self.current_class.is_some() {
            return Err(ModelError::NestedClass {
                location: self.location(ctx.position),
            });
        }

        let name = self.text(ctx.name)?;
        let base_class = match ctx.base_class {
            Some(span) => self.text(span)?,
            None => "",
        };
        debug!("class {name} (base: {base_class:?}) in {}", self.file_name);
        self.current_class = Some(ClassModel::new(name, base_class));
        Ok(())
    }

    fn exit_class_definition(&mut self, ctx: &ClassHeadContext) -> ModelResult<()> {
        let location = self.location(ctx.position);
        let class = self
            .current_class
            .take()
            .ok_or_else(|| ModelError::NoOpenClass {
                location: location.clone(),
            })?;
        self.model.add_class(class, location)
    }

    fn exit_access_specifier(&mut self, ctx: &AccessSpecifierContext) -> ModelResult<()> {
        trace!("access section: {}", ctx.access);
        self.current_access = ctx.access;
        Ok(())
    }

    fn exit_member_function(&mut self, ctx: &MemberFunctionContext) -> ModelResult<()> {
        let return_type = self.text(ctx.return_type)?;
        let name = self.text(ctx.name)?;
        let parameters = match ctx.parameters {
            Some(span) => self.text(span)?,
            None => "",
        };
        let access = self.current_access;

        let method = MethodEntry {
            return_type: return_type.to_string(),
            name: name.to_string(),
            access,
            is_const: ctx.is_const,
            is_static: ctx.is_static,
            has_override: ctx.has_override,
            parameters: parameters.to_string(),
        };
        debug!("method {name} [{access}]");
        self.open_class(ctx.position)?.add_method(method);
        Ok(())
    }

    fn exit_member_variable(&mut self, ctx: &MemberVariableContext) -> ModelResult<()> {
        let mut type_name = self.text(ctx.type_name)?.to_string();
        if let Some(prefix) = ctx.declarator_prefix {
            type_name.push_str(self.text(prefix)?);
        }
        let name = self.text(ctx.name)?;
        let default_value = match ctx.default_value {
            Some(span) => self.text(span)?,
            None => "",
        };
        let access = self.current_access;

        let variable = VariableEntry {
            access,
            is_static: ctx.is_static,
            is_const: ctx.is_const,
            type_name,
            name: name.to_string(),
            default_value: default_value.to_string(),
        };
        debug!("member variable {name} [{access}]");
        self.open_class(ctx.position)?.add_member_variable(variable);
        Ok(())
    }

    fn exit_typedef(&mut self, ctx: &FragmentContext) -> ModelResult<()> {
        let text = self.text(ctx.span)?;
        self.model.add_typedef(text);
        Ok(())
    }

    fn exit_using_declaration(&mut self, ctx: &FragmentContext) -> ModelResult<()> {
        let text = self.text(ctx.span)?;
        self.model.add_using_declaration(text);
        Ok(())
    }

    fn exit_forward_declaration(&mut self, ctx: &FragmentContext) -> ModelResult<()> {
        let text = self.text(ctx.span)?;
        self.model.add_forward_declaration(text);
        Ok(())
    }

    fn exit_friend_declaration(&mut self, ctx: &FragmentContext) -> ModelResult<()> {
        let text = self.text(ctx.span)?;
        self.open_class(ctx.position)?.add_friend_declaration(text);
        Ok(())
    }

    fn exit_indirect_type(&mut self, ctx: &IndirectTypeContext) -> ModelResult<()> {
        let type_name = self.text(ctx.type_name)?;
        match self.current_class.as_mut() {
            Some(class) => {
                if class.add_forward_declaration(type_name) {
                    trace!("forward declaration candidate: {type_name}");
                }
            }
            None => trace!("ignoring {type_name} outside of a class"),
        }
        Ok(())
    }

    fn exit_unsupported_declarator(&mut self, ctx: &FragmentContext) -> ModelResult<()> {
        let declarator = self.text(ctx.span)?;
        Err(ModelError::UnsupportedDeclarator {
            declarator: declarator.to_string(),
            location: self.location(ctx.position),
        })
    }
}
