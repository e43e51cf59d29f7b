//! Header, class, method and variable models.
//!
//! All text fields that come from source are verbatim slices of the original
//! buffer. Mutators are crate-private: a model is filled once by
//! [`ModelBuilder`](crate::parsing::ModelBuilder) and only read afterwards.

use super::AccessSpecifier;
use crate::error::{ModelError, ModelResult};
use crate::types::SourceLocation;
use serde::Serialize;

/// A member function declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodEntry {
    /// Verbatim return type, including cv-qualifiers and `*`/`&`
    pub return_type: String,
    pub name: String,
    pub access: AccessSpecifier,
    /// Trailing `const` after the parameter list
    pub is_const: bool,
    pub is_static: bool,
    /// The declaration carried an explicit `override`
    pub has_override: bool,
    /// Verbatim text between the parentheses, empty if there are no parameters
    pub parameters: String,
}

impl MethodEntry {
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }
}

/// A data member declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableEntry {
    pub access: AccessSpecifier,
    pub is_static: bool,
    pub is_const: bool,
    /// Verbatim type text
    pub type_name: String,
    pub name: String,
    /// Verbatim initializer, including the leading `=` when present
    pub default_value: String,
}

/// The single class a header defines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassModel {
    name: String,
    /// Empty when the class has no base
    base_class: String,
    methods: Vec<MethodEntry>,
    member_variables: Vec<VariableEntry>,
    /// Insertion-ordered, no duplicates
    forward_declarations: Vec<String>,
    friend_declarations: Vec<String>,
}

impl ClassModel {
    pub fn new(name: impl Into<String>, base_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_class: base_class.into(),
            methods: Vec::new(),
            member_variables: Vec::new(),
            forward_declarations: Vec::new(),
            friend_declarations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_class(&self) -> &str {
        &self.base_class
    }

    pub fn has_base_class(&self) -> bool {
        !self.base_class.is_empty()
    }

    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }

    pub fn member_variables(&self) -> &[VariableEntry] {
        &self.member_variables
    }

    pub fn forward_declarations(&self) -> &[String] {
        &self.forward_declarations
    }

    pub fn friend_declarations(&self) -> &[String] {
        &self.friend_declarations
    }

    /// Whether any method is literally named `init`
    pub fn has_init_method(&self) -> bool {
        self.methods.iter().any(|method| method.name == "init")
    }

    pub(crate) fn add_method(&mut self, method: MethodEntry) {
        self.methods.push(method);
    }

    pub(crate) fn add_member_variable(&mut self, variable: VariableEntry) {
        self.member_variables.push(variable);
    }

    /// Register a type for forward declaration. Returns false if already known.
    pub(crate) fn add_forward_declaration(&mut self, type_name: impl Into<String>) -> bool {
        let type_name = type_name.into();
        if self.forward_declarations.contains(&type_name) {
            return false;
        }
        self.forward_declarations.push(type_name);
        true
    }

    pub(crate) fn add_friend_declaration(&mut self, declaration: impl Into<String>) {
        self.friend_declarations.push(declaration.into());
    }
}

/// Everything captured from one header file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderModel {
    #[serde(rename = "class")]
    class: Option<ClassModel>,
    /// Preprocessor lines other than includes, in source order
    statements: Vec<String>,
    includes: Vec<String>,
    typedefs: Vec<String>,
    using_declarations: Vec<String>,
    forward_declarations: Vec<String>,
}

impl HeaderModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(&self) -> Option<&ClassModel> {
        self.class.as_ref()
    }

    /// The class, or `ModelError::NoClass` when the header defines none
    pub fn require_class(&self) -> ModelResult<&ClassModel> {
        self.class.as_ref().ok_or(ModelError::NoClass)
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn typedefs(&self) -> &[String] {
        &self.typedefs
    }

    pub fn using_declarations(&self) -> &[String] {
        &self.using_declarations
    }

    pub fn forward_declarations(&self) -> &[String] {
        &self.forward_declarations
    }

    pub(crate) fn add_class(
        &mut self,
        class: ClassModel,
        location: SourceLocation,
    ) -> ModelResult<()> {
        if self.class.is_some() {
            return Err(ModelError::DuplicateClass { location });
        }
        self.class = Some(class);
        Ok(())
    }

    pub(crate) fn add_statement(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    pub(crate) fn add_include(&mut self, include: impl Into<String>) {
        self.includes.push(include.into());
    }

    pub(crate) fn add_typedef(&mut self, typedef: impl Into<String>) {
        self.typedefs.push(typedef.into());
    }

    pub(crate) fn add_using_declaration(&mut self, using: impl Into<String>) {
        self.using_declarations.push(using.into());
    }

    pub(crate) fn add_forward_declaration(&mut self, declaration: impl Into<String>) {
        self.forward_declarations.push(declaration.into());
    }
}

impl std::fmt::Display for HeaderModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sections = [
            ("include", &self.includes),
            ("directive", &self.statements),
            ("typedef", &self.typedefs),
            ("using", &self.using_declarations),
            ("forward", &self.forward_declarations),
        ];
        for (label, lines) in sections {
            for line in lines {
                writeln!(f, "{label:<9} {line}")?;
            }
        }

        let Some(class) = &self.class else {
            return write!(f, "(no class)");
        };
        if class.has_base_class() {
            writeln!(f, "class {} : {}", class.name, class.base_class)?;
        } else {
            writeln!(f, "class {}", class.name)?;
        }
        for method in &class.methods {
            let mut flags = String::new();
            if method.is_static {
                flags.push_str(" static");
            }
            if method.is_const {
                flags.push_str(" const");
            }
            if method.has_override {
                flags.push_str(" override");
            }
            writeln!(
                f,
                "  {:<9} {} {}({}){flags}",
                method.access, method.return_type, method.name, method.parameters
            )?;
        }
        for variable in &class.member_variables {
            write!(f, "  {:<9} {} {}", variable.access, variable.type_name, variable.name)?;
            if !variable.default_value.is_empty() {
                write!(f, " {}", variable.default_value)?;
            }
            writeln!(f)?;
        }
        for type_name in &class.forward_declarations {
            writeln!(f, "  uses      {type_name}")?;
        }
        for friend in &class.friend_declarations {
            writeln!(f, "  friend    {friend}")?;
        }
        Ok(())
    }
}
