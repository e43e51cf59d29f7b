//! Render-ready fields derived from a finished [`HeaderModel`].

use super::includes::{
    STRING_INCLUDE, class_header_include, includes_for, is_project_include, is_system_include,
};
use super::types::map_types;
use crate::error::ModelResult;
use crate::model::{AccessSpecifier, ClassModel, HeaderModel, MethodEntry};
use serde::Serialize;
use std::fmt;

/// Every field a template needs to regenerate the header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderFields {
    pub name: String,
    pub class_declaration: String,
    pub system_includes: Vec<String>,
    pub project_includes: Vec<String>,
    pub forward_declarations: Vec<String>,
    pub typedefs: String,
    pub using_declarations: String,
    pub friend_declarations: String,
    pub class_name_accessor: String,
    pub methods: Vec<String>,
    pub public_member_variables: Vec<String>,
    pub protected_member_variables: Vec<String>,
    pub private_member_variables: Vec<String>,
    pub has_init_method: bool,
    /// Preprocessor lines, kept apart from the declarations
    pub preprocessor_statements: Vec<String>,
}

impl fmt::Display for HeaderFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.class_declaration)?;
        let lists = [
            ("system_includes", &self.system_includes),
            ("project_includes", &self.project_includes),
            ("forward_declarations", &self.forward_declarations),
            ("methods", &self.methods),
            ("public_member_variables", &self.public_member_variables),
            ("protected_member_variables", &self.protected_member_variables),
            ("private_member_variables", &self.private_member_variables),
            ("preprocessor_statements", &self.preprocessor_statements),
        ];
        for (label, lines) in lists {
            if lines.is_empty() {
                continue;
            }
            writeln!(f, "[{label}]")?;
            for line in lines {
                writeln!(f, "{line}")?;
            }
        }
        let blocks = [
            ("typedefs", &self.typedefs),
            ("using_declarations", &self.using_declarations),
            ("friend_declarations", &self.friend_declarations),
        ];
        for (label, block) in blocks {
            if !block.is_empty() {
                writeln!(f, "[{label}]\n{block}")?;
            }
        }
        writeln!(f, "[class_name_accessor]\n{}", self.class_name_accessor)?;
        write!(f, "[has_init_method] {}", self.has_init_method)
    }
}

/// Pure derivations over a model that defines exactly one class
#[derive(Debug, Clone, Copy)]
pub struct CodeSynthesizer<'m> {
    model: &'m HeaderModel,
    class: &'m ClassModel,
}

impl<'m> CodeSynthesizer<'m> {
    /// Fails with `ModelError::NoClass` if the header defines no class
    pub fn new(model: &'m HeaderModel) -> ModelResult<Self> {
        let class = model.require_class()?;
        Ok(Self { model, class })
    }

    pub fn name(&self) -> &'m str {
        self.class.name()
    }

    /// `class Foo` or `class Foo : public Bar`
    pub fn class_declaration(&self) -> String {
        if self.class.has_base_class() {
            format!("class {} : public {}", self.name(), self.class.base_class())
        } else {
            format!("class {}", self.name())
        }
    }

    /// Angle-bracket includes from the source, with `<string>` first
    pub fn system_includes(&self) -> Vec<String> {
        let mut includes: Vec<String> = self
            .model
            .includes()
            .iter()
            .filter(|include| is_system_include(include))
            .cloned()
            .collect();
        if !includes.iter().any(|include| include == STRING_INCLUDE) {
            includes.insert(0, STRING_INCLUDE.to_string());
        }
        includes
    }

    /// Quoted includes, then inferred ones, then the base class header.
    ///
    /// Not deduplicated: the same include may come from several sources.
    pub fn project_includes(&self) -> Vec<String> {
        let methods = self.class.methods();

        let mut includes: Vec<String> = self
            .model
            .includes()
            .iter()
            .filter(|include| is_project_include(include))
            .cloned()
            .collect();
        includes.extend(includes_for(
            self.class.forward_declarations().iter().map(String::as_str),
        ));
        includes.extend(includes_for(
            methods.iter().map(|method| method.return_type.as_str()),
        ));
        includes.extend(includes_for(
            methods
                .iter()
                .flat_map(|method| method.parameters.split_whitespace()),
        ));
        if self.class.has_base_class() {
            includes.push(class_header_include(self.class.base_class()));
        }
        includes
    }

    /// `class T;` for each pointer/reference type, then the forward
    /// declarations written in the source, first occurrence wins.
    pub fn forward_declarations(&self) -> Vec<String> {
        let mut declarations: Vec<String> = Vec::new();
        let candidates = self
            .class
            .forward_declarations()
            .iter()
            .map(|type_name| format!("class {type_name};"))
            .chain(self.model.forward_declarations().iter().cloned());
        for declaration in candidates {
            if !declarations.contains(&declaration) {
                declarations.push(declaration);
            }
        }
        declarations
    }

    pub fn typedefs(&self) -> String {
        self.model.typedefs().join("\n")
    }

    pub fn friend_declarations(&self) -> String {
        self.class.friend_declarations().join("\n")
    }

    pub fn using_declarations(&self) -> String {
        self.model.using_declarations().join("\n")
    }

    /// Accessor returning the class name as a string literal
    pub fn class_name_accessor(&self) -> String {
        let override_text = if self.class.has_base_class() {
            " override"
        } else {
            ""
        };
        format!(
            "virtual std::string className() const{override_text} {{return \"{}\";}}",
            self.name()
        )
    }

    /// Whether the regenerated declaration of `method` carries `override`.
    ///
    /// `init` is the base-class hook only in its zero-argument form: with
    /// parameters it never overrides, without them it overrides exactly when
    /// the class has a base. Any other method keeps its source marking.
    pub fn emits_override(&self, method: &MethodEntry) -> bool {
        if method.name == "init" {
            !method.has_parameters() && self.class.has_base_class()
        } else {
            method.has_override
        }
    }

    /// One declaration per method, in source order. A method whose access
    /// differs from the previous label is prefixed with a `public:` /
    /// `protected:` / `private:` line; the initial label is public.
    pub fn method_declarations(&self) -> Vec<String> {
        let mut visibility = AccessSpecifier::Public;
        self.class
            .methods()
            .iter()
            .map(|method| {
                let label = if method.access != visibility {
                    visibility = method.access;
                    format!("{}:\n", method.access.keyword())
                } else {
                    String::new()
                };
                format!("{label}\t{}", self.method_declaration(method))
            })
            .collect()
    }

    fn method_declaration(&self, method: &MethodEntry) -> String {
        let storage = if method.is_static { "static" } else { "virtual" };
        let const_text = if method.is_const { " const" } else { "" };
        let override_text = if self.emits_override(method) {
            " override"
        } else {
            ""
        };
        format!(
            "{storage} {} {}({}){const_text}{override_text};",
            map_types(&method.return_type),
            method.name,
            map_types(&method.parameters)
        )
    }

    /// Declarations of the data members under one access section
    pub fn member_variables(&self, access: AccessSpecifier) -> Vec<String> {
        self.class
            .member_variables()
            .iter()
            .filter(|variable| variable.access == access)
            .map(|variable| {
                let type_name = map_types(&variable.type_name);
                let parts = [
                    if variable.is_static { "static" } else { "" },
                    if variable.is_const { "const" } else { "" },
                    type_name.as_str(),
                    variable.name.as_str(),
                    variable.default_value.as_str(),
                ];
                let declaration: Vec<&str> =
                    parts.into_iter().filter(|part| !part.is_empty()).collect();
                format!("{};", declaration.join(" "))
            })
            .collect()
    }

    pub fn public_member_variables(&self) -> Vec<String> {
        self.member_variables(AccessSpecifier::Public)
    }

    pub fn protected_member_variables(&self) -> Vec<String> {
        self.member_variables(AccessSpecifier::Protected)
    }

    pub fn private_member_variables(&self) -> Vec<String> {
        self.member_variables(AccessSpecifier::Private)
    }

    pub fn has_init_method(&self) -> bool {
        self.class.has_init_method()
    }

    /// Gather every derived field
    pub fn fields(&self) -> HeaderFields {
        HeaderFields {
            name: self.name().to_string(),
            class_declaration: self.class_declaration(),
            system_includes: self.system_includes(),
            project_includes: self.project_includes(),
            forward_declarations: self.forward_declarations(),
            typedefs: self.typedefs(),
            using_declarations: self.using_declarations(),
            friend_declarations: self.friend_declarations(),
            class_name_accessor: self.class_name_accessor(),
            methods: self.method_declarations(),
            public_member_variables: self.public_member_variables(),
            protected_member_variables: self.protected_member_variables(),
            private_member_variables: self.private_member_variables(),
            has_init_method: self.has_init_method(),
            preprocessor_statements: self.model.statements().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::model::VariableEntry;
    use crate::types::{Position, SourceLocation};

    fn method(name: &str, parameters: &str, has_override: bool) -> MethodEntry {
        MethodEntry {
            return_type: "bool".to_string(),
            name: name.to_string(),
            access: AccessSpecifier::Public,
            is_const: false,
            is_static: false,
            has_override,
            parameters: parameters.to_string(),
        }
    }

    fn model_with(class: ClassModel, includes: &[&str]) -> HeaderModel {
        let mut model = HeaderModel::new();
        for include in includes {
            model.add_include(*include);
        }
        model
            .add_class(class, SourceLocation::new("test.h", Position::new(1, 0)))
            .unwrap();
        model
    }

    fn override_for(base: &str, entry: MethodEntry) -> bool {
        let model = model_with(ClassModel::new("Widget", base), &[]);
        CodeSynthesizer::new(&model).unwrap().emits_override(&entry)
    }

    #[test]
    fn test_requires_a_class() {
        let model = HeaderModel::new();
        assert!(matches!(
            CodeSynthesizer::new(&model),
            Err(ModelError::NoClass)
        ));
    }

    #[test]
    fn test_init_without_parameters_follows_base_class() {
        assert!(override_for("Base", method("init", "", false)));
        assert!(!override_for("", method("init", "", false)));
        // the source marking is ignored in this branch
        assert!(!override_for("", method("init", "", true)));
    }

    #[test]
    fn test_init_with_parameters_never_overrides() {
        assert!(!override_for("Base", method("init", "int x", false)));
        assert!(!override_for("", method("init", "int x", false)));
        assert!(!override_for("Base", method("init", "int x", true)));
    }

    #[test]
    fn test_other_methods_keep_source_override() {
        assert!(override_for("", method("update", "", true)));
        assert!(override_for("Base", method("update", "double dt", true)));
        assert!(!override_for("Base", method("update", "", false)));
    }

    #[test]
    fn test_string_include_inserted_first() {
        let model = model_with(ClassModel::new("Widget", ""), &["#include <vector>"]);
        let synth = CodeSynthesizer::new(&model).unwrap();
        assert_eq!(
            synth.system_includes(),
            ["#include <string>", "#include <vector>"]
        );
    }

    #[test]
    fn test_string_include_not_duplicated() {
        let model = model_with(
            ClassModel::new("Widget", ""),
            &["#include <vector>", "#include <string>"],
        );
        let synth = CodeSynthesizer::new(&model).unwrap();
        assert_eq!(
            synth.system_includes(),
            ["#include <vector>", "#include <string>"]
        );
    }

    #[test]
    fn test_project_includes_order_and_duplicates() {
        let mut class = ClassModel::new("Widget", "Base");
        class.add_forward_declaration("flags");
        let mut entry = method("getFlags", "", false);
        entry.return_type = "flags".to_string();
        class.add_method(entry);
        class.add_method(method("setFlags", "const flags & f", false));

        let model = model_with(class, &["#include \"Other.h\"", "#include <map>"]);
        let synth = CodeSynthesizer::new(&model).unwrap();
        assert_eq!(
            synth.project_includes(),
            [
                "#include \"Other.h\"",
                "#include \"flags/flags.h\"",
                "#include \"flags/flags.h\"",
                "#include \"flags/flags.h\"",
                "#include \"Base.h\"",
            ]
        );
    }

    #[test]
    fn test_forward_declarations_merged_and_deduplicated() {
        let mut class = ClassModel::new("Widget", "");
        class.add_forward_declaration("Foo");
        class.add_forward_declaration("ns::Bar");

        let mut model = HeaderModel::new();
        model.add_forward_declaration("class Foo;");
        model.add_forward_declaration("class Baz;");
        model
            .add_class(class, SourceLocation::new("test.h", Position::new(1, 0)))
            .unwrap();

        let synth = CodeSynthesizer::new(&model).unwrap();
        assert_eq!(
            synth.forward_declarations(),
            ["class Foo;", "class ns::Bar;", "class Baz;"]
        );
    }

    #[test]
    fn test_visibility_labels_emitted_on_change() {
        let mut class = ClassModel::new("Widget", "");
        class.add_method(method("a", "", false));
        let mut protected = method("b", "", false);
        protected.access = AccessSpecifier::Protected;
        class.add_method(protected.clone());
        protected.name = "c".to_string();
        class.add_method(protected);
        let mut public = method("d", "long n", false);
        public.is_static = true;
        public.is_const = true;
        class.add_method(public);

        let model = model_with(class, &[]);
        let lines = CodeSynthesizer::new(&model).unwrap().method_declarations();
        assert_eq!(
            lines,
            [
                "\tvirtual bool a();",
                "protected:\n\tvirtual bool b();",
                "\tvirtual bool c();",
                "public:\n\tstatic bool d(long int n) const;",
            ]
        );
    }

    #[test]
    fn test_member_variables_grouped_by_access() {
        let mut class = ClassModel::new("Widget", "");
        class.add_member_variable(VariableEntry {
            access: AccessSpecifier::Private,
            is_static: true,
            is_const: true,
            type_name: "long".to_string(),
            name: "LIMIT".to_string(),
            default_value: "= 4".to_string(),
        });
        class.add_member_variable(VariableEntry {
            access: AccessSpecifier::Public,
            is_static: false,
            is_const: false,
            type_name: "Hello*".to_string(),
            name: "hello".to_string(),
            default_value: String::new(),
        });

        let model = model_with(class, &[]);
        let synth = CodeSynthesizer::new(&model).unwrap();
        assert_eq!(synth.public_member_variables(), ["Hello* hello;"]);
        assert!(synth.protected_member_variables().is_empty());
        assert_eq!(
            synth.private_member_variables(),
            ["static const long int LIMIT = 4;"]
        );
    }

    #[test]
    fn test_class_name_accessor() {
        let model = model_with(ClassModel::new("Widget", ""), &[]);
        assert_eq!(
            CodeSynthesizer::new(&model).unwrap().class_name_accessor(),
            "virtual std::string className() const {return \"Widget\";}"
        );

        let model = model_with(ClassModel::new("Widget", "Base"), &[]);
        assert_eq!(
            CodeSynthesizer::new(&model).unwrap().class_name_accessor(),
            "virtual std::string className() const override {return \"Widget\";}"
        );
    }
}
