//! Include classification and type-name based include inference.

/// Include always present in the system include list
pub const STRING_INCLUDE: &str = "#include <string>";

/// Type names that pull in a project header when they appear in a signature
pub const TYPE_INCLUDES: &[(&str, &str)] = &[("flags", "#include \"flags/flags.h\"")];

/// Include line for a type name, on an exact match
pub fn include_for(type_name: &str) -> Option<&'static str> {
    TYPE_INCLUDES
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|(_, include)| *include)
}

/// Include lines for every token that names a known type, in token order.
/// Repeated tokens yield repeated includes.
pub fn includes_for<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    tokens
        .into_iter()
        .filter_map(include_for)
        .map(str::to_string)
        .collect()
}

/// `#include <...>`
pub fn is_system_include(include: &str) -> bool {
    include.contains('<')
}

/// `#include "..."`
pub fn is_project_include(include: &str) -> bool {
    include.contains('"')
}

/// Quoted include of a class's own header
pub fn class_header_include(class_name: &str) -> String {
    format!("#include \"{class_name}.h\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_lookup_is_exact() {
        assert_eq!(include_for("flags"), Some("#include \"flags/flags.h\""));
        assert_eq!(include_for("flags&"), None);
        assert_eq!(include_for("Flags"), None);
    }

    #[test]
    fn test_includes_for_keeps_duplicates() {
        let includes = includes_for("const flags& a, flags b".split_whitespace());
        assert_eq!(includes, ["#include \"flags/flags.h\""]);

        let includes = includes_for(["flags", "int", "flags"]);
        assert_eq!(includes.len(), 2);
    }

    #[test]
    fn test_classification() {
        assert!(is_system_include("#include <vector>"));
        assert!(!is_project_include("#include <vector>"));
        assert!(is_project_include("#include \"Bar.h\""));
        assert_eq!(class_header_include("Bar"), "#include \"Bar.h\"");
    }
}
