//! Textual type substitution applied to rendered types and parameter lists.

/// Literal replacements, applied in order with no tokenization.
///
/// Entries must not overlap: `long` already matches inside `long long` and
/// inside identifiers such as `longitude`.
pub const TYPE_SUBSTITUTIONS: &[(&str, &str)] = &[("long", "long int")];

/// Apply every substitution to `text`
pub fn map_types(text: &str) -> String {
    TYPE_SUBSTITUTIONS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_long_expands() {
        assert_eq!(map_types("long"), "long int");
        assert_eq!(map_types("long hello, int x"), "long int hello, int x");
    }

    #[test]
    fn test_untouched_text() {
        assert_eq!(map_types("const Foo& f"), "const Foo& f");
        assert_eq!(map_types(""), "");
    }

    #[test]
    fn test_replacement_is_purely_literal() {
        assert_eq!(map_types("double longitude"), "double long intitude");
    }
}
