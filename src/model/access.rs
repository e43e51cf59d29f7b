use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access section a member was declared under.
///
/// The default is `Public`: members that precede any access section are
/// treated as public regardless of the class-key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessSpecifier {
    #[default]
    Public,
    Protected,
    Private,
}

impl AccessSpecifier {
    /// Upper-case tag, as stored in the model
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Protected => "PROTECTED",
            Self::Private => "PRIVATE",
        }
    }

    /// Keyword used for the label line, e.g. `protected`
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for AccessSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AccessSpecifier {
    type Err = &'static str;

    /// Accepts either the C++ keyword or the upper-case tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" | "PUBLIC" => Ok(Self::Public),
            "protected" | "PROTECTED" => Ok(Self::Protected),
            "private" | "PRIVATE" => Ok(Self::Private),
            _ => Err("Unknown access specifier"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_public() {
        assert_eq!(AccessSpecifier::default(), AccessSpecifier::Public);
    }

    #[test]
    fn test_parse_keyword_and_tag() {
        assert_eq!(
            "protected".parse::<AccessSpecifier>(),
            Ok(AccessSpecifier::Protected)
        );
        assert_eq!(
            "PRIVATE".parse::<AccessSpecifier>(),
            Ok(AccessSpecifier::Private)
        );
        assert!("friend".parse::<AccessSpecifier>().is_err());
    }

    #[test]
    fn test_serializes_as_tag() {
        let json = serde_json::to_string(&AccessSpecifier::Protected).unwrap();
        assert_eq!(json, "\"PROTECTED\"");
    }
}
