//! Routing document schema and parsing.
//!
//! The document is TOML:
//!
//! ```toml
//! default_redirect = "https://example.com"
//!
//! [[packages]]
//! prefix = "go.example.com/foo"
//! import = "git https://github.com/x/foo"
//! redirect = "https://github.com/x/foo"
//! ```
//!
//! `[[packages]]` order is preserved; it decides which rule wins when prefixes
//! overlap.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::matcher;

/// One configured package mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoutingRule {
    /// Host + path prefix this rule answers for.
    pub prefix: String,

    /// Value advertised in the `go-import` meta tag (VCS keyword + repo URL).
    pub import: String,

    /// Where browsers are sent.
    pub redirect: String,
}

/// Parsed routing document. Built fresh for every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigDocument {
    /// Fallback redirect for unmatched, non-tool requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_redirect: Option<String>,

    /// Rules in declaration order.
    pub packages: Vec<RoutingRule>,
}

/// Error type for document parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("package #{index} has an empty prefix")]
    EmptyPrefix { index: usize },
}

impl ConfigDocument {
    /// Parse a document from raw bytes.
    ///
    /// Parsing is all-or-nothing: a single bad rule rejects the whole document.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(bytes)?;
        Self::from_toml_str(text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ParseError> {
        let mut document: ConfigDocument = toml::from_str(text)?;

        if document.default_redirect.as_deref() == Some("") {
            document.default_redirect = None;
        }

        for (index, rule) in document.packages.iter().enumerate() {
            if matcher::normalize_prefix(&rule.prefix).is_empty() {
                return Err(ParseError::EmptyPrefix { index });
            }
        }

        Ok(document)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// First rule whose prefix covers `path`, in declaration order.
    pub fn find_rule(&self, path: &str) -> Option<&RoutingRule> {
        self.packages
            .iter()
            .find(|rule| matcher::prefix_matches(&rule.prefix, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
default_redirect = "https://example.com"

[[packages]]
prefix = "go.example.com/foo/"
import = "git https://github.com/x/foo"
redirect = "https://github.com/x/foo"

[[packages]]
prefix = "go.example.com/bar"
import = "git https://github.com/x/bar"
redirect = "https://github.com/x/bar"
"#;

    #[test]
    fn test_parse_preserves_order() {
        let doc = ConfigDocument::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc.default_redirect.as_deref(), Some("https://example.com"));
        assert_eq!(doc.packages.len(), 2);
        assert_eq!(doc.packages[0].prefix, "go.example.com/foo/");
        assert_eq!(doc.packages[1].prefix, "go.example.com/bar");
        assert_eq!(doc.packages[1].import, "git https://github.com/x/bar");
    }

    #[test]
    fn test_parse_empty_document() {
        let doc = ConfigDocument::parse(b"").unwrap();
        assert_eq!(doc, ConfigDocument::default());
    }

    #[test]
    fn test_empty_default_redirect_is_unset() {
        let doc = ConfigDocument::parse(b"default_redirect = \"\"").unwrap();
        assert!(doc.default_redirect.is_none());
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let text = "[[packages]]\nprefix = 42\nimport = \"git x\"\nredirect = \"https://x\"\n";
        assert!(matches!(
            ConfigDocument::parse(text.as_bytes()),
            Err(ParseError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let text = "[[packages]]\nprefix = \"go.example.com/foo\"\n";
        assert!(matches!(
            ConfigDocument::parse(text.as_bytes()),
            Err(ParseError::Toml(_))
        ));
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        let text = r#"
[[packages]]
prefix = "go.example.com/ok"
import = "git https://github.com/x/ok"
redirect = "https://github.com/x/ok"

[[packages]]
prefix = "/"
import = "git https://github.com/x/all"
redirect = "https://github.com/x/all"
"#;
        assert!(matches!(
            ConfigDocument::parse(text.as_bytes()),
            Err(ParseError::EmptyPrefix { index: 1 })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert!(matches!(
            ConfigDocument::parse(&[0xff, 0xfe, 0x00]),
            Err(ParseError::Utf8(_))
        ));
    }

    #[test]
    fn test_serialize_then_parse_keeps_rules() {
        let doc = ConfigDocument::parse(SAMPLE.as_bytes()).unwrap();
        let text = doc.to_toml_string().unwrap();
        assert_eq!(ConfigDocument::parse(text.as_bytes()).unwrap(), doc);
    }

    #[test]
    fn test_find_rule_first_declared_wins() {
        let doc = ConfigDocument {
            default_redirect: None,
            packages: vec![
                RoutingRule {
                    prefix: "go.example.com/foo".into(),
                    import: "git https://github.com/x/foo".into(),
                    redirect: "https://github.com/x/foo".into(),
                },
                RoutingRule {
                    prefix: "go.example.com/foo/sub".into(),
                    import: "git https://github.com/x/sub".into(),
                    redirect: "https://github.com/x/sub".into(),
                },
            ],
        };

        let rule = doc.find_rule("go.example.com/foo/sub/pkg").unwrap();
        assert_eq!(rule.redirect, "https://github.com/x/foo");

        // Repeated lookups are stable.
        assert_eq!(doc.find_rule("go.example.com/foo/sub/pkg"), Some(rule));
        assert!(doc.find_rule("go.example.com/other").is_none());
    }
}
