#![deny(missing_docs)]

//! # Identifier Disambiguation
//!
//! Turns arbitrary document-provided names (JSON keys, tags, operation ids, enum labels)
//! into valid, collision-free identifiers.
//!
//! - **NamingConvention**: the target's rules (reserved words, escapes, casing, retry ceiling).
//! - **NameScope**: one namespace being filled (a client's methods, a type's properties).
//!   Scopes never share state, so the same raw name can resolve differently in each.

use crate::error::{AppError, AppResult};
use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Rust strict and reserved keywords.
static RUST_RESERVED_WORDS: LazyLock<BTreeSet<String>> = LazyLock::new(|| {
    [
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
        "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box",
        "do", "final", "gen", "macro", "override", "priv", "try", "typeof", "unsized",
        "virtual", "yield",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
});

/// Default ceiling for numeric disambiguation suffixes.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Identifier casing applied before escaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    /// `UpperCamelCase`
    #[default]
    Pascal,
    /// `lowerCamelCase`
    Camel,
    /// `snake_case`
    Snake,
    /// Keep the raw spelling.
    Preserve,
}

impl Case {
    /// Re-cases `raw`.
    pub fn apply(self, raw: &str) -> String {
        match self {
            Case::Pascal => raw.to_upper_camel_case(),
            Case::Camel => raw.to_lower_camel_case(),
            Case::Snake => raw.to_snake_case(),
            Case::Preserve => raw.to_string(),
        }
    }
}

/// How a candidate equal to a reserved word is escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordEscape {
    /// Prepend the marker (e.g. `@` for C#).
    Prefix(String),
    /// Append the marker (e.g. `_`).
    Suffix(String),
}

/// Target-language identifier rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    /// Words that cannot be used verbatim.
    pub reserved: BTreeSet<String>,
    /// Prepended when a candidate starts with a digit.
    pub digit_prefix: String,
    /// Escape applied to reserved words.
    pub keyword_escape: KeywordEscape,
    /// Numeric suffixes tried before giving up.
    pub max_attempts: usize,
    /// Casing for type and client names.
    pub type_case: Case,
    /// Casing for properties and parameters.
    pub member_case: Case,
    /// Casing for operation methods.
    pub method_case: Case,
    /// Casing for enum cases.
    pub variant_case: Case,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            reserved: RUST_RESERVED_WORDS.clone(),
            digit_prefix: "_".to_string(),
            keyword_escape: KeywordEscape::Suffix("_".to_string()),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            type_case: Case::Pascal,
            member_case: Case::Snake,
            method_case: Case::Snake,
            variant_case: Case::Pascal,
        }
    }
}

impl NamingConvention {
    /// Replaces every character that cannot appear in an identifier with `_`.
    pub fn sanitize(&self, raw: &str) -> String {
        let cleaned: String = raw
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        if cleaned.is_empty() {
            "_".to_string()
        } else {
            cleaned
        }
    }

    /// Whether `candidate` is a reserved word.
    pub fn is_reserved(&self, candidate: &str) -> bool {
        self.reserved.contains(candidate)
    }

    /// Produces a syntactically valid identifier for `raw` without consulting any scope.
    pub fn escape(&self, raw: &str) -> String {
        let mut ident = self.sanitize(raw);

        if ident.starts_with(|c: char| c.is_ascii_digit()) {
            ident = format!("{}{}", self.digit_prefix, ident);
        }

        if self.is_reserved(&ident) {
            ident = match &self.keyword_escape {
                KeywordEscape::Prefix(marker) => format!("{marker}{ident}"),
                KeywordEscape::Suffix(marker) => format!("{ident}{marker}"),
            };
        }

        ident
    }
}

/// One namespace of identifiers being filled.
#[derive(Debug, Clone)]
pub struct NameScope<'c> {
    label: String,
    convention: &'c NamingConvention,
    used: HashSet<String>,
}

impl<'c> NameScope<'c> {
    /// Creates an empty scope. `label` appears in error messages.
    pub fn new(label: impl Into<String>, convention: &'c NamingConvention) -> Self {
        Self {
            label: label.into(),
            convention,
            used: HashSet::new(),
        }
    }

    /// Computes the identifier `claim` would return, without registering it.
    pub fn propose(&self, raw: &str) -> AppResult<String> {
        let base = self.convention.escape(raw);
        if !self.used.contains(&base) {
            return Ok(base);
        }

        let separator = if base.ends_with(|c: char| c.is_ascii_digit()) {
            "_"
        } else {
            ""
        };

        (2..)
            .take(self.convention.max_attempts)
            .map(|n| format!("{base}{separator}{n}"))
            .find(|candidate| !self.used.contains(candidate))
            .ok_or_else(|| AppError::NameExhausted {
                scope: self.label.clone(),
                name: base.clone(),
                attempts: self.convention.max_attempts,
            })
    }

    /// Escapes `raw`, appends a numeric suffix while it collides, and registers the result.
    pub fn claim(&mut self, raw: &str) -> AppResult<String> {
        let ident = self.propose(raw)?;
        self.used.insert(ident.clone());
        Ok(ident)
    }

    /// Escapes `raw` and registers it only if it is free. First occurrence wins.
    pub fn claim_exact(&mut self, raw: &str) -> Option<String> {
        let ident = self.convention.escape(raw);
        self.used.insert(ident.clone()).then_some(ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_digit_and_keyword() {
        let convention = NamingConvention::default();
        assert_eq!(convention.escape("2fa"), "_2fa");
        assert_eq!(convention.escape("type"), "type_");
        assert_eq!(convention.escape("Self"), "Self_");
        assert_eq!(convention.escape("x-rate-limit"), "x_rate_limit");
        assert_eq!(convention.escape(""), "_");
        assert_eq!(convention.escape("name"), "name");
    }

    #[test]
    fn test_prefix_escape() {
        let convention = NamingConvention {
            reserved: ["class".to_string()].into_iter().collect(),
            keyword_escape: KeywordEscape::Prefix("@".into()),
            ..NamingConvention::default()
        };
        assert_eq!(convention.escape("class"), "@class");
    }

    #[test]
    fn test_colliding_names_are_distinct() {
        let convention = NamingConvention::default();
        let mut scope = NameScope::new("client Pets", &convention);

        let names: Vec<String> = (0..5).map(|_| scope.claim("get_pet").unwrap()).collect();
        assert_eq!(names, vec!["get_pet", "get_pet2", "get_pet3", "get_pet4", "get_pet5"]);

        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_trailing_digit_uses_separator() {
        let convention = NamingConvention::default();
        let mut scope = NameScope::new("t", &convention);
        assert_eq!(scope.claim("v1").unwrap(), "v1");
        assert_eq!(scope.claim("v1").unwrap(), "v1_2");
    }

    #[test]
    fn test_propose_is_stable_until_registration() {
        let convention = NamingConvention::default();
        let mut scope = NameScope::new("t", &convention);
        scope.claim("item").unwrap();

        let first = scope.propose("item").unwrap();
        let second = scope.propose("item").unwrap();
        assert_eq!(first, second);

        scope.claim("item").unwrap();
        assert_ne!(scope.propose("item").unwrap(), first);
    }

    #[test]
    fn test_scopes_are_independent() {
        let convention = NamingConvention::default();
        let mut methods = NameScope::new("client", &convention);
        let mut props = NameScope::new("type", &convention);

        assert_eq!(methods.claim("list").unwrap(), "list");
        assert_eq!(methods.claim("list").unwrap(), "list2");
        assert_eq!(props.claim("list").unwrap(), "list");

        assert_eq!(props.claim_exact("list"), None);
        assert_eq!(props.claim_exact("items").as_deref(), Some("items"));
        assert_eq!(methods.claim("items").unwrap(), "items");
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let convention = NamingConvention {
            max_attempts: 2,
            ..NamingConvention::default()
        };
        let mut scope = NameScope::new("client Pets", &convention);
        scope.claim("a").unwrap();
        scope.claim("a").unwrap();
        scope.claim("a").unwrap();

        match scope.claim("a") {
            Err(AppError::NameExhausted { scope, name, attempts }) => {
                assert_eq!(scope, "client Pets");
                assert_eq!(name, "a");
                assert_eq!(attempts, 2);
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn test_claim_exact_first_wins() {
        let convention = NamingConvention::default();
        let mut scope = NameScope::new("enum", &convention);
        assert_eq!(scope.claim_exact("On").as_deref(), Some("On"));
        assert_eq!(scope.claim_exact("On"), None);
    }

    #[test]
    fn test_case_apply() {
        assert_eq!(Case::Pascal.apply("get user by id"), "GetUserById");
        assert_eq!(Case::Snake.apply("GetUserById"), "get_user_by_id");
        assert_eq!(Case::Camel.apply("user-name"), "userName");
        assert_eq!(Case::Preserve.apply("user-name"), "user-name");
    }
}
