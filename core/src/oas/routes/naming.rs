#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helper functions for deriving names from OpenAPI paths, verbs and Operation IDs.
//! Results are raw PascalCase candidates; escaping and collision handling happen in a
//! [`crate::oas::identifiers::NameScope`] or the schema registry.

use crate::oas::document::Verb;
use heck::ToUpperCamelCase;

/// Client used for operations without tags.
pub const DEFAULT_CLIENT: &str = "Default";

/// PascalCase words of `raw`, treating path punctuation (`/`, `{`, `}`, `-`) as separators.
///
/// e.g. `/widgets/{id}` -> `WidgetsId`. An empty result becomes `Root`.
pub fn pascal_words(raw: &str) -> String {
    let words = raw.to_upper_camel_case();
    if words.is_empty() {
        "Root".to_string()
    } else {
        words
    }
}

fn starts_with_verb(name: &str, verb: Verb) -> bool {
    name.get(..verb.pascal().len())
        .is_some_and(|head| head.eq_ignore_ascii_case(verb.pascal()))
}

/// Base name for types synthesized from an operation's inline bodies.
///
/// Uses `operationId` when present, else the path. When several operations share the
/// path, the verb is prepended unless the name already starts with it.
pub fn synthesized_base_name(
    path: &str,
    verb: Verb,
    operation_id: Option<&str>,
    shared_path: bool,
) -> String {
    let base = pascal_words(operation_id.unwrap_or(path));
    if shared_path && !starts_with_verb(&base, verb) {
        format!("{}{}", verb.pascal(), base)
    } else {
        base
    }
}

/// Raw method name for an operation.
///
/// e.g. `GET /users/{id}` -> `GetUsersId`, `operationId: listPetsAsync` on GET -> `GetListPets`.
pub fn method_base_name(path: &str, verb: Verb, operation_id: Option<&str>) -> String {
    let mut name = pascal_words(operation_id.unwrap_or(path.trim_start_matches('/')));

    if !starts_with_verb(&name, verb) {
        name = format!("{}{}", verb.pascal(), name);
    }

    let suffix = "Async";
    if name.len() > suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
    {
        name.truncate(name.len() - suffix.len());
    }

    name
}

/// Client an operation belongs to: its first tag, else [`DEFAULT_CLIENT`].
pub fn client_name(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| tag.to_upper_camel_case())
        .find(|tag| !tag.is_empty())
        .unwrap_or_else(|| DEFAULT_CLIENT.to_string())
}
