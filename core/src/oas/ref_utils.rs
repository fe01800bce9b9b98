#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for resolving local `$ref` targets (`#/components/{section}/{name}`).
//!
//! These utilities never fetch external documents: a reference that does not point
//! into the current document is simply unresolved.

use percent_encoding::percent_decode_str;

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
///
/// Swagger 2.0 top-level sections (`#/parameters/{name}`, `#/responses/{name}`) are
/// accepted as well. Returns `None` if the reference is not local to the current document.
pub(crate) fn extract_component_name(ref_str: &str, section: &str) -> Option<String> {
    let pointer = ref_str.strip_prefix('#')?.trim_start_matches('/');
    let segments: Vec<&str> = pointer.split('/').collect();

    let name_seg = match segments.as_slice() {
        ["components", s, name] if *s == section => name,
        [s, name] if *s == section => name,
        _ => return None,
    };

    let name = decode_pointer_segment(name_seg);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}
