#![deny(missing_docs)]

//! # Reference Resolution
//!
//! Helper functions to turn `$ref` strings into component names and to collect
//! every named type a schema fragment points at.

use crate::oas::ref_utils::decode_pointer_segment;
use crate::oas::schemas::{AdditionalProperties, Schema};

/// Pointer prefixes that address the named schema registry.
const SCHEMA_POINTERS: [&str; 2] = ["#/components/schemas/", "#/definitions/"];

/// Builds the local pointer used when a schema is rewritten to reference `name`.
pub fn schema_pointer(name: &str) -> String {
    format!(
        "{}{}",
        SCHEMA_POINTERS[0],
        name.replace('~', "~0").replace('/', "~1")
    )
}

/// Extracts the simple name from a reference string.
/// e.g. `#/components/schemas/User` -> `User`
pub fn extract_ref_name(ref_loc: &str) -> String {
    let last = ref_loc.rsplit('/').next().unwrap_or("Unknown");
    decode_pointer_segment(last)
}

/// Returns the component name if `candidate` embeds a schema component pointer.
///
/// Some producers encode references in `format` (e.g. `format: "#/components/schemas/Money"`),
/// so the pointer may appear anywhere inside the string.
pub fn component_name_from_pointer(candidate: &str) -> Option<String> {
    SCHEMA_POINTERS.iter().find_map(|prefix| {
        let start = candidate.find(prefix)? + prefix.len();
        let rest = &candidate[start..];
        let segment = rest.split('/').next().unwrap_or(rest);
        let name = decode_pointer_segment(segment);
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    })
}

/// Collects every registry name referenced by `schema`, walking inline sub-schemas.
///
/// Covers `$ref`, format-encoded pointers, array items, map values, object properties,
/// composition members (`allOf`/`oneOf`/`anyOf`) and discriminator mapping targets.
/// Names are appended in discovery order and may repeat.
pub fn collect_schema_refs(schema: &Schema, out: &mut Vec<String>) {
    if let Some(format) = schema.format.as_deref() {
        if let Some(name) = component_name_from_pointer(format) {
            out.push(name);
        }
    }

    if let Some(reference) = schema.reference.as_deref() {
        out.push(extract_ref_name(reference));
        return;
    }

    if let Some(items) = schema.items.as_deref() {
        collect_schema_refs(items, out);
    }

    if let Some(AdditionalProperties::Schema(values)) = schema.additional_properties.as_ref() {
        collect_schema_refs(values, out);
    }

    for property in schema.properties.values() {
        collect_schema_refs(property, out);
    }

    for member in schema
        .all_of
        .iter()
        .chain(schema.one_of.iter())
        .chain(schema.any_of.iter())
    {
        collect_schema_refs(member, out);
    }

    if let Some(discriminator) = schema.discriminator.as_ref() {
        for target in discriminator.mapping.values() {
            out.push(extract_ref_name(target));
        }
    }
}
