#![deny(missing_docs)]

//! # Type Mapping
//!
//! Logic for mapping OpenAPI Schema fragments to canonical, language-neutral type descriptors.
//!
//! Resolution order:
//! 1. A `format` embedding a component pointer names the type directly.
//! 2. `$ref`, then `type` + `format`, recursing through `items` (arrays) and
//!    `additionalProperties` (maps).
//! 3. Anything else degrades to [`TypeRef::Untyped`]; callers treat it as valid input.

use crate::oas::diagnostics::Diagnostics;
use crate::oas::registry::SchemaRegistry;
use crate::oas::schemas::refs::component_name_from_pointer;
use crate::oas::schemas::{Schema, SchemaKind};
use serde::{Serialize, Serializer};
use std::fmt;

/// Scalar types understood by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `integer` without a known width.
    Integer,
    /// `integer` / `int32`
    Int32,
    /// `integer` / `int64`
    Int64,
    /// `number` without a known width.
    Number,
    /// `number` / `float`
    Float,
    /// `number` / `double`
    Double,
    /// `string`
    String,
    /// `boolean`
    Boolean,
    /// `string` / `date`
    Date,
    /// `string` / `date-time`
    DateTime,
    /// `string` / `uuid`
    Uuid,
    /// `string` / `uri`
    Uri,
    /// `string` / `binary`, or a Swagger 2.0 `file`
    Binary,
    /// `string` / `byte` (base64)
    Byte,
}

impl Primitive {
    /// Canonical spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::Integer => "integer",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Number => "number",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::String => "string",
            Primitive::Boolean => "boolean",
            Primitive::Date => "date",
            Primitive::DateTime => "date-time",
            Primitive::Uuid => "uuid",
            Primitive::Uri => "uri",
            Primitive::Binary => "binary",
            Primitive::Byte => "byte",
        }
    }

    /// Maps a `type` + `format` pair. Unknown types yield `None`.
    pub fn from_type(ty: &str, format: Option<&str>) -> Option<Self> {
        let primitive = match ty {
            "integer" => match format {
                Some("int32") => Primitive::Int32,
                Some("int64") => Primitive::Int64,
                _ => Primitive::Integer,
            },
            "number" => match format {
                Some("float") => Primitive::Float,
                Some("double") => Primitive::Double,
                _ => Primitive::Number,
            },
            "string" => match format {
                Some("date") => Primitive::Date,
                Some("date-time") => Primitive::DateTime,
                Some("uuid") => Primitive::Uuid,
                Some("uri") => Primitive::Uri,
                Some("binary") => Primitive::Binary,
                Some("byte") => Primitive::Byte,
                _ => Primitive::String,
            },
            "boolean" => Primitive::Boolean,
            "file" => Primitive::Binary,
            _ => return None,
        };
        Some(primitive)
    }
}

/// Canonical type descriptor handed to the emitter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A registry entry.
    Named(String),
    /// A scalar.
    Primitive(Primitive),
    /// Sequence of the element type.
    Array(Box<TypeRef>),
    /// Map of string to the value type.
    Map(Box<TypeRef>),
    /// The generic fallback marker.
    Untyped,
}

impl TypeRef {
    /// Whether this is the fallback marker.
    pub fn is_untyped(&self) -> bool {
        matches!(self, TypeRef::Untyped)
    }

    /// Whether the fallback marker appears anywhere inside.
    pub fn contains_untyped(&self) -> bool {
        match self {
            TypeRef::Untyped => true,
            TypeRef::Array(inner) | TypeRef::Map(inner) => inner.contains_untyped(),
            TypeRef::Named(_) | TypeRef::Primitive(_) => false,
        }
    }

    /// Registry names mentioned by this descriptor.
    pub fn named_types(&self) -> Vec<&str> {
        match self {
            TypeRef::Named(name) => vec![name.as_str()],
            TypeRef::Array(inner) | TypeRef::Map(inner) => inner.named_types(),
            TypeRef::Primitive(_) | TypeRef::Untyped => Vec::new(),
        }
    }

    /// Replaces names `registry` does not hold with the fallback marker, warning at
    /// `location` for each one.
    pub fn known_in(
        self,
        registry: &SchemaRegistry,
        location: &str,
        diagnostics: &mut Diagnostics,
    ) -> TypeRef {
        match self {
            TypeRef::Named(name) if !registry.contains(&name) => {
                diagnostics.warn(location, format!("unknown type `{name}`, using `any`"));
                TypeRef::Untyped
            }
            TypeRef::Array(inner) => {
                TypeRef::Array(Box::new((*inner).known_in(registry, location, diagnostics)))
            }
            TypeRef::Map(inner) => {
                TypeRef::Map(Box::new((*inner).known_in(registry, location, diagnostics)))
            }
            other => other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::Primitive(p) => f.write_str(p.as_str()),
            TypeRef::Array(inner) => write!(f, "array<{inner}>"),
            TypeRef::Map(inner) => write!(f, "map<string, {inner}>"),
            TypeRef::Untyped => f.write_str("any"),
        }
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Maps a schema fragment to its canonical type. Pure and total.
pub fn resolve_type(schema: &Schema) -> TypeRef {
    if let Some(name) = schema
        .format
        .as_deref()
        .and_then(component_name_from_pointer)
    {
        return TypeRef::Named(name);
    }

    match schema.kind() {
        SchemaKind::Reference(_) => schema
            .reference_name()
            .map_or(TypeRef::Untyped, TypeRef::Named),
        SchemaKind::Array(items) => {
            TypeRef::Array(Box::new(items.map_or(TypeRef::Untyped, resolve_type)))
        }
        SchemaKind::Map(values) => {
            TypeRef::Map(Box::new(values.map_or(TypeRef::Untyped, resolve_type)))
        }
        SchemaKind::Enum(_) => schema
            .type_name()
            .and_then(|ty| Primitive::from_type(ty, schema.format.as_deref()))
            .map_or(TypeRef::Primitive(Primitive::String), TypeRef::Primitive),
        SchemaKind::Primitive { ty, format } => {
            Primitive::from_type(ty, format).map_or(TypeRef::Untyped, TypeRef::Primitive)
        }
        SchemaKind::Object(_) | SchemaKind::Untyped => TypeRef::Untyped,
    }
}

/// Resolves `schema` and records a warning at `location` when the result contains a gap
/// the document did not ask for (an explicitly free-form schema is not a gap).
pub fn resolve_type_reporting(
    schema: &Schema,
    location: &str,
    diagnostics: &mut Diagnostics,
) -> TypeRef {
    let ty = resolve_type(schema);
    if schema.malformed {
        diagnostics.warn(location, format!("not a schema object, using `{ty}`"));
    } else if ty.contains_untyped() && !schema.is_free_form() {
        diagnostics.warn(
            location,
            format!("could not resolve a concrete type, using `{ty}`"),
        );
    }
    tracing::trace!(location, ty = %ty, "resolved type");
    ty
}

/// [`resolve_type_reporting`], then [`TypeRef::known_in`] against the final registry.
pub fn resolve_known(
    schema: &Schema,
    registry: &SchemaRegistry,
    location: &str,
    diagnostics: &mut Diagnostics,
) -> TypeRef {
    resolve_type_reporting(schema, location, diagnostics).known_in(registry, location, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::schemas::Fragment;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    fn resolve(value: serde_json::Value) -> String {
        resolve_type(&schema(value)).to_string()
    }

    #[test]
    fn test_map_primitives() {
        assert_eq!(resolve(json!({ "type": "integer", "format": "int64" })), "int64");
        assert_eq!(resolve(json!({ "type": "integer" })), "integer");
        assert_eq!(resolve(json!({ "type": "number", "format": "float" })), "float");
        assert_eq!(resolve(json!({ "type": "string", "format": "date-time" })), "date-time");
        assert_eq!(resolve(json!({ "type": "string", "format": "email" })), "string");
        assert_eq!(resolve(json!({ "type": "boolean" })), "boolean");
        assert_eq!(resolve(json!({ "type": "file" })), "binary");
    }

    #[test]
    fn test_ref_resolution() {
        assert_eq!(resolve(json!({ "$ref": "#/components/schemas/User" })), "User");
    }

    #[test]
    fn test_format_pointer_takes_precedence() {
        assert_eq!(
            resolve(json!({
                "$ref": "#/components/schemas/Ignored",
                "format": "#/components/schemas/Money"
            })),
            "Money"
        );
    }

    #[test]
    fn test_wrappers_compose() {
        assert_eq!(
            resolve(json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/Tag" }
                    }
                }
            })),
            "array<map<string, array<Tag>>>"
        );
    }

    #[test]
    fn test_fallback_marker() {
        assert!(resolve_type(&Schema::default()).is_untyped());
        assert_eq!(resolve(json!({})), "any");
        assert_eq!(resolve(json!({ "type": "mystery" })), "any");
        assert_eq!(resolve(json!({ "type": "array" })), "array<any>");
        assert_eq!(
            resolve(json!({ "type": "object", "additionalProperties": true })),
            "map<string, any>"
        );
        assert_eq!(
            resolve(json!({ "type": "object", "properties": { "a": {} } })),
            "any"
        );
    }

    #[test]
    fn test_inline_enum_resolves_to_scalar() {
        assert_eq!(resolve(json!({ "type": "string", "enum": ["a"] })), "string");
        assert_eq!(resolve(json!({ "type": "integer", "format": "int32", "enum": [1] })), "int32");
    }

    #[test]
    fn test_deterministic() {
        let s = schema(json!({
            "type": "array",
            "items": { "type": "object", "additionalProperties": { "$ref": "#/components/schemas/A" } }
        }));
        assert_eq!(resolve_type(&s), resolve_type(&s));
        assert_eq!(resolve_type(&s).named_types(), vec!["A"]);
    }

    #[test]
    fn test_gap_reporting() {
        let mut diagnostics = Diagnostics::new();
        resolve_type_reporting(&schema(json!({})), "free", &mut diagnostics);
        assert!(diagnostics.is_empty());

        resolve_type_reporting(
            &schema(json!({ "properties": { "a": {} } })),
            "Pet.inline",
            &mut diagnostics,
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warnings()[0].location, "Pet.inline");
    }

    #[test]
    fn test_malformed_fragment_is_reported() {
        let mut diagnostics = Diagnostics::new();
        let ty = resolve_type_reporting(&Schema::placeholder(), "Pet.extra", &mut diagnostics);
        assert!(ty.is_untyped());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warnings()[0].message, "not a schema object, using `any`");
    }

    #[test]
    fn test_unknown_names_become_untyped() {
        let mut registry = SchemaRegistry::new();
        registry.insert("Pet", Schema::default()).unwrap();
        let mut diagnostics = Diagnostics::new();

        let known = resolve_known(
            &schema(json!({ "type": "array", "items": { "$ref": "#/components/schemas/Pet" } })),
            &registry,
            "pets",
            &mut diagnostics,
        );
        assert_eq!(known.to_string(), "array<Pet>");
        assert!(diagnostics.is_empty());

        let missing = resolve_known(
            &schema(json!({ "additionalProperties": { "$ref": "#/components/schemas/Missing" } })),
            &registry,
            "GET /pets response 200",
            &mut diagnostics,
        );
        assert_eq!(missing.to_string(), "map<string, any>");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warnings()[0].location, "GET /pets response 200");
        assert_eq!(
            diagnostics.warnings()[0].message,
            "unknown type `Missing`, using `any`"
        );
    }

    #[test]
    fn test_serializes_as_canonical_string() {
        let ty = TypeRef::Array(Box::new(TypeRef::Named("Pet".into())));
        assert_eq!(serde_json::to_value(&ty).unwrap(), json!("array<Pet>"));
    }
}
