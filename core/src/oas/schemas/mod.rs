#![deny(missing_docs)]

//! # Schema Model
//!
//! Deserialization layer for OpenAPI / Swagger Schema Objects.
//!
//! Defines logic to:
//! - Accept the loose shapes real documents use (`type` arrays, boolean `additionalProperties`,
//!   `x-nullable`, property-level `required: true`).
//! - Classify a fragment into a [`SchemaKind`] view.
//! - Rewrite an inline schema into a reference after synthesis.

pub mod enums;
pub mod refs;
pub mod structs;

use crate::oas::schemas::refs::{extract_ref_name, schema_pointer};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A Schema Object, named (registry entry) or anonymous (inline fragment).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// `$ref` pointer to another named schema.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// `type`, either a single name or an OAS 3.1 union (`["string", "null"]`).
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub schema_type: Option<SchemaType>,

    /// `format` hint (`int64`, `date-time`, or an embedded component pointer).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Array element schema.
    #[serde(
        default,
        deserialize_with = "lenient_fragment",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<Box<Schema>>,

    /// Map value schema (or a boolean allowing arbitrary values).
    #[serde(
        default,
        deserialize_with = "lenient_additional",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    /// Ordered object properties.
    #[serde(
        default,
        deserialize_with = "lenient_entries",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub properties: IndexMap<String, Schema>,

    /// Names of required properties.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Enumerated values, in declaration order. May contain `null`.
    #[serde(
        rename = "enum",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub enum_values: Option<Vec<Value>>,

    /// Case names parallel to `enum`.
    #[serde(
        rename = "x-enumNames",
        alias = "x-enum-varnames",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub enum_names: Option<Vec<String>>,

    /// Bit-flag layout for the enum.
    #[serde(
        rename = "x-enum-flags",
        alias = "x-enumFlags",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub enum_flags: Option<EnumFlags>,

    /// Polymorphism discriminator.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    /// OAS 3.0 nullability flag.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "is_false")]
    pub nullable: bool,

    /// Swagger 2.0 vendor nullability flag.
    #[serde(
        rename = "x-nullable",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "is_false"
    )]
    pub x_nullable: bool,

    /// Human readable description.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Deprecation marker.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "is_false")]
    pub deprecated: bool,

    /// `allOf` members.
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,

    /// `oneOf` members.
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,

    /// `anyOf` members.
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Schema>,

    /// Set when the document held something other than a Schema Object here
    /// (an OAS 3.1 boolean schema, a string). Reads as untyped.
    #[serde(skip)]
    pub malformed: bool,
}

/// The `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `type: string`
    Single(String),
    /// `type: [string, "null"]`
    Union(Vec<String>),
}

impl SchemaType {
    /// The first non-null type name.
    pub fn primary(&self) -> Option<&str> {
        match self {
            SchemaType::Single(t) => Some(t.as_str()).filter(|t| *t != "null"),
            SchemaType::Union(types) => types.iter().map(String::as_str).find(|t| *t != "null"),
        }
    }

    /// Whether `null` is one of the accepted types.
    pub fn includes_null(&self) -> bool {
        match self {
            SchemaType::Single(t) => t == "null",
            SchemaType::Union(types) => types.iter().any(|t| t == "null"),
        }
    }
}

/// The `additionalProperties` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` (any value) or `false` (closed object).
    Allowed(bool),
    /// Values must match this schema.
    Schema(Box<Schema>),
}

/// Discriminator Object: property name plus value -> type mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// Name of the property carrying the discriminating value.
    pub property_name: String,
    /// Discriminator value -> schema pointer (or bare name).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// Flag-layout metadata for enums (`x-enum-flags`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumFlags {
    /// Token marking a case that combines other flags (e.g. `", "`).
    #[serde(rename = "separatingStrings", alias = "separator")]
    pub separator: String,
    /// Whether combined values are serialized as a joined string.
    #[serde(rename = "combineAsString", default)]
    pub combine_as_string: bool,
}

/// Classified view of a schema fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaKind<'a> {
    /// Points at another named schema.
    Reference(&'a str),
    /// Enumerated values.
    Enum(&'a [Value]),
    /// Sequence of the element schema (if declared).
    Array(Option<&'a Schema>),
    /// String-keyed map of the value schema (`None` when values are untyped).
    Map(Option<&'a Schema>),
    /// Object with declared properties.
    Object(&'a IndexMap<String, Schema>),
    /// Scalar type plus optional format.
    Primitive {
        /// The `type` keyword.
        ty: &'a str,
        /// The `format` keyword.
        format: Option<&'a str>,
    },
    /// Nothing usable was declared.
    Untyped,
}

impl Schema {
    /// Builds a schema that references the registry entry `name`.
    pub fn reference_to(name: &str) -> Self {
        Self {
            reference: Some(schema_pointer(name)),
            ..Self::default()
        }
    }

    /// Builds an inline scalar schema.
    pub fn primitive(ty: &str, format: Option<&str>) -> Self {
        Self {
            schema_type: Some(SchemaType::Single(ty.to_string())),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    /// The primary `type` name, ignoring `null`.
    pub fn type_name(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(SchemaType::primary)
    }

    /// Name of the referenced registry entry, if this is a `$ref`.
    pub fn reference_name(&self) -> Option<String> {
        self.reference.as_deref().map(extract_ref_name)
    }

    /// Whether the value may be `null` (`nullable`, `x-nullable` or a `null` type member).
    pub fn is_nullable(&self) -> bool {
        self.nullable
            || self.x_nullable
            || self
                .schema_type
                .as_ref()
                .is_some_and(SchemaType::includes_null)
    }

    /// Whether a property named `name` is listed as required.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// An anonymous object body that can be lifted into the registry.
    pub fn is_inline_object(&self) -> bool {
        self.reference.is_none() && self.enum_values.is_none() && !self.properties.is_empty()
    }

    /// An anonymous array whose elements are inline objects.
    pub fn is_array_of_inline_objects(&self) -> bool {
        self.reference.is_none()
            && self
                .items
                .as_deref()
                .is_some_and(Schema::is_inline_object)
    }

    /// A schema that deliberately accepts anything (`{}` or a bare `type: object`).
    pub fn is_free_form(&self) -> bool {
        !self.malformed
            && self.reference.is_none()
            && self.enum_values.is_none()
            && self.items.is_none()
            && self.properties.is_empty()
            && self.all_of.is_empty()
            && self.one_of.is_empty()
            && self.any_of.is_empty()
            && matches!(self.type_name(), None | Some("object"))
    }

    /// Classifies the fragment.
    pub fn kind(&self) -> SchemaKind<'_> {
        if let Some(reference) = self.reference.as_deref() {
            return SchemaKind::Reference(reference);
        }
        if let Some(values) = self.enum_values.as_deref() {
            return SchemaKind::Enum(values);
        }

        match self.type_name() {
            Some("array") => SchemaKind::Array(self.items.as_deref()),
            Some("object") | None => {
                if !self.properties.is_empty() {
                    return SchemaKind::Object(&self.properties);
                }
                match self.additional_properties.as_ref() {
                    Some(AdditionalProperties::Schema(values)) => {
                        SchemaKind::Map(Some(values.as_ref()))
                    }
                    Some(AdditionalProperties::Allowed(true)) => SchemaKind::Map(None),
                    _ if self.items.is_some() => SchemaKind::Array(self.items.as_deref()),
                    _ => SchemaKind::Untyped,
                }
            }
            Some(ty) => SchemaKind::Primitive {
                ty,
                format: self.format.as_deref(),
            },
        }
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// A document fragment that degrades to a flagged placeholder instead of failing.
pub(crate) trait Fragment: DeserializeOwned {
    /// Stand-in for a value of the wrong shape.
    fn placeholder() -> Self;

    /// Reads one entry, degrading to [`Fragment::placeholder`].
    fn from_fragment(raw: Value) -> Self {
        serde_json::from_value(raw).unwrap_or_else(|_| Self::placeholder())
    }
}

impl Fragment for Schema {
    fn placeholder() -> Self {
        Self {
            malformed: true,
            ..Self::default()
        }
    }
}

impl<T: Fragment> Fragment for Box<T> {
    fn placeholder() -> Self {
        Box::new(T::placeholder())
    }

    fn from_fragment(raw: Value) -> Self {
        Box::new(T::from_fragment(raw))
    }
}

/// Deserializes a map entry by entry, so one bad value only degrades itself.
pub(crate) fn lenient_entries<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Fragment,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, value)| (key, T::from_fragment(value)))
            .collect(),
        _ => IndexMap::new(),
    })
}

/// Deserializes a sequence element by element.
pub(crate) fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Fragment,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(T::from_fragment).collect(),
        _ => Vec::new(),
    })
}

/// Deserializes an optional fragment; `null` is absent, anything else is read or degraded.
pub(crate) fn lenient_fragment<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Fragment,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        raw => Some(T::from_fragment(raw)),
    })
}

fn lenient_additional<'de, D>(deserializer: D) -> Result<Option<AdditionalProperties>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Bool(allowed) => Some(AdditionalProperties::Allowed(allowed)),
        raw => Some(AdditionalProperties::Schema(Box::<Schema>::from_fragment(raw))),
    })
}

/// Deserializes a field, falling back to its default when the document holds
/// something of the wrong shape. Malformed fragments degrade instead of failing the run.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}
