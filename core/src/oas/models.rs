#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Definition of the Intermediate Representation (IR) handed to an emitter.
//!
//! The IR is the pruned/synthesized type table plus, per operation, resolved
//! parameter/body/response types and disambiguated identifiers. It carries no
//! target-language syntax: types are [`TypeRef`] descriptors naming registry entries.

use crate::oas::diagnostics::Warning;
use crate::oas::document::{ParamLocation, Verb};
use crate::oas::resolver::{ContentKind, TypeRef};
use crate::oas::schemas::enums::EnumModel;
use serde::Serialize;

/// The complete generation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiModel {
    /// `info.title`
    pub title: String,
    /// `info.version`
    pub version: String,
    /// Named types in emission order.
    pub types: Vec<TypeModel>,
    /// Operation groups in first-seen order.
    pub clients: Vec<ClientModel>,
    /// Non-fatal findings.
    pub warnings: Vec<Warning>,
}

impl ApiModel {
    /// Looks up a type by registry name.
    pub fn type_named(&self, name: &str) -> Option<&TypeModel> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Looks up a client by name.
    pub fn client(&self, name: &str) -> Option<&ClientModel> {
        self.clients.iter().find(|c| c.name == name)
    }

    /// Type identifiers in lexical order, independent of [`ApiModel::types`] order.
    /// Aggregate listings (e.g. a serializer registration) iterate this.
    pub fn serializable_types(&self) -> Vec<&str> {
        let mut idents: Vec<&str> = self.types.iter().map(|t| t.ident.as_str()).collect();
        idents.sort_unstable();
        idents
    }

    /// Every operation across clients.
    pub fn operations(&self) -> impl Iterator<Item = &OperationModel> {
        self.clients.iter().flat_map(|c| c.operations.iter())
    }
}

/// Operations sharing a first tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientModel {
    /// Client identifier.
    pub name: String,
    /// Operations in document order.
    pub operations: Vec<OperationModel>,
}

/// One HTTP operation with resolved bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationModel {
    /// Path template.
    pub path: String,
    /// HTTP method.
    pub verb: Verb,
    /// Disambiguated method identifier, unique within the client.
    pub method_name: String,
    /// Declared `operationId`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Summary text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Declared tags.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Deprecation marker.
    pub deprecated: bool,
    /// Parameters in call-signature order.
    pub params: Vec<ParamModel>,
    /// Request body binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyModel>,
    /// Selected success response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseModel>,
}

/// A resolved parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamModel {
    /// Wire name.
    pub name: String,
    /// Disambiguated identifier, unique within the operation.
    pub ident: String,
    /// Location.
    pub location: ParamLocation,
    /// Required flag.
    pub required: bool,
    /// Value type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// Payload shape of a body or response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// JSON document of the given type.
    Json {
        /// Declared media type.
        media_type: String,
        /// Payload type.
        #[serde(rename = "type")]
        ty: TypeRef,
    },
    /// Multipart form; each part is a named field.
    Multipart {
        /// Declared media type.
        media_type: String,
        /// Form parts.
        parts: Vec<PartModel>,
    },
    /// Raw bytes.
    OctetStream {
        /// Declared media type.
        media_type: String,
    },
}

impl Payload {
    /// The closed shape tag.
    pub fn kind(&self) -> ContentKind {
        match self {
            Payload::Json { .. } => ContentKind::Json,
            Payload::Multipart { .. } => ContentKind::Multipart,
            Payload::OctetStream { .. } => ContentKind::OctetStream,
        }
    }

    /// Types referenced by the payload.
    pub fn types(&self) -> Vec<&TypeRef> {
        match self {
            Payload::Json { ty, .. } => vec![ty],
            Payload::Multipart { parts, .. } => parts.iter().map(|p| &p.ty).collect(),
            Payload::OctetStream { .. } => Vec::new(),
        }
    }
}

/// One multipart form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartModel {
    /// Field name on the wire.
    pub name: String,
    /// Disambiguated identifier.
    pub ident: String,
    /// Field type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Required flag.
    pub required: bool,
}

/// Request body binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyModel {
    /// Required flag.
    pub required: bool,
    /// Payload.
    pub payload: Payload,
}

/// Response binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseModel {
    /// Status code key (`200`, `2XX`, `default`).
    pub status: String,
    /// Payload, absent for empty responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

/// A named type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeModel {
    /// Registry name (what [`TypeRef::Named`] refers to).
    pub name: String,
    /// Disambiguated identifier, unique across types.
    pub ident: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Deprecation marker.
    pub deprecated: bool,
    /// Shape.
    #[serde(flatten)]
    pub kind: TypeKind,
}

/// Shape of a named type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// Record with properties.
    Object {
        /// Properties in declaration order.
        properties: Vec<PropertyModel>,
        /// `allOf` references this type extends.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        parents: Vec<String>,
        /// Polymorphism metadata.
        #[serde(skip_serializing_if = "Option::is_none")]
        discriminator: Option<DiscriminatorModel>,
    },
    /// Enumeration.
    Enum {
        /// Underlying value type.
        #[serde(rename = "type")]
        ty: TypeRef,
        /// Cases.
        model: EnumModel,
    },
    /// Another name for an existing type.
    Alias {
        /// Aliased type.
        target: TypeRef,
    },
}

/// A property of an object type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyModel {
    /// JSON key.
    pub name: String,
    /// Disambiguated identifier, unique within the type.
    pub ident: String,
    /// Value type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Listed in `required`.
    pub required: bool,
    /// Value may be null.
    pub nullable: bool,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Deprecation marker.
    pub deprecated: bool,
}

/// Discriminator property plus value → type bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscriminatorModel {
    /// Property carrying the discriminating value.
    pub property_name: String,
    /// Mapping in declaration order.
    pub mapping: Vec<DiscriminatorCase>,
}

/// One discriminator mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscriminatorCase {
    /// Wire value.
    pub value: String,
    /// Registry name of the concrete type.
    pub type_name: String,
}
