#![deny(missing_docs)]

//! # Document Model
//!
//! Typed view of an OpenAPI 3.x / Swagger 2.0 document.
//!
//! Defines logic to:
//! - Load a document from a parsed JSON tree or from YAML/JSON text.
//! - Skip specification extensions (`x-...`) in the Paths Object.
//! - Read collections entry by entry: a malformed path item, parameter, body or response is
//!   flagged and reported by [`Document::normalize`] instead of failing the whole document.
//! - Normalize the operation set so later stages see one shape:
//!   inline `$ref` parameters/bodies/responses, merge path-level parameters,
//!   and lift Swagger 2.0 `body`/`formData` parameters and response schemas into content maps.

use crate::error::{AppError, AppResult};
use crate::oas::diagnostics::Diagnostics;
use crate::oas::ref_utils::extract_component_name;
use crate::oas::schemas::{
    is_false, lenient, lenient_entries, lenient_fragment, lenient_items, Fragment, Schema,
    SchemaType,
};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

const JSON_MEDIA_TYPE: &str = "application/json";
const MULTIPART_MEDIA_TYPE: &str = "multipart/form-data";

/// Root of an OpenAPI / Swagger document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// OpenAPI version (e.g. "3.0.1").
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,

    /// Swagger version ("2.0") for legacy documents.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,

    /// Metadata about the API.
    #[serde(default, deserialize_with = "lenient")]
    pub info: Info,

    /// Reusable definitions (OAS 3.x).
    #[serde(default, deserialize_with = "lenient")]
    pub components: Components,

    /// Named schemas (Swagger 2.0).
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, Schema>,

    /// Reusable parameters (Swagger 2.0).
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    /// Reusable responses (Swagger 2.0).
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,

    /// Default request media types (Swagger 2.0).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,

    /// Default response media types (Swagger 2.0).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,

    /// Path items in declaration order. Never fails to read; see [`Paths::rejected`].
    #[serde(default)]
    pub paths: Paths,
}

/// The Info Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    /// API version.
    #[serde(default, deserialize_with = "lenient")]
    pub version: String,
    /// Description.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The Components Object (only the sections resolution needs).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Named schemas.
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
    /// Reusable parameters.
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,
    /// Reusable request bodies.
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub request_bodies: IndexMap<String, RequestBody>,
    /// Reusable responses.
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,
}

/// Represents the Paths Object, dropping specification extensions (`x-...`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paths {
    /// Path items keyed by path template.
    pub items: IndexMap<String, PathItem>,
    /// Path items (`/pets`) and operations (`GET /pets`) that were not objects and were skipped.
    pub rejected: Vec<String>,
}

impl Paths {
    /// Returns true when no concrete path items are present.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of operations across all path items.
    pub fn operation_count(&self) -> usize {
        self.items.values().map(|item| item.operations().count()).sum()
    }

    /// Every `(path, verb, operation)` triple in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, Verb, &Operation)> {
        self.items.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(verb, op)| (path.as_str(), verb, op))
        })
    }
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match Value::deserialize(deserializer)? {
            Value::Object(raw) => raw,
            Value::Null => return Ok(Self::default()),
            _ => {
                return Ok(Self {
                    rejected: vec!["paths".to_string()],
                    ..Self::default()
                })
            }
        };
        let mut paths = Self::default();

        for (key, value) in raw {
            if key.starts_with("x-") {
                continue;
            }
            let Ok(path_item) = serde_json::from_value::<PathItem>(value.clone()) else {
                paths.rejected.push(key);
                continue;
            };
            // A verb slot that was declared but could not be read.
            for verb in Verb::ALL {
                let declared = value
                    .get(verb.as_str().to_ascii_lowercase().as_str())
                    .is_some_and(|op| !op.is_null());
                if declared && path_item.slot(verb).is_none() {
                    paths.rejected.push(format!("{verb} {key}"));
                }
            }
            paths.items.insert(key, path_item);
        }

        Ok(paths)
    }
}

impl Serialize for Paths {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for (key, value) in &self.items {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// HTTP methods, in the order operations are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// TRACE
    Trace,
}

impl Verb {
    /// All verbs in visiting order.
    pub const ALL: [Verb; 8] = [
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Delete,
        Verb::Patch,
        Verb::Options,
        Verb::Head,
        Verb::Trace,
    ];

    /// Upper-case wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Patch => "PATCH",
            Verb::Options => "OPTIONS",
            Verb::Head => "HEAD",
            Verb::Trace => "TRACE",
        }
    }

    /// Pascal-case spelling used in generated names (`Get`, `Post`).
    pub fn pascal(self) -> &'static str {
        match self {
            Verb::Get => "Get",
            Verb::Post => "Post",
            Verb::Put => "Put",
            Verb::Delete => "Delete",
            Verb::Patch => "Patch",
            Verb::Options => "Options",
            Verb::Head => "Head",
            Verb::Trace => "Trace",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Verb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A Path Item Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// Parameters shared by every operation on this path.
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// GET operation.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// DELETE operation.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// PATCH operation.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// OPTIONS operation.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    /// TRACE operation.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    /// The slot holding the operation for `verb`.
    pub fn slot(&self, verb: Verb) -> &Option<Operation> {
        match verb {
            Verb::Get => &self.get,
            Verb::Post => &self.post,
            Verb::Put => &self.put,
            Verb::Delete => &self.delete,
            Verb::Patch => &self.patch,
            Verb::Options => &self.options,
            Verb::Head => &self.head,
            Verb::Trace => &self.trace,
        }
    }

    /// Mutable access to the slot for `verb`.
    pub fn slot_mut(&mut self, verb: Verb) -> &mut Option<Operation> {
        match verb {
            Verb::Get => &mut self.get,
            Verb::Post => &mut self.post,
            Verb::Put => &mut self.put,
            Verb::Delete => &mut self.delete,
            Verb::Patch => &mut self.patch,
            Verb::Options => &mut self.options,
            Verb::Head => &mut self.head,
            Verb::Trace => &mut self.trace,
        }
    }

    /// Declared operations in visiting order.
    pub fn operations(&self) -> impl Iterator<Item = (Verb, &Operation)> {
        Verb::ALL
            .into_iter()
            .filter_map(move |verb| self.slot(verb).as_ref().map(|op| (verb, op)))
    }

    /// Declared operations in visiting order, mutably.
    pub fn operations_mut(&mut self) -> Vec<(Verb, &mut Operation)> {
        let Self {
            get,
            post,
            put,
            delete,
            patch,
            options,
            head,
            trace,
            ..
        } = self;

        [
            (Verb::Get, get),
            (Verb::Post, post),
            (Verb::Put, put),
            (Verb::Delete, delete),
            (Verb::Patch, patch),
            (Verb::Options, options),
            (Verb::Head, head),
            (Verb::Trace, trace),
        ]
        .into_iter()
        .filter_map(|(verb, slot)| slot.as_mut().map(|op| (verb, op)))
        .collect()
    }
}

/// An Operation Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Grouping tags.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Short summary.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Long description.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unique operation identifier.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Parameters (path-level ones are merged in by [`Document::normalize`]).
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body.
    #[serde(
        default,
        deserialize_with = "lenient_fragment",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code (or `default`), in declaration order.
    #[serde(
        default,
        deserialize_with = "lenient_responses",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub responses: IndexMap<String, Response>,
    /// Deprecation marker.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Request media types (Swagger 2.0).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    /// Response media types (Swagger 2.0).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamLocation {
    /// Templated path segment.
    Path,
    /// Query string.
    #[default]
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
    /// Request body (Swagger 2.0).
    Body,
    /// Form field (Swagger 2.0).
    FormData,
    /// Unrecognized location.
    #[serde(other)]
    Other,
}

/// A Parameter Object (or a `$ref` to one).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// `$ref` to a reusable parameter.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Wire name.
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    /// Location.
    #[serde(rename = "in", default, deserialize_with = "lenient")]
    pub location: ParamLocation,
    /// Required flag. Path parameters are always required.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "is_false")]
    pub required: bool,
    /// Description.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Deprecation marker.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "is_false")]
    pub deprecated: bool,
    /// Value schema (OAS 3.x, Swagger 2.0 `body`).
    #[serde(default, deserialize_with = "lenient_fragment", skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Inline type (Swagger 2.0).
    #[serde(rename = "type", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    /// Inline format (Swagger 2.0).
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Inline element schema for array parameters (Swagger 2.0).
    #[serde(default, deserialize_with = "lenient_fragment", skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Set when the entry was not a Parameter Object.
    #[serde(skip)]
    pub malformed: bool,
}

impl Parameter {
    /// Whether callers must supply the parameter.
    pub fn is_required(&self) -> bool {
        self.required || self.location == ParamLocation::Path
    }

    /// The schema describing the value, built from the inline Swagger 2.0 keywords when
    /// no `schema` is present.
    pub fn effective_schema(&self) -> Schema {
        if let Some(schema) = &self.schema {
            return schema.clone();
        }
        Schema {
            schema_type: self.param_type.clone().map(SchemaType::Single),
            format: self.format.clone(),
            items: self.items.clone(),
            description: self.description.clone(),
            ..Schema::default()
        }
    }
}

/// A Request Body Object (or a `$ref` to one).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// `$ref` to a reusable request body.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Description.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Payload per media type.
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
    /// Required flag.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "is_false")]
    pub required: bool,
    /// Set when the entry was not a Request Body Object.
    #[serde(skip)]
    pub malformed: bool,
}

/// A Response Object (or a `$ref` to one).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// `$ref` to a reusable response.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Description.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Payload per media type (OAS 3.x).
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
    /// Payload schema (Swagger 2.0).
    #[serde(default, deserialize_with = "lenient_fragment", skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Set when the entry was not a Response Object.
    #[serde(skip)]
    pub malformed: bool,
}

/// A Media Type Object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Payload schema.
    #[serde(default, deserialize_with = "lenient_fragment", skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl Fragment for Parameter {
    fn placeholder() -> Self {
        Self {
            malformed: true,
            ..Self::default()
        }
    }
}

impl Fragment for RequestBody {
    fn placeholder() -> Self {
        Self {
            malformed: true,
            ..Self::default()
        }
    }
}

impl Fragment for Response {
    fn placeholder() -> Self {
        Self {
            malformed: true,
            ..Self::default()
        }
    }

    // `'204':` with nothing under it is an empty response, not a malformed one.
    fn from_fragment(raw: Value) -> Self {
        match raw {
            Value::Null => Self::default(),
            raw => serde_json::from_value(raw).unwrap_or_else(|_| Self::placeholder()),
        }
    }
}

impl Fragment for MediaType {
    fn placeholder() -> Self {
        Self {
            schema: Some(Schema::placeholder()),
        }
    }

    fn from_fragment(raw: Value) -> Self {
        match raw {
            Value::Null => Self::default(),
            raw => serde_json::from_value(raw).unwrap_or_else(|_| Self::placeholder()),
        }
    }
}

/// Responses map without specification extensions.
fn lenient_responses<'de, D>(deserializer: D) -> Result<IndexMap<String, Response>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut responses: IndexMap<String, Response> = lenient_entries(deserializer)?;
    responses.retain(|status, _| !status.starts_with("x-"));
    Ok(responses)
}

impl Document {
    /// Builds a document from an already parsed JSON tree.
    pub fn from_value(value: Value) -> AppResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI document: {}", e)))
    }

    /// Parses YAML or JSON text (JSON is a YAML subset).
    pub fn from_text(content: &str) -> AppResult<Self> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| AppError::Parse(format!("Failed to parse OpenAPI YAML: {}", e)))?;
        // Non-string mapping keys (e.g. unquoted `200:`) become strings here.
        let value = serde_json::to_value(yaml)
            .map_err(|e| AppError::Parse(format!("Failed to convert OpenAPI YAML: {}", e)))?;
        Self::from_value(value)
    }

    /// Rejects documents declaring an unsupported major version.
    /// Documents declaring no version at all are accepted.
    pub fn check_version(&self) -> AppResult<()> {
        if let Some(version) = &self.openapi {
            if !version.starts_with("3.") {
                return Err(AppError::Parse(format!(
                    "Unsupported OpenAPI version: {}. Only 3.x is supported.",
                    version
                )));
            }
        } else if let Some(version) = &self.swagger {
            if !version.starts_with("2.") {
                return Err(AppError::Parse(format!(
                    "Unsupported Swagger version: {}. Only 2.0 is supported for legacy compatibility.",
                    version
                )));
            }
        }
        Ok(())
    }

    /// Moves the declared named schemas out of the document.
    ///
    /// `components.schemas` come first; Swagger 2.0 `definitions` are appended unless a
    /// schema of the same name was already declared.
    pub fn take_schemas(&mut self) -> IndexMap<String, Schema> {
        let mut schemas = std::mem::take(&mut self.components.schemas);
        for (name, schema) in std::mem::take(&mut self.definitions) {
            schemas.entry(name).or_insert(schema);
        }
        schemas
    }

    /// Rewrites every operation into a single canonical shape.
    ///
    /// 1. `$ref` parameters, request bodies and responses are replaced by their targets.
    /// 2. Path-level parameters are merged; an operation parameter with the same
    ///    `(name, in)` overrides the path-level one.
    /// 3. Swagger 2.0 `body` parameters become a request body, `formData` parameters a
    ///    multipart object body, and response `schema`s a content entry.
    ///
    /// Unresolvable references and malformed entries are dropped with a warning.
    pub fn normalize(&mut self, diagnostics: &mut Diagnostics) {
        for rejected in std::mem::take(&mut self.paths.rejected) {
            diagnostics.warn(rejected, "malformed path entry skipped");
        }

        let lookup = ComponentLookup {
            components: &self.components,
            parameters: &self.parameters,
            responses: &self.responses,
        };
        let mut items = std::mem::take(&mut self.paths.items);

        for (path, item) in items.iter_mut() {
            let shared = lookup.parameters_of(&item.parameters, path, diagnostics);
            for (verb, op) in item.operations_mut() {
                let location = format!("{verb} {path}");
                let own = lookup.parameters_of(&op.parameters, &location, diagnostics);
                op.parameters = merge_parameters(&shared, own);

                if let Some(body) = op.request_body.take() {
                    op.request_body = lookup.request_body(body, &location, diagnostics);
                }

                let responses = std::mem::take(&mut op.responses);
                for (status, response) in responses {
                    let at = format!("{location} response {status}");
                    if let Some(resolved) = lookup.response(response, &at, diagnostics) {
                        op.responses.insert(status, resolved);
                    }
                }

                lift_swagger2(op, &self.consumes, &self.produces);
            }
            item.parameters.clear();
        }

        self.paths.items = items;
    }
}

struct ComponentLookup<'a> {
    components: &'a Components,
    parameters: &'a IndexMap<String, Parameter>,
    responses: &'a IndexMap<String, Response>,
}

impl ComponentLookup<'_> {
    fn parameters_of(
        &self,
        params: &[Parameter],
        location: &str,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Parameter> {
        params
            .iter()
            .filter_map(|p| self.parameter(p.clone(), location, diagnostics))
            .collect()
    }

    fn parameter(
        &self,
        mut param: Parameter,
        location: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<Parameter> {
        let mut hops = 0;
        while let Some(reference) = param.reference.clone() {
            let target = extract_component_name(&reference, "parameters").and_then(|name| {
                self.components
                    .parameters
                    .get(&name)
                    .or_else(|| self.parameters.get(&name))
            });
            hops += 1;
            match target {
                Some(target) if hops <= self.components.parameters.len() + self.parameters.len() => {
                    param = target.clone();
                }
                _ => {
                    diagnostics.warn(location, format!("unresolved parameter reference `{reference}`"));
                    return None;
                }
            }
        }
        if param.malformed {
            diagnostics.warn(location, "malformed parameter skipped");
            return None;
        }
        Some(param)
    }

    fn request_body(
        &self,
        mut body: RequestBody,
        location: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<RequestBody> {
        let mut hops = 0;
        while let Some(reference) = body.reference.clone() {
            let target = extract_component_name(&reference, "requestBodies")
                .and_then(|name| self.components.request_bodies.get(&name));
            hops += 1;
            match target {
                Some(target) if hops <= self.components.request_bodies.len() => {
                    body = target.clone();
                }
                _ => {
                    diagnostics.warn(location, format!("unresolved request body reference `{reference}`"));
                    return None;
                }
            }
        }
        if body.malformed {
            diagnostics.warn(location, "malformed request body skipped");
            return None;
        }
        Some(body)
    }

    fn response(
        &self,
        mut response: Response,
        location: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<Response> {
        let mut hops = 0;
        while let Some(reference) = response.reference.clone() {
            let target = extract_component_name(&reference, "responses").and_then(|name| {
                self.components
                    .responses
                    .get(&name)
                    .or_else(|| self.responses.get(&name))
            });
            hops += 1;
            match target {
                Some(target) if hops <= self.components.responses.len() + self.responses.len() => {
                    response = target.clone();
                }
                _ => {
                    diagnostics.warn(location, format!("unresolved response reference `{reference}`"));
                    return None;
                }
            }
        }
        if response.malformed {
            diagnostics.warn(location, "malformed response skipped");
            return None;
        }
        Some(response)
    }
}

/// Path-level parameters first, overridden in place by operation parameters sharing `(name, in)`.
fn merge_parameters(shared: &[Parameter], own: Vec<Parameter>) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = shared.to_vec();
    for param in own {
        match merged
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location)
        {
            Some(existing) => *existing = param,
            None => merged.push(param),
        }
    }
    merged
}

fn lift_swagger2(op: &mut Operation, doc_consumes: &[String], doc_produces: &[String]) {
    let consumes = if op.consumes.is_empty() { doc_consumes } else { &op.consumes };
    let request_media = consumes
        .first()
        .cloned()
        .unwrap_or_else(|| JSON_MEDIA_TYPE.to_string());

    let (lifted, kept): (Vec<Parameter>, Vec<Parameter>) = std::mem::take(&mut op.parameters)
        .into_iter()
        .partition(|p| matches!(p.location, ParamLocation::Body | ParamLocation::FormData));
    op.parameters = kept;

    if op.request_body.is_none() {
        if let Some(body) = lifted.iter().find(|p| p.location == ParamLocation::Body) {
            op.request_body = Some(RequestBody {
                description: body.description.clone(),
                content: IndexMap::from([(
                    request_media,
                    MediaType {
                        schema: Some(body.effective_schema()),
                    },
                )]),
                required: body.required,
                ..RequestBody::default()
            });
        } else {
            let fields: Vec<&Parameter> = lifted
                .iter()
                .filter(|p| p.location == ParamLocation::FormData)
                .collect();
            if !fields.is_empty() {
                let form = Schema {
                    schema_type: Some(SchemaType::Single("object".to_string())),
                    properties: fields
                        .iter()
                        .map(|p| (p.name.clone(), p.effective_schema()))
                        .collect(),
                    required: fields
                        .iter()
                        .filter(|p| p.required)
                        .map(|p| p.name.clone())
                        .collect(),
                    ..Schema::default()
                };
                op.request_body = Some(RequestBody {
                    content: IndexMap::from([(
                        MULTIPART_MEDIA_TYPE.to_string(),
                        MediaType { schema: Some(form) },
                    )]),
                    required: fields.iter().any(|p| p.required),
                    ..RequestBody::default()
                });
            }
        }
    }

    let produces = if op.produces.is_empty() { doc_produces } else { &op.produces };
    let response_media = produces
        .iter()
        .find(|m| m.contains("json"))
        .or_else(|| produces.first())
        .cloned()
        .unwrap_or_else(|| JSON_MEDIA_TYPE.to_string());

    for response in op.responses.values_mut() {
        if let Some(schema) = response.schema.take() {
            response
                .content
                .entry(response_media.clone())
                .or_insert(MediaType {
                    schema: Some(schema),
                });
        }
    }
}
