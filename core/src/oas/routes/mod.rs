#![deny(missing_docs)]

//! # Routes Module
//!
//! Turns the retained operations into client groups of [`OperationModel`]s.
//!
//! - **filter**: deprecated / path-pattern exclusion.
//! - **naming**: raw name derivation from paths, verbs, operation ids and tags.
//!
//! Scopes: one method scope per client, one identifier scope per operation
//! (parameters and multipart parts share it).

pub mod filter;
pub mod naming;

use crate::error::AppResult;
use crate::oas::diagnostics::Diagnostics;
use crate::oas::document::{Operation, Paths, Verb};
use crate::oas::identifiers::{NameScope, NamingConvention};
use crate::oas::models::{
    BodyModel, ClientModel, OperationModel, ParamModel, PartModel, Payload, ResponseModel,
};
use crate::oas::registry::SchemaRegistry;
use crate::oas::resolver::{
    order_parameters, resolve_known, select_content, select_success_response,
    ContentKind, SelectedContent, TypeRef,
};
use crate::oas::routes::naming::{client_name, method_base_name};
use indexmap::IndexMap;

/// Groups operations by client and resolves their bindings.
pub fn build_clients(
    paths: &Paths,
    registry: &SchemaRegistry,
    convention: &NamingConvention,
    diagnostics: &mut Diagnostics,
) -> AppResult<Vec<ClientModel>> {
    let mut groups: IndexMap<String, (NameScope<'_>, Vec<OperationModel>)> = IndexMap::new();

    for (path, verb, op) in paths.operations() {
        let client = client_name(&op.tags);
        let (methods, operations) = groups.entry(client.clone()).or_insert_with(|| {
            (
                NameScope::new(format!("client {client}"), convention),
                Vec::new(),
            )
        });

        let raw = convention
            .method_case
            .apply(&method_base_name(path, verb, op.operation_id.as_deref()));
        let method_name = methods.claim(&raw)?;

        operations.push(build_operation(
            path,
            verb,
            op,
            method_name,
            registry,
            convention,
            diagnostics,
        )?);
    }

    Ok(groups
        .into_iter()
        .map(|(name, (_, operations))| ClientModel {
            name: convention.escape(&name),
            operations,
        })
        .collect())
}

/// Resolves one operation.
pub fn build_operation(
    path: &str,
    verb: Verb,
    op: &Operation,
    method_name: String,
    registry: &SchemaRegistry,
    convention: &NamingConvention,
    diagnostics: &mut Diagnostics,
) -> AppResult<OperationModel> {
    let location = format!("{verb} {path}");
    let mut idents = NameScope::new(format!("operation {location}"), convention);

    let mut params = Vec::with_capacity(op.parameters.len());
    for param in order_parameters(&op.parameters) {
        params.push(ParamModel {
            name: param.name.clone(),
            ident: idents.claim(&convention.member_case.apply(&param.name))?,
            location: param.location,
            required: param.is_required(),
            ty: resolve_known(
                &param.effective_schema(),
                registry,
                &format!("{location} parameter {}", param.name),
                diagnostics,
            ),
        });
    }

    let body = match op.request_body.as_ref() {
        Some(body) => match select_content(&body.content) {
            Some(selected) => Some(BodyModel {
                required: body.required,
                payload: build_payload(
                    selected,
                    &format!("{location} request body"),
                    registry,
                    &mut idents,
                    convention,
                    diagnostics,
                )?,
            }),
            None => None,
        },
        None => None,
    };

    let response = match select_success_response(&op.responses) {
        Some((status, response)) => {
            let mut response_idents = NameScope::new(format!("response {location}"), convention);
            let payload = select_content(&response.content)
                .map(|selected| {
                    build_payload(
                        selected,
                        &format!("{location} response {status}"),
                        registry,
                        &mut response_idents,
                        convention,
                        diagnostics,
                    )
                })
                .transpose()?;
            Some(ResponseModel {
                status: status.to_string(),
                payload,
            })
        }
        None => None,
    };

    Ok(OperationModel {
        path: path.to_string(),
        verb,
        method_name,
        operation_id: op.operation_id.clone(),
        summary: op.summary.clone(),
        tags: op.tags.clone(),
        deprecated: op.deprecated,
        params,
        body,
        response,
    })
}

fn build_payload(
    selected: SelectedContent<'_>,
    location: &str,
    registry: &SchemaRegistry,
    idents: &mut NameScope<'_>,
    convention: &NamingConvention,
    diagnostics: &mut Diagnostics,
) -> AppResult<Payload> {
    let media_type = selected.media_type.to_string();

    match selected.kind {
        ContentKind::Json => Ok(Payload::Json {
            media_type,
            ty: selected.schema.map_or(TypeRef::Untyped, |schema| {
                resolve_known(schema, registry, location, diagnostics)
            }),
        }),
        ContentKind::Multipart => {
            // The form may have been lifted into the registry.
            let form = selected.schema.and_then(|schema| match schema.reference_name() {
                Some(name) => {
                    let target = registry.get(&name);
                    if target.is_none() {
                        diagnostics.warn(location, format!("unknown form type `{name}`, no parts"));
                    }
                    target
                }
                None => Some(schema),
            });

            let mut parts = Vec::new();
            if let Some(form) = form {
                for (key, value) in &form.properties {
                    parts.push(PartModel {
                        name: key.clone(),
                        ident: idents.claim(&convention.member_case.apply(key))?,
                        ty: resolve_known(
                            value,
                            registry,
                            &format!("{location} part {key}"),
                            diagnostics,
                        ),
                        required: form.is_required(key),
                    });
                }
            }
            Ok(Payload::Multipart { media_type, parts })
        }
        ContentKind::OctetStream => Ok(Payload::OctetStream { media_type }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::{Document, ParamLocation};

    fn clients(yaml: &str) -> (Vec<ClientModel>, Diagnostics) {
        let mut doc = Document::from_text(yaml).unwrap();
        let mut diagnostics = Diagnostics::new();
        doc.normalize(&mut diagnostics);
        let registry = SchemaRegistry::from(doc.take_schemas());
        let clients = build_clients(
            &doc.paths,
            &registry,
            &NamingConvention::default(),
            &mut diagnostics,
        )
        .unwrap();
        (clients, diagnostics)
    }

    #[test]
    fn test_grouping_and_method_names() {
        let yaml = r#"
paths:
  /pets:
    get:
      tags: [pets]
      operationId: listPets
      responses: {}
    post:
      tags: [pets]
      operationId: getListPets
      responses: {}
  /pets/{id}:
    get:
      tags: [pets]
      operationId: listPetsAsync
      responses: {}
  /health:
    get:
      responses: {}
"#;
        let (clients, _) = clients(yaml);
        let names: Vec<&str> = clients.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Pets", "Default"]);

        let methods: Vec<&str> = clients[0]
            .operations
            .iter()
            .map(|o| o.method_name.as_str())
            .collect();
        assert_eq!(methods, vec!["get_list_pets", "post_get_list_pets", "get_list_pets2"]);
        assert_eq!(clients[1].operations[0].method_name, "get_health");
    }

    #[test]
    fn test_parameter_order_and_types() {
        let yaml = r#"
paths:
  /stores/{storeId}/items:
    get:
      parameters:
        - { name: page, in: query, schema: { type: integer, format: int32 } }
        - { name: X-Trace, in: header, required: true, schema: { type: string } }
        - { name: storeId, in: path, required: true, schema: { type: string, format: uuid } }
        - { name: ids, in: query, schema: { type: array, items: { type: integer, format: int64 } } }
      responses:
        '201':
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Item' }
        '200':
          content:
            application/json:
              schema: { type: array, items: { $ref: '#/components/schemas/Item' } }
components:
  schemas:
    Item: { type: object }
"#;
        let (clients, diagnostics) = clients(yaml);
        let op = &clients[0].operations[0];

        let params: Vec<(&str, &str, String)> = op
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.ident.as_str(), p.ty.to_string()))
            .collect();
        assert_eq!(
            params,
            vec![
                ("storeId", "store_id", "uuid".to_string()),
                ("X-Trace", "x_trace", "string".to_string()),
                ("page", "page", "int32".to_string()),
                ("ids", "ids", "array<int64>".to_string()),
            ]
        );
        assert_eq!(op.params[0].location, ParamLocation::Path);

        let response = op.response.as_ref().unwrap();
        assert_eq!(response.status, "200");
        assert_eq!(
            response.payload.as_ref().unwrap().types()[0].to_string(),
            "array<Item>"
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_multipart_and_octet_stream_bodies() {
        let yaml = r#"
paths:
  /upload:
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema: { type: string }
          multipart/form-data:
            schema:
              type: object
              required: [file]
              properties:
                file: { type: string, format: binary }
                page: { type: integer }
      parameters:
        - { name: page, in: query, schema: { type: integer } }
      responses:
        '200':
          content:
            application/octet-stream: {}
"#;
        let (clients, _) = clients(yaml);
        let op = &clients[0].operations[0];

        let body = op.body.as_ref().unwrap();
        assert!(body.required);
        match &body.payload {
            Payload::Multipart { media_type, parts } => {
                assert_eq!(media_type, "multipart/form-data");
                let idents: Vec<&str> = parts.iter().map(|p| p.ident.as_str()).collect();
                assert_eq!(idents, vec!["file", "page2"]);
                assert_eq!(parts[0].ty.to_string(), "binary");
                assert!(parts[0].required);
            }
            other => panic!("expected multipart, got {other:?}"),
        }

        let payload = op.response.as_ref().unwrap().payload.as_ref().unwrap();
        assert_eq!(payload.kind(), ContentKind::OctetStream);
    }

    #[test]
    fn test_unresolved_inline_body_is_a_warning() {
        let yaml = r#"
paths:
  /things:
    put:
      requestBody:
        content:
          application/json:
            schema: { properties: { a: { type: string } } }
      responses: {}
components:
  schemas:
    Unrelated: { type: string }
"#;
        let (clients, diagnostics) = clients(yaml);
        let body = clients[0].operations[0].body.as_ref().unwrap();
        assert_eq!(body.payload.types()[0], &TypeRef::Untyped);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warnings()[0].location, "PUT /things request body");
    }

    #[test]
    fn test_missing_component_is_a_warning() {
        let yaml = r#"
paths:
  /things/{id}:
    get:
      parameters:
        - { name: id, in: path, schema: { $ref: '#/components/schemas/ThingId' } }
      responses:
        '200':
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Missing' }
    post:
      requestBody:
        content:
          multipart/form-data:
            schema: { $ref: '#/components/schemas/Form' }
      responses: {}
components:
  schemas:
    Thing: { type: object }
"#;
        let (clients, diagnostics) = clients(yaml);
        let get = &clients[0].operations[0];
        assert_eq!(get.params[0].ty, TypeRef::Untyped);
        let response = get.response.as_ref().unwrap().payload.as_ref().unwrap();
        assert_eq!(response.types()[0], &TypeRef::Untyped);

        let post = &clients[0].operations[1];
        match &post.body.as_ref().unwrap().payload {
            Payload::Multipart { parts, .. } => assert!(parts.is_empty()),
            other => panic!("expected multipart, got {other:?}"),
        }

        let found: Vec<(&str, &str)> = diagnostics
            .warnings()
            .iter()
            .map(|w| (w.location.as_str(), w.message.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("GET /things/{id} parameter id", "unknown type `ThingId`, using `any`"),
                ("GET /things/{id} response 200", "unknown type `Missing`, using `any`"),
                ("POST /things/{id} request body", "unknown form type `Form`, no parts"),
            ]
        );
    }
}
