#![deny(missing_docs)]

//! # Type Models
//!
//! Turns registry entries into [`TypeModel`]s: objects (with `allOf` flattening of
//! inline members), enums and aliases. Property identifiers are disambiguated per type.
//! Names the registry does not hold degrade to `any` (or are dropped from parents and
//! discriminator cases) with a warning.

use crate::error::AppResult;
use crate::oas::diagnostics::Diagnostics;
use crate::oas::identifiers::{NameScope, NamingConvention};
use crate::oas::models::{DiscriminatorCase, DiscriminatorModel, PropertyModel, TypeKind, TypeModel};
use crate::oas::registry::SchemaRegistry;
use crate::oas::resolver::{resolve_known, resolve_type};
use crate::oas::schemas::enums::model_enum;
use crate::oas::schemas::refs::extract_ref_name;
use crate::oas::schemas::{Schema, SchemaKind};

/// Builds type models for `names`, in that order. Type identifiers share one scope,
/// claimed in the same order so the result is reproducible.
pub fn build_type_models(
    registry: &SchemaRegistry,
    names: &[&str],
    convention: &NamingConvention,
    diagnostics: &mut Diagnostics,
) -> AppResult<Vec<TypeModel>> {
    let mut type_scope = NameScope::new("types", convention);
    let mut models = Vec::with_capacity(names.len());

    for name in names {
        if let Some(schema) = registry.get(name) {
            models.push(build_type_model(
                name,
                schema,
                registry,
                &mut type_scope,
                convention,
                diagnostics,
            )?);
        }
    }

    Ok(models)
}

/// Whether a named schema becomes a record type.
fn is_object_like(schema: &Schema) -> bool {
    schema.reference.is_none()
        && (!schema.properties.is_empty()
            || !schema.all_of.is_empty()
            || !schema.one_of.is_empty()
            || !schema.any_of.is_empty()
            || schema.discriminator.is_some()
            || (schema.type_name() == Some("object") && schema.kind() == SchemaKind::Untyped))
}

fn build_type_model(
    name: &str,
    schema: &Schema,
    registry: &SchemaRegistry,
    type_scope: &mut NameScope<'_>,
    convention: &NamingConvention,
    diagnostics: &mut Diagnostics,
) -> AppResult<TypeModel> {
    let ident = type_scope.claim(&convention.type_case.apply(name))?;

    let kind = if let Some(values) = schema.enum_values.as_deref() {
        TypeKind::Enum {
            ty: resolve_type(schema),
            model: model_enum(
                name,
                values,
                schema.enum_names.as_deref(),
                schema.enum_flags.as_ref(),
                convention,
                diagnostics,
            ),
        }
    } else if is_object_like(schema) {
        object_kind(name, &ident, schema, registry, convention, diagnostics)?
    } else {
        TypeKind::Alias {
            target: resolve_known(schema, registry, name, diagnostics),
        }
    };

    Ok(TypeModel {
        name: name.to_string(),
        ident,
        description: schema.description.clone(),
        deprecated: schema.deprecated,
        kind,
    })
}

fn object_kind(
    name: &str,
    ident: &str,
    schema: &Schema,
    registry: &SchemaRegistry,
    convention: &NamingConvention,
    diagnostics: &mut Diagnostics,
) -> AppResult<TypeKind> {
    let mut scope = NameScope::new(format!("type {name}"), convention);
    let mut properties: Vec<PropertyModel> = Vec::new();
    let mut parents = Vec::new();

    // Own properties first, then those of inline `allOf` members; `$ref` members are parents.
    let mut sources = vec![schema];
    for member in &schema.all_of {
        match member.reference_name() {
            Some(parent) if registry.contains(&parent) => parents.push(parent),
            Some(parent) => {
                diagnostics.warn(name, format!("unknown parent type `{parent}` ignored"));
            }
            None => sources.push(member),
        }
    }

    for source in sources {
        for (key, value) in &source.properties {
            if properties.iter().any(|p| p.name == *key) {
                continue;
            }

            let mut cased = convention.member_case.apply(key);
            if cased == ident {
                cased.push_str("Property");
            }

            properties.push(PropertyModel {
                name: key.clone(),
                ident: scope.claim(&cased)?,
                ty: resolve_known(value, registry, &format!("{name}.{key}"), diagnostics),
                required: source.is_required(key) || schema.is_required(key),
                nullable: value.is_nullable(),
                description: value.description.clone(),
                deprecated: value.deprecated,
            });
        }
    }

    let discriminator = schema.discriminator.as_ref().map(|d| {
        let mut mapping = Vec::with_capacity(d.mapping.len());
        for (value, target) in &d.mapping {
            let type_name = extract_ref_name(target);
            if registry.contains(&type_name) {
                mapping.push(DiscriminatorCase {
                    value: value.clone(),
                    type_name,
                });
            } else {
                diagnostics.warn(
                    format!("{name}.{}", d.property_name),
                    format!("discriminator value `{value}` maps to unknown type `{type_name}`, dropped"),
                );
            }
        }
        DiscriminatorModel {
            property_name: d.property_name.clone(),
            mapping,
        }
    });

    Ok(TypeKind::Object {
        properties,
        parents,
        discriminator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::identifiers::Case;
    use crate::oas::resolver::TypeRef;
    use indexmap::IndexMap;
    use serde_json::json;

    fn registry(value: serde_json::Value) -> SchemaRegistry {
        let entries: IndexMap<String, Schema> = serde_json::from_value(value).unwrap();
        SchemaRegistry::from(entries)
    }

    fn build(registry: &SchemaRegistry, convention: &NamingConvention) -> (Vec<TypeModel>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let names: Vec<&str> = registry.names().collect();
        let models = build_type_models(registry, &names, convention, &mut diagnostics).unwrap();
        (models, diagnostics)
    }

    #[test]
    fn test_object_properties_are_disambiguated() {
        let registry = registry(json!({
            "Pet": {
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": { "type": "integer", "format": "int64" },
                    "type": { "type": "string" },
                    "petName": { "type": "string", "nullable": true },
                    "pet_name": { "type": "string" },
                    "owner": { "$ref": "#/components/schemas/User" }
                }
            },
            "User": { "type": "object" }
        }));
        let (models, diagnostics) = build(&registry, &NamingConvention::default());

        let TypeKind::Object { properties, .. } = &models[0].kind else {
            panic!("expected object");
        };
        let idents: Vec<&str> = properties.iter().map(|p| p.ident.as_str()).collect();
        assert_eq!(idents, vec!["id", "type_", "pet_name", "pet_name2", "owner"]);
        assert!(properties[0].required);
        assert!(properties[2].nullable);
        assert_eq!(properties[0].ty.to_string(), "int64");
        assert_eq!(properties[4].ty.to_string(), "User");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_property_named_like_type_gets_suffix() {
        let convention = NamingConvention {
            member_case: Case::Pascal,
            ..NamingConvention::default()
        };
        let registry = registry(json!({
            "Order": { "properties": { "order": { "type": "string" } } }
        }));
        let (models, _) = build(&registry, &convention);

        let TypeKind::Object { properties, .. } = &models[0].kind else {
            panic!("expected object");
        };
        assert_eq!(properties[0].ident, "OrderProperty");
        assert_eq!(properties[0].name, "order");
    }

    #[test]
    fn test_enum_alias_and_gap_warning() {
        let registry = registry(json!({
            "Color": { "type": "string", "enum": ["red", null, "green"] },
            "Ids": { "type": "array", "items": { "type": "integer" } },
            "Blob": { "type": "object", "additionalProperties": true },
            "Broken": { "type": "object", "properties": { "inline": { "properties": { "a": {} } } } }
        }));
        let (models, diagnostics) = build(&registry, &NamingConvention::default());

        match &models[0].kind {
            TypeKind::Enum { ty, model } => {
                assert_eq!(ty.to_string(), "string");
                assert_eq!(model.cases.len(), 2);
            }
            other => panic!("expected enum, got {other:?}"),
        }
        assert!(matches!(&models[1].kind, TypeKind::Alias { target } if target.to_string() == "array<integer>"));
        assert!(matches!(&models[2].kind, TypeKind::Alias { target } if target.to_string() == "map<string, any>"));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warnings()[0].location, "Broken.inline");
    }

    #[test]
    fn test_all_of_and_discriminator() {
        let registry = registry(json!({
            "Cat": {
                "allOf": [
                    { "$ref": "#/components/schemas/Animal" },
                    { "properties": { "lives": { "type": "integer" } }, "required": ["lives"] }
                ],
                "properties": { "name": { "type": "string" } }
            },
            "Animal": {
                "type": "object",
                "properties": { "kind": { "type": "string" } },
                "discriminator": {
                    "propertyName": "kind",
                    "mapping": { "cat": "#/components/schemas/Cat" }
                }
            }
        }));
        let (models, _) = build(&registry, &NamingConvention::default());

        let TypeKind::Object { properties, parents, .. } = &models[0].kind else {
            panic!("expected object");
        };
        assert_eq!(parents, &vec!["Animal".to_string()]);
        let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "lives"]);
        assert!(properties[1].required);

        let TypeKind::Object { discriminator, .. } = &models[1].kind else {
            panic!("expected object");
        };
        let discriminator = discriminator.as_ref().unwrap();
        assert_eq!(discriminator.property_name, "kind");
        assert_eq!(
            discriminator.mapping,
            vec![DiscriminatorCase {
                value: "cat".into(),
                type_name: "Cat".into()
            }]
        );
    }

    #[test]
    fn test_unknown_references_degrade() {
        let registry = registry(json!({
            "Cat": {
                "allOf": [{ "$ref": "#/components/schemas/Animal" }],
                "properties": {
                    "owner": { "$ref": "#/components/schemas/Owner" },
                    "toys": { "type": "array", "items": { "$ref": "#/components/schemas/Toy" } },
                    "kind": { "type": "string" }
                },
                "discriminator": {
                    "propertyName": "kind",
                    "mapping": { "cat": "Cat", "dog": "#/components/schemas/Dog" }
                }
            },
            "Pets": { "$ref": "#/components/schemas/Pet" }
        }));
        let (models, diagnostics) = build(&registry, &NamingConvention::default());

        let TypeKind::Object { properties, parents, discriminator } = &models[0].kind else {
            panic!("expected object");
        };
        assert!(parents.is_empty());
        assert_eq!(properties[0].ty, TypeRef::Untyped);
        assert_eq!(properties[1].ty.to_string(), "array<any>");
        assert_eq!(
            discriminator.as_ref().unwrap().mapping,
            vec![DiscriminatorCase {
                value: "cat".into(),
                type_name: "Cat".into()
            }]
        );
        assert!(matches!(&models[1].kind, TypeKind::Alias { target } if target.is_untyped()));

        let locations: Vec<&str> = diagnostics
            .warnings()
            .iter()
            .map(|w| w.location.as_str())
            .collect();
        assert_eq!(locations, vec!["Cat", "Cat.owner", "Cat.toys", "Cat.kind", "Pets"]);
    }

    #[test]
    fn test_boolean_property_schema_is_reported() {
        let registry = registry(json!({
            "Pet": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "name": { "type": "string" },
                    "extra": true
                }
            }
        }));
        let (models, diagnostics) = build(&registry, &NamingConvention::default());

        let TypeKind::Object { properties, .. } = &models[0].kind else {
            panic!("expected object");
        };
        let found: Vec<(&str, String)> = properties
            .iter()
            .map(|p| (p.name.as_str(), p.ty.to_string()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("id", "integer".to_string()),
                ("name", "string".to_string()),
                ("extra", "any".to_string()),
            ]
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warnings()[0].location, "Pet.extra");
    }

    #[test]
    fn test_type_identifiers_are_unique() {
        let registry = registry(json!({
            "pet": { "type": "object" },
            "Pet": { "type": "object" },
            "Self": { "type": "string" }
        }));
        let (models, _) = build(&registry, &NamingConvention::default());
        let idents: Vec<&str> = models.iter().map(|m| m.ident.as_str()).collect();
        assert_eq!(idents, vec!["Pet", "Pet2", "Self_"]);
    }
}
