#![deny(missing_docs)]

//! # Implicit Schema Synthesis
//!
//! Some producers inline every body schema and declare no components. This pass walks
//! every operation's request body and successful responses, registers each inline
//! object as a named schema and rewrites the inline body into a `$ref` to it.
//!
//! Naming:
//! - request body: `<base>Request`, response: `<base>Response` (`<base>Response<status>`
//!   when an operation has several successful payloads)
//! - nested inline object property: `<parent><Property>`
//! - inline array-of-objects property: `<parent><Property>Item`
//!
//! The registry is threaded through by value and handed back; nothing else is mutated
//! besides the rewritten operation bodies.

use crate::error::{AppError, AppResult};
use crate::oas::document::{MediaType, Operation, Paths};
use crate::oas::registry::SchemaRegistry;
use crate::oas::resolver::{select_content, success_responses};
use crate::oas::routes::naming::synthesized_base_name;
use crate::oas::schemas::Schema;
use heck::ToUpperCamelCase;
use indexmap::IndexMap;

/// Default nesting ceiling for synthesized types.
pub const DEFAULT_MAX_SYNTHESIS_DEPTH: usize = 64;

/// Bounds for one synthesis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisLimits {
    /// Maximum chain of nested synthesized types.
    pub max_depth: usize,
    /// Numeric suffixes tried when a synthesized name is taken.
    pub max_attempts: usize,
}

impl Default for SynthesisLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_SYNTHESIS_DEPTH,
            max_attempts: crate::oas::identifiers::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Derives named schemas from the inline bodies under `paths`.
///
/// Returns the registry extended with the synthesized entries. Fails with
/// [`AppError::SchemaCycle`] when nesting exceeds `limits.max_depth`.
pub fn synthesize_components(
    paths: &mut Paths,
    registry: SchemaRegistry,
    limits: SynthesisLimits,
) -> AppResult<SchemaRegistry> {
    let before = registry.len();
    let mut synthesizer = Synthesizer { registry, limits };

    for (path, item) in paths.items.iter_mut() {
        let shared_path = item.operations().count() > 1;
        for (verb, op) in item.operations_mut() {
            let base = synthesized_base_name(path, verb, op.operation_id.as_deref(), shared_path);
            synthesizer.operation(&base, op)?;
        }
    }

    tracing::debug!(
        synthesized = synthesizer.registry.len() - before,
        "implicit schema synthesis finished"
    );
    Ok(synthesizer.registry)
}

struct Synthesizer {
    registry: SchemaRegistry,
    limits: SynthesisLimits,
}

fn is_synthesizable(schema: &Schema) -> bool {
    schema.is_inline_object() || schema.is_array_of_inline_objects()
}

/// A `$ref` to `name` that keeps the nullability and description of the body it replaces.
fn reference_replacing(original: &Schema, name: &str) -> Schema {
    Schema {
        nullable: original.is_nullable(),
        description: original.description.clone(),
        ..Schema::reference_to(name)
    }
}

impl Synthesizer {
    fn operation(&mut self, base: &str, op: &mut Operation) -> AppResult<()> {
        if let Some(body) = op.request_body.as_mut() {
            self.lift_content(&mut body.content, &format!("{base}Request"))?;
        }

        let statuses: Vec<String> = success_responses(&op.responses)
            .into_iter()
            .filter(|(_, response)| {
                select_content(&response.content)
                    .and_then(|selected| selected.schema)
                    .is_some_and(is_synthesizable)
            })
            .map(|(status, _)| status.to_string())
            .collect();

        let several = statuses.len() > 1;
        for status in statuses {
            let hint = if several {
                format!("{base}Response{status}")
            } else {
                format!("{base}Response")
            };
            if let Some(response) = op.responses.get_mut(&status) {
                self.lift_content(&mut response.content, &hint)?;
            }
        }

        Ok(())
    }

    /// Lifts the selected media type's schema; other media types carrying the identical
    /// schema are rewritten to the same reference.
    fn lift_content(
        &mut self,
        content: &mut IndexMap<String, MediaType>,
        hint: &str,
    ) -> AppResult<()> {
        let Some(original) = select_content(content).and_then(|c| c.schema.cloned()) else {
            return Ok(());
        };

        let replacement = if original.is_inline_object() {
            let name = self.register(hint, original.clone(), &mut Vec::new(), 1)?;
            reference_replacing(&original, &name)
        } else if original.is_array_of_inline_objects() {
            let mut array = original.clone();
            if let Some(items) = array.items.as_mut() {
                let item = std::mem::take(items.as_mut());
                let name = self.register(&format!("{hint}Item"), item, &mut Vec::new(), 1)?;
                **items = Schema::reference_to(&name);
            }
            array
        } else {
            return Ok(());
        };

        for media in content.values_mut() {
            if media.schema.as_ref() == Some(&original) {
                media.schema = Some(replacement.clone());
            }
        }
        Ok(())
    }

    fn register(
        &mut self,
        hint: &str,
        mut schema: Schema,
        trail: &mut Vec<String>,
        depth: usize,
    ) -> AppResult<String> {
        if depth > self.limits.max_depth {
            return Err(AppError::SchemaCycle {
                path: trail.join("/"),
            });
        }

        // Reserve the name before descending so nested types cannot take it.
        let name = self
            .registry
            .insert_unique(hint, Schema::default(), self.limits.max_attempts)?;

        let is_root = trail.is_empty();
        if is_root {
            trail.push(name.clone());
        }
        self.lift_properties(&name, &mut schema, trail, depth)?;
        if is_root {
            trail.pop();
        }

        self.registry.replace(&name, schema);
        tracing::debug!(name = %name, "registered synthesized schema");
        Ok(name)
    }

    fn lift_properties(
        &mut self,
        parent: &str,
        schema: &mut Schema,
        trail: &mut Vec<String>,
        depth: usize,
    ) -> AppResult<()> {
        for (property, value) in schema.properties.iter_mut() {
            let stem = format!("{parent}{}", property.to_upper_camel_case());
            trail.push(property.clone());

            if value.is_inline_object() {
                let inline = std::mem::take(value);
                let nullable = inline.is_nullable();
                let description = inline.description.clone();
                let name = self.register(&stem, inline, trail, depth + 1)?;
                *value = Schema {
                    nullable,
                    description,
                    ..Schema::reference_to(&name)
                };
            } else if value.is_array_of_inline_objects() {
                if let Some(items) = value.items.as_mut() {
                    let item = std::mem::take(items.as_mut());
                    let name = self.register(&format!("{stem}Item"), item, trail, depth + 1)?;
                    **items = Schema::reference_to(&name);
                }
            }

            trail.pop();
        }
        Ok(())
    }
}
