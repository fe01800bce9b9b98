#![deny(missing_docs)]

//! # Reachability Pruning
//!
//! Mark-and-sweep over the schema registry ("tree shaking").
//!
//! 1. Seed with the types each retained operation binds directly: parameters,
//!    the selected request body content and the selected success response content.
//! 2. Expand through object properties, array items, map values, composition members
//!    and discriminator mappings until a fixed point.
//! 3. Delete every registry key that was not marked.

use crate::oas::document::Paths;
use crate::oas::registry::SchemaRegistry;
use crate::oas::resolver::{select_content, select_success_response};
use crate::oas::schemas::refs::collect_schema_refs;
use std::collections::BTreeSet;

/// Type names referenced directly by the operations under `paths`, in discovery order.
pub fn operation_seeds(paths: &Paths) -> Vec<String> {
    let mut seeds = Vec::new();

    for (_, _, op) in paths.operations() {
        for param in &op.parameters {
            collect_schema_refs(&param.effective_schema(), &mut seeds);
        }

        if let Some(schema) = op
            .request_body
            .as_ref()
            .and_then(|body| select_content(&body.content))
            .and_then(|selected| selected.schema)
        {
            collect_schema_refs(schema, &mut seeds);
        }

        if let Some(schema) = select_success_response(&op.responses)
            .and_then(|(_, response)| select_content(&response.content))
            .and_then(|selected| selected.schema)
        {
            collect_schema_refs(schema, &mut seeds);
        }
    }

    seeds
}

/// Transitive closure of `seeds` over the registry. Seeds naming no registry entry
/// are kept in the result but not expanded.
pub fn reachable_types(
    registry: &SchemaRegistry,
    seeds: impl IntoIterator<Item = String>,
) -> BTreeSet<String> {
    let mut visited = BTreeSet::new();
    let mut frontier: Vec<String> = seeds.into_iter().collect();

    while let Some(name) = frontier.pop() {
        if !visited.insert(name.clone()) {
            continue;
        }
        if let Some(schema) = registry.get(&name) {
            let mut found = Vec::new();
            collect_schema_refs(schema, &mut found);
            frontier.extend(found.into_iter().filter(|n| !visited.contains(n)));
        }
    }

    visited
}

/// Removes every entry not reachable from the operations under `paths`.
/// Returns the removed names in registry order.
pub fn prune_registry(registry: &mut SchemaRegistry, paths: &Paths) -> Vec<String> {
    let keep = reachable_types(registry, operation_seeds(paths));
    let removed: Vec<String> = registry
        .names()
        .filter(|name| !keep.contains(*name))
        .map(str::to_string)
        .collect();

    registry.retain(|name, _| keep.contains(name));
    tracing::debug!(
        kept = registry.len(),
        removed = removed.len(),
        "pruned unreachable schemas"
    );
    removed
}
