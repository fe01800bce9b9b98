#![deny(missing_docs)]

//! # Generation Pipeline
//!
//! Drives one run from a parsed [`Document`] to an [`ApiModel`]:
//!
//! 1. Check the version and normalize operations.
//! 2. Populate the registry from components, or synthesize it from inline bodies.
//! 3. Filter operations (deprecated / path pattern).
//! 4. Prune unreachable types, only if the filter removed something.
//! 5. Build clients and types with disambiguated identifiers.

use crate::error::{AppError, AppResult};
use crate::oas::diagnostics::Diagnostics;
use crate::oas::document::Document;
use crate::oas::identifiers::NamingConvention;
use crate::oas::models::ApiModel;
use crate::oas::pruning::prune_registry;
use crate::oas::registry::SchemaRegistry;
use crate::oas::routes::build_clients;
use crate::oas::routes::filter::OperationFilter;
use crate::oas::schemas::structs::build_type_models;
use crate::oas::synthesis::{synthesize_components, SynthesisLimits, DEFAULT_MAX_SYNTHESIS_DEPTH};
use regex::Regex;

/// Emission order of [`ApiModel::types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeOrder {
    /// Registry insertion order (declaration, then synthesis order).
    #[default]
    Declaration,
    /// Sorted by registry name.
    Lexical,
}

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Drop deprecated operations.
    pub exclude_deprecated: bool,
    /// Keep only operations whose path template matches.
    pub path_filter: Option<Regex>,
    /// Remove types no retained operation reaches.
    pub tree_shaking: bool,
    /// Emission order of types.
    pub type_order: TypeOrder,
    /// Target identifier rules.
    pub naming: NamingConvention,
    /// Nesting ceiling for synthesized types.
    pub max_synthesis_depth: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            exclude_deprecated: false,
            path_filter: None,
            tree_shaking: true,
            type_order: TypeOrder::Declaration,
            naming: NamingConvention::default(),
            max_synthesis_depth: DEFAULT_MAX_SYNTHESIS_DEPTH,
        }
    }
}

impl GenerationOptions {
    /// Sets deprecated-operation exclusion.
    pub fn with_exclude_deprecated(mut self, exclude: bool) -> Self {
        self.exclude_deprecated = exclude;
        self
    }

    /// Compiles and sets the path filter.
    pub fn with_path_filter(mut self, pattern: &str) -> AppResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| AppError::InvalidFilter(e.to_string()))?;
        self.path_filter = Some(regex);
        Ok(self)
    }

    /// Enables or disables pruning.
    pub fn with_tree_shaking(mut self, enabled: bool) -> Self {
        self.tree_shaking = enabled;
        self
    }

    /// Sets the type emission order.
    pub fn with_type_order(mut self, order: TypeOrder) -> Self {
        self.type_order = order;
        self
    }

    /// Sets the naming convention.
    pub fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    /// Sets the synthesis nesting ceiling.
    pub fn with_max_synthesis_depth(mut self, depth: usize) -> Self {
        self.max_synthesis_depth = depth;
        self
    }

    fn filter(&self) -> OperationFilter<'_> {
        OperationFilter {
            exclude_deprecated: self.exclude_deprecated,
            path_filter: self.path_filter.as_ref(),
        }
    }
}

/// Parses `content` (YAML or JSON) and generates the model.
pub fn generate_from_text(content: &str, options: &GenerationOptions) -> AppResult<ApiModel> {
    generate(Document::from_text(content)?, options)
}

/// Runs the full pipeline on a document.
pub fn generate(mut document: Document, options: &GenerationOptions) -> AppResult<ApiModel> {
    let mut diagnostics = Diagnostics::new();

    // 1. Shape
    document.check_version()?;
    document.normalize(&mut diagnostics);

    // 2. Registry
    let mut registry = SchemaRegistry::from(document.take_schemas());
    if registry.is_empty() {
        let limits = SynthesisLimits {
            max_depth: options.max_synthesis_depth,
            max_attempts: options.naming.max_attempts,
        };
        registry = synthesize_components(&mut document.paths, registry, limits)?;
    }
    tracing::debug!(
        types = registry.len(),
        operations = document.paths.operation_count(),
        "registry populated"
    );

    // 3. Filter
    let removed = options.filter().apply(&mut document.paths);

    // 4. Prune
    if options.tree_shaking && removed > 0 {
        prune_registry(&mut registry, &document.paths);
    } else if options.tree_shaking {
        tracing::debug!("no operations removed, skipping tree shaking");
    }

    // 5. Build
    let clients = build_clients(
        &document.paths,
        &registry,
        &options.naming,
        &mut diagnostics,
    )?;

    let names = match options.type_order {
        TypeOrder::Declaration => registry.names().collect::<Vec<_>>(),
        TypeOrder::Lexical => registry.sorted_names(),
    };
    let types = build_type_models(&registry, &names, &options.naming, &mut diagnostics)?;

    Ok(ApiModel {
        title: document.info.title,
        version: document.info.version,
        types,
        clients,
        warnings: diagnostics.into_warnings(),
    })
}
