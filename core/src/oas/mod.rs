#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **document**: typed document model and operation normalization.
//! - **schemas**: schema model, reference helpers, enum and type modeling.
//! - **resolver**: canonical type mapping, response/content selection, parameter order.
//! - **registry**: the named-type symbol table.
//! - **synthesis**: lifting inline bodies into named types.
//! - **pruning**: reachability-based removal of unused types.
//! - **identifiers**: scope-aware identifier disambiguation.
//! - **routes**: filtering and operation/client building.
//! - **models**: the Intermediate Representation.

pub mod diagnostics;
pub mod document;
pub mod identifiers;
pub mod models;
pub mod pruning;
pub(crate) mod ref_utils;
pub mod registry;
pub mod resolver;
pub mod routes;
pub mod schemas;
pub mod synthesis;

pub use diagnostics::{Diagnostics, Warning};
pub use document::{Document, Verb};
pub use identifiers::{Case, KeywordEscape, NameScope, NamingConvention};
pub use models::{ApiModel, ClientModel, OperationModel, TypeKind, TypeModel};
pub use registry::SchemaRegistry;
pub use resolver::{resolve_type, TypeRef};
pub use schemas::Schema;
