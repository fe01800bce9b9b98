#![deny(missing_docs)]

//! # Apigen Core
//!
//! Front-end for OpenAPI client generation: document model, type resolution,
//! implicit schema synthesis, tree shaking and identifier disambiguation.
//! Produces an emitter-neutral Intermediate Representation.

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) document model and resolution engine.
pub mod oas;

/// End-to-end generation pipeline.
pub mod generator;

pub use error::{AppError, AppResult};
pub use generator::{generate, generate_from_text, GenerationOptions, TypeOrder};
pub use oas::{
    ApiModel, ClientModel, Diagnostics, Document, NamingConvention, OperationModel, Schema,
    SchemaRegistry, TypeKind, TypeModel, TypeRef, Warning,
};
