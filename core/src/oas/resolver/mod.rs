#![deny(missing_docs)]

//! # Resolver Module
//!
//! Logic for resolving OpenAPI fragments into canonical descriptors.
//!
//! Handles:
//! - Recursive type mapping (references, primitives, arrays, maps).
//! - Response and media-type selection.
//! - Call-signature ordering of parameters.

pub mod params;
pub mod responses;
pub mod types;

pub use params::order_parameters;
pub use responses::{
    classify_media_type, select_content, select_success_response, success_responses,
    ContentKind, SelectedContent,
};
pub use types::{resolve_known, resolve_type, resolve_type_reporting, Primitive, TypeRef};
