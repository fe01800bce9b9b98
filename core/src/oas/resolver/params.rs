#![deny(missing_docs)]

//! # Parameter Ordering
//!
//! Generated call signatures list required parameters first and, among required ones,
//! path parameters first. The sort is stable so declaration order survives otherwise.

use crate::oas::document::{ParamLocation, Parameter};

/// Sort key: `(optional, not-in-path)`; `false` sorts first.
pub fn signature_rank(required: bool, location: ParamLocation) -> (bool, bool) {
    (!required, location != ParamLocation::Path)
}

/// Returns the parameters in call-signature order.
pub fn order_parameters(params: &[Parameter]) -> Vec<&Parameter> {
    let mut ordered: Vec<&Parameter> = params.iter().collect();
    ordered.sort_by_key(|p| signature_rank(p.is_required(), p.location));
    ordered
}
