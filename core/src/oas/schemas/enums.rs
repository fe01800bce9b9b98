#![deny(missing_docs)]

//! # Enum Modeling
//!
//! Builds ordered, de-duplicated `(name, value)` cases from an `enum` value list,
//! an optional parallel name list (`x-enumNames`) and an optional flag layout.

use crate::oas::diagnostics::Diagnostics;
use crate::oas::identifiers::{NameScope, NamingConvention};
use crate::oas::schemas::EnumFlags;
use serde::Serialize;
use serde_json::Value;

/// One generated enum case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumCase {
    /// Identifier for the case.
    pub name: String,
    /// The label it was derived from (name list entry or value text).
    pub label: String,
    /// The original document value.
    pub value: Value,
    /// Assigned bit value in flag layout. `None` for plain enums and combination markers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<u64>,
    /// A documented combination of other flags; it gets no bit of its own.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_combination: bool,
}

/// An enum ready for emission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumModel {
    /// Cases in document order.
    pub cases: Vec<EnumCase>,
    /// Whether the cases use a flag layout.
    pub is_flags: bool,
    /// Whether combined flags serialize as a joined string.
    pub combine_as_string: bool,
}

/// Builds the case list for the enum `owner`.
///
/// `null` entries are skipped (nullable-enum encoding). Names come from `names` when
/// present, else from the value text, and pass through a per-enum [`NameScope`]. A case
/// whose identifier is already taken is dropped silently; the first occurrence wins.
pub fn model_enum(
    owner: &str,
    values: &[Value],
    names: Option<&[String]>,
    flags: Option<&EnumFlags>,
    convention: &NamingConvention,
    diagnostics: &mut Diagnostics,
) -> EnumModel {
    let mut scope = NameScope::new(format!("enum {owner}"), convention);
    let mut cases = Vec::with_capacity(values.len());
    let mut assigned = 0usize;

    if let Some(names) = names {
        if names.len() < values.len() {
            diagnostics.warn(
                owner,
                format!(
                    "enum has {} values but only {} names; remaining cases are named after their values",
                    values.len(),
                    names.len()
                ),
            );
        }
    }

    for (index, value) in values.iter().enumerate() {
        if value.is_null() {
            continue;
        }

        let label = names
            .and_then(|n| n.get(index))
            .cloned()
            .unwrap_or_else(|| value_label(value));

        let cased = convention.variant_case.apply(&spell_numeric(&label));
        let cased = if cased.is_empty() { label.clone() } else { cased };

        let Some(name) = scope.claim_exact(&cased) else {
            continue;
        };

        if name != cased {
            diagnostics.warn(
                owner,
                format!("enum value '{label}' is not a valid identifier and was renamed to '{name}'"),
            );
        }

        let is_combination = flags
            .filter(|f| !f.separator.is_empty())
            .is_some_and(|f| label.contains(&f.separator) || name.contains(&f.separator));

        let flag = match flags {
            Some(_) if !is_combination => {
                let bit = if assigned == 0 {
                    Some(0)
                } else {
                    1u64.checked_shl((assigned - 1) as u32)
                };
                assigned += 1;
                if bit.is_none() {
                    diagnostics.warn(owner, format!("flag '{name}' does not fit in 64 bits"));
                }
                bit
            }
            _ => None,
        };

        cases.push(EnumCase {
            name,
            label,
            value: value.clone(),
            flag,
            is_combination,
        });
    }

    EnumModel {
        cases,
        is_flags: flags.is_some(),
        combine_as_string: flags.is_some_and(|f| f.combine_as_string),
    }
}

/// Numeric labels keep their sign and decimal point as words, so `-1` and `1`
/// (or `1.5` and `15`) stay distinct after casing.
fn spell_numeric(label: &str) -> String {
    if label.parse::<f64>().is_err() {
        return label.to_string();
    }
    let mut spelled = String::with_capacity(label.len() + 8);
    for c in label.chars() {
        match c {
            '-' => spelled.push_str(" minus "),
            '+' => spelled.push_str(" plus "),
            '.' => spelled.push_str(" point "),
            c => spelled.push(c),
        }
    }
    spelled
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
