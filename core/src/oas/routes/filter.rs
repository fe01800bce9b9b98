#![deny(missing_docs)]

//! # Operation Filtering
//!
//! Drops deprecated operations and operations whose path does not match a pattern.
//! Applied before reachability pruning.

use crate::oas::document::{Operation, Paths, Verb};
use regex::Regex;

/// Which operations survive generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationFilter<'a> {
    /// Drop operations marked `deprecated`.
    pub exclude_deprecated: bool,
    /// Keep only operations whose path template matches.
    pub path_filter: Option<&'a Regex>,
}

impl OperationFilter<'_> {
    /// Whether any criterion is set.
    pub fn is_active(&self) -> bool {
        self.exclude_deprecated || self.path_filter.is_some()
    }

    /// Whether the operation at `path` is kept.
    pub fn retains(&self, path: &str, op: &Operation) -> bool {
        if self.exclude_deprecated && op.deprecated {
            return false;
        }
        self.path_filter.map_or(true, |re| re.is_match(path))
    }

    /// Removes rejected operations (and path items left empty). Returns how many
    /// operations were removed.
    pub fn apply(&self, paths: &mut Paths) -> usize {
        if !self.is_active() {
            return 0;
        }

        let mut removed = 0;
        for (path, item) in paths.items.iter_mut() {
            for verb in Verb::ALL {
                let slot = item.slot_mut(verb);
                if slot.as_ref().is_some_and(|op| !self.retains(path, op)) {
                    *slot = None;
                    removed += 1;
                    tracing::trace!(%verb, path = %path, "operation filtered out");
                }
            }
        }
        paths.items.retain(|_, item| item.operations().next().is_some());

        tracing::debug!(removed, "operation filter applied");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::Document;

    const API: &str = r#"
paths:
  /pets:
    get: { responses: {} }
    post: { deprecated: true, responses: {} }
  /legacy:
    post: { deprecated: true, responses: {} }
  /stores/{id}:
    get: { responses: {} }
"#;

    fn paths() -> Paths {
        Document::from_text(API).unwrap().paths
    }

    #[test]
    fn test_inactive_filter_removes_nothing() {
        let mut paths = paths();
        assert_eq!(OperationFilter::default().apply(&mut paths), 0);
        assert_eq!(paths.operation_count(), 4);
    }

    #[test]
    fn test_exclude_deprecated() {
        let mut paths = paths();
        let filter = OperationFilter {
            exclude_deprecated: true,
            path_filter: None,
        };
        assert_eq!(filter.apply(&mut paths), 2);
        assert_eq!(
            paths.items.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["/pets", "/stores/{id}"]
        );
        assert!(paths.items["/pets"].post.is_none());
    }

    #[test]
    fn test_path_pattern() {
        let mut paths = paths();
        let re = Regex::new("^/pets").unwrap();
        let filter = OperationFilter {
            exclude_deprecated: false,
            path_filter: Some(&re),
        };
        assert_eq!(filter.apply(&mut paths), 2);
        assert_eq!(paths.operation_count(), 2);
    }
}
