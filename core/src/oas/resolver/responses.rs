#![deny(missing_docs)]

//! # Response & Content Selection
//!
//! Ordering functions that pick which response and which media type an operation is
//! bound to. Both orders are explicit so they can be tested in isolation.

use crate::oas::document::{MediaType, Response};
use crate::oas::schemas::Schema;
use indexmap::IndexMap;
use serde::Serialize;

/// Closed set of payload shapes an emitter must handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// `application/json` and `*+json` media types.
    Json,
    /// `multipart/*` forms.
    Multipart,
    /// Raw bytes (`application/octet-stream` and anything unrecognized).
    OctetStream,
}

/// The media type chosen for a request or response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedContent<'a> {
    /// Declared media type key.
    pub media_type: &'a str,
    /// Payload shape.
    pub kind: ContentKind,
    /// Declared schema, if any.
    pub schema: Option<&'a Schema>,
}

/// Ranks a media type; lower wins.
///
/// Order: multipart, octet-stream, `application/json`, other `+json` types, then
/// everything else (treated as raw bytes).
pub fn classify_media_type(media_type: &str) -> (u8, ContentKind) {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .trim()
        .to_ascii_lowercase();

    if essence.starts_with("multipart/") {
        (0, ContentKind::Multipart)
    } else if essence == "application/octet-stream" {
        (1, ContentKind::OctetStream)
    } else if essence == "application/json" || essence == "text/json" {
        (2, ContentKind::Json)
    } else if essence.ends_with("+json") {
        (3, ContentKind::Json)
    } else {
        (4, ContentKind::OctetStream)
    }
}

/// Picks the highest priority media type; ties keep declaration order.
pub fn select_content(content: &IndexMap<String, MediaType>) -> Option<SelectedContent<'_>> {
    content
        .iter()
        .map(|(media_type, media)| {
            let (rank, kind) = classify_media_type(media_type);
            (
                rank,
                SelectedContent {
                    media_type: media_type.as_str(),
                    kind,
                    schema: media.schema.as_ref(),
                },
            )
        })
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, selected)| selected)
}

/// Whether `status` is a 2xx code (`200`, `204`, `2XX`).
pub fn is_success_status(status: &str) -> bool {
    status.len() == 3 && status.starts_with('2')
}

/// Picks the response an operation's return type is bound to.
///
/// Order: explicit `200`, then `201`, then the lexically smallest other 2xx,
/// then the first declared response.
pub fn select_success_response(
    responses: &IndexMap<String, Response>,
) -> Option<(&str, &Response)> {
    ["200", "201"]
        .into_iter()
        .find_map(|code| responses.get_key_value(code))
        .or_else(|| {
            responses
                .iter()
                .filter(|(status, _)| is_success_status(status))
                .min_by(|(a, _), (b, _)| a.cmp(b))
        })
        .or_else(|| responses.first())
        .map(|(status, response)| (status.as_str(), response))
}

/// Every 2xx response in declaration order.
pub fn success_responses(responses: &IndexMap<String, Response>) -> Vec<(&str, &Response)> {
    responses
        .iter()
        .filter(|(status, _)| is_success_status(status))
        .map(|(status, response)| (status.as_str(), response))
        .collect()
}
