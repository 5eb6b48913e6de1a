//! Hybrid record resolution.
//!
//! Several published records can share a workflow, enrollment, and deadline
//! type. The record whose document subtype matches the template wins; among
//! equals the most recent `deadline_at` wins. When nothing matches the
//! subtype the most recent record of the type is used as a fallback.

use serde::Serialize;

use crate::error::StoreError;
use crate::resolver::DeadlineRecord;
use crate::types::DeadlineType;

use super::{DeadlineQuery, DeadlineStore};

/// How a record was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Document subtype matched the template.
    Exact,
    /// Most recent record of the deadline type; subtype differs.
    Fallback,
}

/// Picks the best record for `subtype` among `candidates`.
///
/// Ordering: subtype match first, then `deadline_at` descending, then id
/// for determinism.
#[must_use]
pub fn best_match<'a>(
    candidates: impl IntoIterator<Item = &'a DeadlineRecord>,
    subtype: Option<&str>,
) -> Option<(&'a DeadlineRecord, MatchKind)> {
    candidates
        .into_iter()
        .min_by(|a, b| {
            let rank = |r: &DeadlineRecord| u8::from(!r.subtype_matches(subtype));
            rank(a)
                .cmp(&rank(b))
                .then_with(|| b.deadline_at.cmp(&a.deadline_at))
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|r| {
            let kind = if r.subtype_matches(subtype) {
                MatchKind::Exact
            } else {
                MatchKind::Fallback
            };
            (r, kind)
        })
}

/// Queries `store` for published records of `deadline_type` and applies
/// [`best_match`].
///
/// # Errors
///
/// Propagates the store's [`StoreError`].
pub async fn locate(
    store: &dyn DeadlineStore,
    query: DeadlineQuery,
    deadline_type: DeadlineType,
    subtype: Option<&str>,
) -> Result<Option<(DeadlineRecord, MatchKind)>, StoreError> {
    let records = store.find_matching(&query.with_type(deadline_type)).await?;
    Ok(best_match(&records, subtype).map(|(r, kind)| (r.clone(), kind)))
}
