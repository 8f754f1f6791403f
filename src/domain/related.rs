//! Related document ranking

use super::tree::{DocumentId, DocumentTree};
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Default number of related documents kept per document
pub const DEFAULT_RELATED_LIMIT: usize = 6;

/// Rank the documents related to `id`.
///
/// Candidates are all other documents sharing at least one tag of `id` that
/// is not in `ignore_tags`. They are ordered by the number of tags shared
/// with `id` (all tags count here), then by date, newest first; remaining
/// ties keep insertion order.
pub fn rank_related(
    tree: &DocumentTree,
    id: DocumentId,
    limit: usize,
    ignore_tags: &BTreeSet<String>,
) -> Vec<DocumentId> {
    let Some(document) = tree.get(id) else {
        return Vec::new();
    };

    let candidates: BTreeSet<DocumentId> = document
        .tags
        .iter()
        .filter(|tag| !ignore_tags.contains(*tag))
        .flat_map(|tag| tree.tagged_ids(tag).iter().copied())
        .filter(|candidate| *candidate != id)
        .collect();

    let mut ranked: Vec<(usize, DocumentId)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let other = tree.get(candidate)?;
            Some((document.tags.intersection(&other.tags).count(), candidate))
        })
        .collect();

    ranked.sort_by_key(|(shared, candidate)| {
        let date = tree.get(*candidate).map(|doc| doc.date);
        (Reverse(*shared), Reverse(date))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate)
        .collect()
}
