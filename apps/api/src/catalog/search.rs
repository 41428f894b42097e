use serde::Serialize;

use crate::catalog::text::fold_for_search;
use crate::catalog::Catalog;
use crate::models::catalog::PlantRecord;

/// Queries shorter than this (after trimming and folding) match nothing.
pub const MIN_QUERY_CHARS: usize = 2;
pub const DEFAULT_SEARCH_LIMIT: usize = 30;

const PREFIX_SCORE: u32 = 3;
const SUBSTRING_SCORE: u32 = 1;

/// Precomputed haystack for one dataset record.
#[derive(Debug, Clone)]
pub(crate) struct SearchKey {
    folded: String,
    raw_len: usize,
}

impl SearchKey {
    pub(crate) fn for_record(record: &PlantRecord) -> Self {
        let raw = format!("{} {}", record.name, record.species.as_deref().unwrap_or(""));
        let raw = raw.trim();
        Self {
            folded: fold_for_search(raw),
            raw_len: raw.chars().count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit<'a> {
    #[serde(flatten)]
    pub record: &'a PlantRecord,
    /// Position of the record in the dataset; stable across calls.
    pub local_id: usize,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchStatus {
    pub provider: &'static str,
    pub ready: bool,
    pub count: usize,
}

impl Catalog {
    /// Ranks records whose `name species` text contains `query`.
    ///
    /// Prefix matches outrank plain substring matches; ties go to the shorter
    /// haystack, then to dataset order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit<'_>> {
        let needle = fold_for_search(query);
        if needle.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let mut hits: Vec<(SearchHit<'_>, usize)> = self
            .records
            .iter()
            .zip(&self.search_keys)
            .enumerate()
            .filter_map(|(idx, (record, key))| {
                let score = if key.folded.starts_with(&needle) {
                    PREFIX_SCORE
                } else if key.folded.contains(&needle) {
                    SUBSTRING_SCORE
                } else {
                    return None;
                };
                Some((
                    SearchHit {
                        record,
                        local_id: idx,
                        score,
                    },
                    key.raw_len,
                ))
            })
            .collect();

        hits.sort_by(|(a, a_len), (b, b_len)| {
            b.score
                .cmp(&a.score)
                .then(a_len.cmp(b_len))
                .then(a.local_id.cmp(&b.local_id))
        });
        hits.truncate(limit);
        hits.into_iter().map(|(hit, _)| hit).collect()
    }

    pub fn status(&self) -> SearchStatus {
        SearchStatus {
            provider: "local",
            ready: !self.is_empty(),
            count: self.len(),
        }
    }
}
