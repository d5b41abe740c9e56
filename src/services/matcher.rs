use crate::{models::MediaItem, services::providers::MediaCatalog, services::text::normalize_title};

/// How many search results to consider per candidate title
pub const SEARCH_RESULT_CAP: u32 = 3;

/// Best-effort fuzzy join of candidate titles against the catalog
///
/// Each candidate is normalized and searched with a bounded result count;
/// the first result wins (the catalog's own relevance ordering is trusted,
/// no re-ranking). A miss excludes the title from the result set. A search
/// transport error is also treated as a miss so one flaky request cannot
/// lose the whole cycle.
pub async fn find_matches(
    catalog: &dyn MediaCatalog,
    candidates: &[String],
    limit: u32,
) -> Vec<MediaItem> {
    let mut matches = Vec::new();

    for candidate in candidates {
        let cleaned = normalize_title(candidate);
        if cleaned.is_empty() {
            tracing::debug!(candidate = %candidate, "Candidate normalized to nothing, skipping");
            continue;
        }

        match catalog.search_movies(&cleaned, limit).await {
            Ok(results) => match results.into_iter().next() {
                Some(item) => {
                    tracing::info!(title = %cleaned, matched = %item.title, "Title found in catalog");
                    matches.push(item);
                }
                None => {
                    tracing::info!(title = %cleaned, "Title not found in catalog");
                }
            },
            Err(e) => {
                tracing::warn!(title = %cleaned, error = %e, "Search failed, treating as miss");
            }
        }
    }

    matches
}
