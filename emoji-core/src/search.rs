//! Search Engine (substring filter + whole-word tier ranking)
//!
//! Phase 1 flattens the sections and keeps every emoji whose aliases, tags or
//! description contain the query, case-insensitively. Phase 2 ranks the
//! survivors with the `ranking` module's lexicographic score using a stable
//! sort, so fully tied emoji keep their section order.

use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::candidate::SearchCandidate;
use crate::interface::{Emoji, EmojiSection};
use crate::ranking::{compute_rank_score, RankScore, WordMatcher};

/// Lower-case the raw query and drop one trailing space.
/// Returns `None` for queries that must not search at all.
pub fn normalize_query(query: &str) -> Option<String> {
    if query.is_empty() || query == " " {
        return None;
    }
    let mut normalized = query.to_lowercase();
    if normalized.ends_with(' ') {
        normalized.pop();
    }
    if normalized.is_empty() {
        return None;
    }
    Some(normalized)
}

/// Whether the normalized query is a substring of any alias, tag or the
/// description, ignoring case.
pub fn matches_substring(emoji: &Emoji, query_lower: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(query_lower);
    emoji.aliases.iter().any(|alias| contains(alias))
        || emoji.tags.iter().any(|tag| contains(tag))
        || contains(&emoji.description)
}

/// Ranked search over `sections`. No result limit.
pub fn search(query: &str, sections: &[EmojiSection]) -> Vec<Emoji> {
    search_cancellable(query, sections, &CancellationToken::new()).unwrap_or_default()
}

/// Search that gives up once `token` is cancelled, returning `None`.
pub(crate) fn search_cancellable(
    query: &str,
    sections: &[EmojiSection],
    token: &CancellationToken,
) -> Option<Vec<Emoji>> {
    let Some(query_lower) = normalize_query(query) else {
        return Some(Vec::new());
    };

    #[cfg(feature = "perf-log")]
    let t0 = std::time::Instant::now();

    let flattened: Vec<&Emoji> = sections.iter().flat_map(|s| s.emojis.iter()).collect();

    // Collecting a filtered par_iter keeps the input order
    let candidates: Vec<SearchCandidate<'_>> = flattened
        .par_iter()
        .copied()
        .filter(|emoji| !token.is_cancelled() && matches_substring(emoji, &query_lower))
        .map(SearchCandidate::new)
        .collect();

    if token.is_cancelled() {
        return None;
    }

    #[cfg(feature = "perf-log")]
    let t1 = std::time::Instant::now();

    let ranked = rank_candidates(candidates, &query_lower);

    if token.is_cancelled() {
        return None;
    }

    #[cfg(feature = "perf-log")]
    {
        let t2 = std::time::Instant::now();
        tracing::debug!(
            filter_ms = (t1 - t0).as_secs_f64() * 1000.0,
            rank_ms = (t2 - t1).as_secs_f64() * 1000.0,
            "search timings"
        );
    }

    tracing::debug!(
        query = %query_lower,
        searched = flattened.len(),
        matched = ranked.len(),
        "emoji search"
    );

    Some(ranked.into_iter().map(|c| c.emoji().clone()).collect())
}

/// Stable sort by descending rank score.
///
/// If the word-boundary pattern cannot be built the candidates keep filter
/// order.
pub(crate) fn rank_candidates<'a>(
    candidates: Vec<SearchCandidate<'a>>,
    query_lower: &str,
) -> Vec<SearchCandidate<'a>> {
    let matcher = match WordMatcher::new(query_lower) {
        Ok(matcher) => matcher,
        Err(e) => {
            tracing::warn!(error = %e, "word-boundary matcher unavailable, keeping filter order");
            return candidates;
        }
    };

    let mut scored: Vec<(RankScore, SearchCandidate<'a>)> = candidates
        .into_par_iter()
        .map(|c| (compute_rank_score(&c, &matcher), c))
        .collect();

    // `sort_by` is stable: equal scores keep filter order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, c)| c).collect()
}
