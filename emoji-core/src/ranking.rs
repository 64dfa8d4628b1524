//! Whole-word tier ranking for search results.
//!
//! Implements a lexicographic tuple where the field carrying a whole-word hit
//! always dominates. An alias hit ALWAYS beats a tag hit, a tag hit ALWAYS beats
//! a description hit. Between two candidates hitting in the same field, the
//! shorter description wins, since it is usually the more precise emoji.

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::candidate::SearchCandidate;
use crate::interface::Emoji;

/// Field carrying the first whole-word hit, checked alias → tag → description.
/// Derived `Ord` follows declaration order: higher = better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    None,
    Description,
    Tag,
    Alias,
}

/// Rank tuple: derived Ord gives lexicographic comparison.
/// All components: higher = better.
///
/// Tuple order (most to least important):
/// 1. tier: which field holds a whole-word hit
/// 2. brevity: u32::MAX - description length, 0 when tier is `None` so that
///    candidates without any whole-word hit tie and keep filter order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankScore {
    pub tier: MatchTier,
    pub brevity: u32,
}

/// Matches a literal query at word boundaries (`\b<query>\b`).
///
/// Case-sensitive: the query arrives lower-cased and is compared against the
/// raw field text, so "japan" is not a whole word of "Japan".
#[derive(Debug, Clone)]
pub struct WordMatcher {
    pattern: Regex,
}

impl WordMatcher {
    /// The query is escaped, never interpreted as a pattern.
    pub fn new(query: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(query)))?;
        Ok(Self { pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn tier(&self, emoji: &Emoji) -> MatchTier {
        if emoji.aliases.iter().any(|alias| self.is_match(alias)) {
            MatchTier::Alias
        } else if emoji.tags.iter().any(|tag| self.is_match(tag)) {
            MatchTier::Tag
        } else if self.is_match(&emoji.description) {
            MatchTier::Description
        } else {
            MatchTier::None
        }
    }
}

/// Compute the rank score for a candidate.
pub fn compute_rank_score(candidate: &SearchCandidate<'_>, matcher: &WordMatcher) -> RankScore {
    let tier = matcher.tier(candidate.emoji());
    let brevity = match tier {
        MatchTier::None => 0,
        _ => u32::MAX.saturating_sub(candidate.description_len().min(u32::MAX as usize) as u32),
    };
    RankScore { tier, brevity }
}

/// Length in user-perceived characters
pub fn description_length(description: &str) -> usize {
    description.graphemes(true).count()
}
