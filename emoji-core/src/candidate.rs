//! Search candidate with memoized derived state.
//!
//! Module isolation ensures no code outside this module can swap the emoji
//! after construction, so the `OnceLock` cache can never go stale.

use std::sync::OnceLock;

use crate::interface::Emoji;

/// An emoji that passed the substring filter, borrowed from the sections it
/// was found in. `description_len()` is computed on first access and cached:
/// only candidates with a whole-word hit ever need it.
#[derive(Debug, Clone)]
pub struct SearchCandidate<'a> {
    emoji: &'a Emoji,
    description_len: OnceLock<usize>,
}

impl<'a> SearchCandidate<'a> {
    pub fn new(emoji: &'a Emoji) -> Self {
        Self {
            emoji,
            description_len: OnceLock::new(),
        }
    }

    pub fn emoji(&self) -> &'a Emoji {
        self.emoji
    }

    /// Description length in grapheme clusters
    pub fn description_len(&self) -> usize {
        *self.description_len.get_or_init(|| {
            crate::ranking::description_length(&self.emoji.description)
        })
    }
}
