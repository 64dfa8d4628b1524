//! Core data models for the emoji picker
//!
//! FFI types live in `interface`; this module holds the dataset record format
//! and the behavior attached to `Emoji` (skin-tone duplication).

use serde::Deserialize;

use crate::interface::{Emoji, EmojiCategory, SkinTone};

/// Emoji modifier bases whose default presentation is text. Their glyph needs
/// U+FE0F when no modifier follows.
const TEXT_DEFAULT_MODIFIER_BASES: [char; 7] = [
    '\u{261D}',  // ☝
    '\u{26F9}',  // ⛹
    '\u{270C}',  // ✌
    '\u{270D}',  // ✍
    '\u{1F574}', // 🕴
    '\u{1F575}', // 🕵
    '\u{1F590}', // 🖐
];

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

// ─────────────────────────────────────────────────────────────────────────────
// DATASET RECORD (not exposed via FFI)
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of the emoji dataset as stored on disk
#[derive(Debug, Clone, Deserialize)]
pub struct EmojiRecord {
    pub emoji: String,
    pub description: String,
    pub category: EmojiCategory,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub unicode_version: Option<String>,
    pub ios_version: String,
    #[serde(default, rename = "skin_tones")]
    pub supports_skin_tones: bool,
}

impl EmojiRecord {
    pub fn into_emoji(self) -> Emoji {
        // Keep `skin_tone` in sync with a pre-toned glyph
        let skin_tone = self.emoji.chars().find_map(SkinTone::from_modifier);
        Emoji {
            emoji: self.emoji,
            description: self.description,
            category: self.category,
            aliases: self.aliases,
            tags: self.tags,
            ios_version: self.ios_version,
            supports_skin_tones: self.supports_skin_tones,
            skin_tone,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SKIN TONES
// ─────────────────────────────────────────────────────────────────────────────

impl Emoji {
    /// Copy of this emoji showing `skin_tone` (`None` = default yellow).
    /// Only `emoji` and `skin_tone` differ from `self`.
    pub fn duplicate(&self, skin_tone: Option<SkinTone>) -> Emoji {
        Emoji {
            emoji: apply_skin_tone(&self.emoji, skin_tone),
            skin_tone,
            ..self.clone()
        }
    }

    /// Every selectable variant: default yellow first, then each tone
    pub fn skin_tone_variants(&self) -> Vec<Emoji> {
        std::iter::once(None)
            .chain(SkinTone::ALL.into_iter().map(Some))
            .map(|tone| self.duplicate(tone))
            .collect()
    }
}

/// Remove every Fitzpatrick modifier from a glyph, restoring U+FE0F after
/// text-default bases.
pub fn strip_skin_tones(glyph: &str) -> String {
    let mut out = String::with_capacity(glyph.len());
    let mut prev: Option<char> = None;
    for c in glyph.chars() {
        if SkinTone::from_modifier(c).is_some() {
            if prev.is_some_and(|p| TEXT_DEFAULT_MODIFIER_BASES.contains(&p)) {
                out.push(VARIATION_SELECTOR_16);
            }
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Render `glyph` with the given tone. The modifier goes right after the
/// leading scalar and replaces a U+FE0F found there.
pub fn apply_skin_tone(glyph: &str, skin_tone: Option<SkinTone>) -> String {
    let base = strip_skin_tones(glyph);
    let Some(tone) = skin_tone else {
        return base;
    };

    let mut chars = base.chars();
    let Some(first) = chars.next() else {
        return base;
    };
    let rest = chars.as_str();

    let mut out = String::with_capacity(base.len() + 4);
    out.push(first);
    out.push(tone.modifier());
    out.push_str(rest.strip_prefix(VARIATION_SELECTOR_16).unwrap_or(rest));
    out
}
