//! Emoji Picker FFI Interface Definition
//!
//! This file defines the public interface exposed to the host app via UniFFI.
//! It acts as the source of truth for shared types.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Emoji category, declared in canonical picker order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, uniffi::Enum)]
#[serde(try_from = "String")]
pub enum EmojiCategory {
    SmileysAndEmotion,
    PeopleAndBody,
    AnimalsAndNature,
    FoodAndDrink,
    TravelAndPlaces,
    Activities,
    Objects,
    Symbols,
    Flags,
}

impl EmojiCategory {
    pub const ALL: [EmojiCategory; 9] = [
        EmojiCategory::SmileysAndEmotion,
        EmojiCategory::PeopleAndBody,
        EmojiCategory::AnimalsAndNature,
        EmojiCategory::FoodAndDrink,
        EmojiCategory::TravelAndPlaces,
        EmojiCategory::Activities,
        EmojiCategory::Objects,
        EmojiCategory::Symbols,
        EmojiCategory::Flags,
    ];

    /// Name used by the dataset, and the fallback section title
    pub fn raw_name(&self) -> &'static str {
        match self {
            EmojiCategory::SmileysAndEmotion => "Smileys & Emotion",
            EmojiCategory::PeopleAndBody => "People & Body",
            EmojiCategory::AnimalsAndNature => "Animals & Nature",
            EmojiCategory::FoodAndDrink => "Food & Drink",
            EmojiCategory::TravelAndPlaces => "Travel & Places",
            EmojiCategory::Activities => "Activities",
            EmojiCategory::Objects => "Objects",
            EmojiCategory::Symbols => "Symbols",
            EmojiCategory::Flags => "Flags",
        }
    }

    /// SF Symbol name for the section toolbar
    pub fn icon(&self) -> &'static str {
        match self {
            EmojiCategory::SmileysAndEmotion => "face.smiling",
            EmojiCategory::PeopleAndBody => "hand.wave",
            EmojiCategory::AnimalsAndNature => "leaf",
            EmojiCategory::FoodAndDrink => "fork.knife",
            EmojiCategory::TravelAndPlaces => "car",
            EmojiCategory::Activities => "soccerball",
            EmojiCategory::Objects => "lightbulb",
            EmojiCategory::Symbols => "music.note",
            EmojiCategory::Flags => "flag",
        }
    }

    pub fn from_raw_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.raw_name() == name)
    }
}

impl TryFrom<String> for EmojiCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_raw_name(&value).ok_or_else(|| format!("unknown emoji category: {value}"))
    }
}

/// Fitzpatrick skin tone modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, uniffi::Enum)]
#[serde(try_from = "String")]
pub enum SkinTone {
    Light,
    MediumLight,
    Medium,
    MediumDark,
    Dark,
}

impl SkinTone {
    pub const ALL: [SkinTone; 5] = [
        SkinTone::Light,
        SkinTone::MediumLight,
        SkinTone::Medium,
        SkinTone::MediumDark,
        SkinTone::Dark,
    ];

    /// Stable identifier written to the persisted skin-tone map
    pub fn identifier(&self) -> &'static str {
        match self {
            SkinTone::Light => "light",
            SkinTone::MediumLight => "medium-light",
            SkinTone::Medium => "medium",
            SkinTone::MediumDark => "medium-dark",
            SkinTone::Dark => "dark",
        }
    }

    /// The modifier scalar (U+1F3FB..=U+1F3FF)
    pub fn modifier(&self) -> char {
        match self {
            SkinTone::Light => '\u{1F3FB}',
            SkinTone::MediumLight => '\u{1F3FC}',
            SkinTone::Medium => '\u{1F3FD}',
            SkinTone::MediumDark => '\u{1F3FE}',
            SkinTone::Dark => '\u{1F3FF}',
        }
    }

    /// Parse a persisted identifier. The bare modifier scalar is accepted too.
    pub fn from_identifier(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tone| {
            tone.identifier() == value || {
                let mut chars = value.chars();
                chars.next() == Some(tone.modifier()) && chars.next().is_none()
            }
        })
    }

    pub fn from_modifier(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|tone| tone.modifier() == c)
    }
}

impl TryFrom<String> for SkinTone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_identifier(&value).ok_or_else(|| format!("unknown skin tone: {value}"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// A single emoji as shown in the picker.
///
/// `description` is the identity key: it stays the same across every skin-tone
/// variant of a base emoji and keys the persisted skin-tone map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, uniffi::Record)]
pub struct Emoji {
    /// Glyph, carrying a modifier when `skin_tone` is set
    pub emoji: String,
    pub description: String,
    pub category: EmojiCategory,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    /// Minimum platform version able to render the glyph
    pub ios_version: String,
    pub supports_skin_tones: bool,
    /// `None` is the default yellow variant
    pub skin_tone: Option<SkinTone>,
}

/// A titled group of emoji sharing a category
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct EmojiSection {
    pub title: String,
    /// SF Symbol name
    pub icon: String,
    pub emojis: Vec<Emoji>,
}

/// Behavioral configuration of the picker
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct PickerConfiguration {
    /// Categories allowed to form sections
    pub categories: Vec<EmojiCategory>,
    /// Whether the host offers the skin-tone selector
    pub supports_skin_tones: bool,
    /// Whether skin tones chosen in the selector are remembered
    pub persist_skin_tones: bool,
    /// Tone applied to every toned emoji without a persisted choice
    pub default_skin_tone: Option<SkinTone>,
}

/// Host-supplied display strings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct Localization {
    pub search_results_title: String,
    pub search_results_empty_title: String,
    pub emoji_category_titles: HashMap<EmojiCategory, String>,
}

/// Error type for emoji picker operations
#[derive(Debug, Error, uniffi::Error)]
pub enum PickerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Search superseded by a newer query")]
    Superseded,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE INTERFACES
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of sections and search results.
///
/// `DefaultSectionProvider` implements this with the bundled corpus; a host can
/// supply its own implementation to replace both operations wholesale.
#[uniffi::export(with_foreign)]
pub trait EmojiSectionProvider: Send + Sync {
    /// Build the sections shown when no search is active
    fn load_sections(
        &self,
        config: PickerConfiguration,
        localization: Localization,
    ) -> Vec<EmojiSection>;

    /// Ranked search results for a raw query
    fn search(&self, query: String, sections: Vec<EmojiSection>) -> Vec<Emoji>;
}

/// Persisted mapping of emoji description to skin-tone identifier.
///
/// An empty-string identifier means "explicitly no tone" and overrides a
/// configured default tone. `get` returns an empty map if nothing was stored.
#[uniffi::export(with_foreign)]
pub trait SkinToneStore: Send + Sync {
    fn get(&self) -> Result<HashMap<String, String>, PickerError>;

    /// Replace the whole mapping
    fn set(&self, tones: HashMap<String, String>) -> Result<(), PickerError>;

    fn clear(&self) -> Result<(), PickerError>;
}

impl From<crate::skin_tones::StoreError> for PickerError {
    fn from(e: crate::skin_tones::StoreError) -> Self {
        PickerError::Storage(e.to_string())
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for PickerError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        PickerError::Storage(e.reason)
    }
}
