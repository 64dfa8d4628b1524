//! Emoji Catalog: partitions a flat corpus into titled sections.
//!
//! Sections appear in the order their category is first seen in the corpus.
//! Emoji newer than the running platform are skipped, toned emoji get their
//! persisted or default skin tone, and only allowed categories open a section.

use std::collections::HashMap;

use crate::corpus;
use crate::interface::{Emoji, EmojiSection, Localization, PickerConfiguration, SkinToneStore};
use crate::skin_tones::resolve_skin_tone;
use crate::version::is_supported;

/// Build the picker sections from `corpus`.
///
/// Pure: the same inputs always produce the same sections.
pub fn build_sections(
    corpus: &[Emoji],
    config: &PickerConfiguration,
    localization: &Localization,
    persisted: &HashMap<String, String>,
    platform_version: &str,
) -> Vec<EmojiSection> {
    let mut sections: Vec<EmojiSection> = Vec::new();
    // title -> index into `sections`
    let mut index_by_title: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;

    for emoji in corpus {
        if !is_supported(&emoji.ios_version, platform_version) {
            skipped += 1;
            continue;
        }

        let emoji = if emoji.supports_skin_tones {
            let persisted_tone = persisted.get(&emoji.description).map(String::as_str);
            emoji.duplicate(resolve_skin_tone(persisted_tone, config.default_skin_tone))
        } else {
            emoji.clone()
        };

        let title = localization.title_for(emoji.category);

        if let Some(&idx) = index_by_title.get(&title) {
            sections[idx].emojis.push(emoji);
        } else if config.allows(emoji.category) {
            index_by_title.insert(title.clone(), sections.len());
            sections.push(EmojiSection {
                title,
                icon: emoji.category.icon().to_string(),
                emojis: vec![emoji],
            });
        }
    }

    tracing::debug!(
        sections = sections.len(),
        corpus = corpus.len(),
        skipped_unsupported = skipped,
        "built emoji sections"
    );

    sections
}

/// Sections from the bundled corpus, with the persisted skin tones read from
/// `store`. A failing store reads as an empty map so the picker still opens.
pub fn load_default_sections(
    config: &PickerConfiguration,
    localization: &Localization,
    store: &dyn SkinToneStore,
    platform_version: &str,
) -> Vec<EmojiSection> {
    let persisted = store.get().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read persisted skin tones");
        HashMap::new()
    });
    build_sections(&corpus::bundled(), config, localization, &persisted, platform_version)
}

/// Emoji at a grid position, `None` when the position is stale or out of range
pub fn emoji_at(sections: &[EmojiSection], section: u64, index: u64) -> Option<Emoji> {
    let section = sections.get(usize::try_from(section).ok()?)?;
    section.emojis.get(usize::try_from(index).ok()?).cloned()
}
