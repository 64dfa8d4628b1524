//! Picker configuration and localization defaults, plus JSON loading for hosts
//! and tools that keep them in files.

use std::collections::HashMap;
use std::path::Path;

use crate::interface::{EmojiCategory, Localization, PickerConfiguration, PickerError};

impl Default for PickerConfiguration {
    fn default() -> Self {
        Self {
            categories: EmojiCategory::ALL.to_vec(),
            supports_skin_tones: true,
            persist_skin_tones: true,
            default_skin_tone: None,
        }
    }
}

impl PickerConfiguration {
    pub fn from_json_str(json: &str) -> Result<Self, PickerError> {
        serde_json::from_str(json)
            .map_err(|e| PickerError::InvalidInput(format!("configuration: {e}")))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PickerError> {
        let json = read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn allows(&self, category: EmojiCategory) -> bool {
        self.categories.contains(&category)
    }
}

impl Default for Localization {
    fn default() -> Self {
        Self {
            search_results_title: "Search results".to_string(),
            search_results_empty_title: "No results".to_string(),
            emoji_category_titles: HashMap::new(),
        }
    }
}

impl Localization {
    pub fn from_json_str(json: &str) -> Result<Self, PickerError> {
        serde_json::from_str(json)
            .map_err(|e| PickerError::InvalidInput(format!("localization: {e}")))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PickerError> {
        let json = read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Localized section title, falling back to the category's raw name
    pub fn title_for(&self, category: EmojiCategory) -> String {
        self.emoji_category_titles
            .get(&category)
            .cloned()
            .unwrap_or_else(|| category.raw_name().to_string())
    }

    /// Header shown above the search result grid
    pub fn search_results_header(&self, result_count: u64) -> String {
        if result_count == 0 {
            self.search_results_empty_title.clone()
        } else {
            self.search_results_title.clone()
        }
    }
}

fn read_to_string(path: &Path) -> Result<String, PickerError> {
    std::fs::read_to_string(path)
        .map_err(|e| PickerError::InvalidInput(format!("{}: {e}", path.display())))
}
