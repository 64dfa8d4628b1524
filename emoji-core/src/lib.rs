//! Emoji Core - Rust business logic for an emoji picker
//!
//! This library builds the picker's category sections from a bundled emoji
//! dataset, ranks search results by whole-word hits, and persists per-emoji
//! skin-tone choices.
//!
//! Types are exported via UniFFI proc-macros (#[derive(uniffi::Record/Enum)]).

pub(crate) mod candidate;
pub mod catalog;
pub mod config;
pub mod corpus;
pub mod interface;
pub mod models;
mod picker;
pub mod ranking;
pub mod search;
pub mod skin_tones;
pub mod version;

pub use interface::*;
pub use picker::{DefaultSectionProvider, EmojiPicker};

uniffi::setup_scaffolding!("emoji_core");
