//! EmojiPicker - Main API for host interop, designed for UniFFI export.
//!
//! Owns the current sections, the skin-tone store and the section provider.
//!
//! Async Cancellation Architecture:
//! When the host cancels an async Task, UniFFI drops the Rust Future. We intercept this
//! via a DropGuard that triggers a CancellationToken. The blocking search thread
//! checks this token between phases and can abort mid-flight. Starting a search also
//! cancels the one still in flight, and a search that completes after a newer one
//! started reports `Superseded` so stale results never reach the grid.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Once};

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use rand::seq::SliceRandom;
use tokio_util::sync::CancellationToken;

use crate::catalog;
use crate::interface::{
    Emoji, EmojiSection, EmojiSectionProvider, Localization, PickerConfiguration, PickerError,
    SkinTone, SkinToneStore,
};
use crate::search;
use crate::skin_tones::{MemorySkinToneStore, SqliteSkinToneStore};

/// Global fallback Tokio runtime for when async functions are called outside any runtime context.
/// Shared across all EmojiPicker instances and never dropped.
/// Used by UniFFI which doesn't provide a tokio runtime.
static FALLBACK_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create fallback tokio runtime")
});

static RAYON_INIT: Once = Once::new();

/// Initialize the global Rayon thread pool, leaving cores free for Tokio
fn init_rayon() {
    RAYON_INIT.call_once(|| {
        let num_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        // Reserve 2 cores for Tokio, but use at least 1 thread.
        let rayon_threads = num_threads.saturating_sub(2).max(1);

        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(rayon_threads)
            .thread_name(|i| format!("emoji-rayon-{}", i))
            .build_global();
    });
}

/// RAII guard that cancels a token when dropped.
/// When the host cancels an async Task, UniFFI drops the Future, which drops this guard,
/// which triggers the cancellation token.
struct DropGuard {
    token: CancellationToken,
}

impl DropGuard {
    fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl Drop for DropGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SECTION PROVIDERS
// ─────────────────────────────────────────────────────────────────────────────

/// Provider backed by the bundled corpus and a skin-tone store
pub struct DefaultSectionProvider {
    store: Arc<dyn SkinToneStore>,
    platform_version: String,
}

impl DefaultSectionProvider {
    pub fn new(store: Arc<dyn SkinToneStore>, platform_version: String) -> Self {
        Self { store, platform_version }
    }
}

impl EmojiSectionProvider for DefaultSectionProvider {
    fn load_sections(
        &self,
        config: PickerConfiguration,
        localization: Localization,
    ) -> Vec<EmojiSection> {
        catalog::load_default_sections(
            &config,
            &localization,
            self.store.as_ref(),
            &self.platform_version,
        )
    }

    fn search(&self, query: String, sections: Vec<EmojiSection>) -> Vec<Emoji> {
        search::search(&query, &sections)
    }
}

/// Where sections and search results come from. The bundled provider searches
/// with cancellation checkpoints; a host provider is called as-is.
#[derive(Clone)]
enum SectionSource {
    Bundled(Arc<DefaultSectionProvider>),
    Host(Arc<dyn EmojiSectionProvider>),
}

impl SectionSource {
    fn load_sections(&self, config: &PickerConfiguration, localization: &Localization) -> Vec<EmojiSection> {
        match self {
            SectionSource::Bundled(provider) => {
                provider.load_sections(config.clone(), localization.clone())
            }
            SectionSource::Host(provider) => {
                provider.load_sections(config.clone(), localization.clone())
            }
        }
    }

    /// Blocking search; `None` once `token` is cancelled
    fn search(
        &self,
        query: String,
        sections: &[EmojiSection],
        token: &CancellationToken,
    ) -> Option<Vec<Emoji>> {
        match self {
            SectionSource::Bundled(_) => search::search_cancellable(&query, sections, token),
            SectionSource::Host(provider) => {
                let results = provider.search(query, sections.to_vec());
                (!token.is_cancelled()).then_some(results)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PICKER
// ─────────────────────────────────────────────────────────────────────────────

/// Thread-safe emoji picker core
///
/// Concurrency Model:
/// - Sections live behind an RwLock as a shared snapshot; searches clone the Arc
/// - Search is async with cancellation support via CancellationToken
/// - Blocking work runs on tokio::spawn_blocking threads
/// - Uses global FALLBACK_RUNTIME when called outside any runtime (e.g., from UniFFI)
#[derive(uniffi::Object)]
pub struct EmojiPicker {
    config: PickerConfiguration,
    localization: Localization,
    store: Arc<dyn SkinToneStore>,
    source: SectionSource,
    sections: RwLock<Arc<Vec<EmojiSection>>>,
    /// Sequence number of the most recently started search
    search_seq: AtomicU64,
    inflight: Mutex<Option<CancellationToken>>,
    /// Serializes read-modify-write of the persisted tone map
    tone_write: Mutex<()>,
}

// Internal implementation (not exported via FFI)
impl EmojiPicker {
    fn from_parts(
        config: PickerConfiguration,
        localization: Localization,
        store: Arc<dyn SkinToneStore>,
        source: SectionSource,
    ) -> Self {
        init_rayon();
        let sections = source.load_sections(&config, &localization);
        tracing::info!(
            sections = sections.len(),
            emoji = sections.iter().map(|s| s.emojis.len()).sum::<usize>(),
            "emoji picker ready"
        );
        Self {
            config,
            localization,
            store,
            source,
            sections: RwLock::new(Arc::new(sections)),
            search_seq: AtomicU64::new(0),
            inflight: Mutex::new(None),
            tone_write: Mutex::new(()),
        }
    }

    fn bundled(
        config: PickerConfiguration,
        localization: Localization,
        platform_version: String,
        store: Arc<dyn SkinToneStore>,
    ) -> Self {
        let provider = DefaultSectionProvider::new(Arc::clone(&store), platform_version);
        Self::from_parts(config, localization, store, SectionSource::Bundled(Arc::new(provider)))
    }

    fn open_store(store_path: Option<String>) -> Result<Arc<dyn SkinToneStore>, PickerError> {
        let store: Arc<dyn SkinToneStore> = match store_path {
            Some(path) => Arc::new(SqliteSkinToneStore::open(&path)?),
            None => Arc::new(MemorySkinToneStore::new()),
        };
        Ok(store)
    }

    /// Create a picker with default configuration and an in-memory store (for testing)
    #[cfg(test)]
    pub(crate) fn new_in_memory() -> Self {
        Self::bundled(
            PickerConfiguration::default(),
            Localization::default(),
            "26.0".to_string(),
            Arc::new(MemorySkinToneStore::new()),
        )
    }

    /// Get a tokio runtime handle - uses current runtime if available, otherwise global fallback
    fn runtime_handle(&self) -> tokio::runtime::Handle {
        tokio::runtime::Handle::try_current()
            .unwrap_or_else(|_| FALLBACK_RUNTIME.handle().clone())
    }

    /// Register a new search, cancelling the previous one still in flight.
    /// The sequence number is taken under the in-flight lock so the newest
    /// search always owns the stored token.
    fn begin_search(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut inflight = self.inflight.lock();
        let seq = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = inflight.replace(token.clone()) {
            previous.cancel();
        }
        (seq, token)
    }

    fn write_tone(&self, description: &str, identifier: Option<&str>) -> Result<(), PickerError> {
        let _lock = self.tone_write.lock();
        let mut tones = self.store.get()?;
        match identifier {
            Some(identifier) => {
                tones.insert(description.to_string(), identifier.to_string());
            }
            None => {
                tones.remove(description);
            }
        }
        self.store.set(tones)
    }

    /// Show `tone` on every toned emoji with this description in the current sections
    fn show_tone_in_sections(&self, description: &str, tone: Option<SkinTone>) {
        let mut sections = self.sections.write();
        for emoji in Arc::make_mut(&mut *sections)
            .iter_mut()
            .flat_map(|s| s.emojis.iter_mut())
            .filter(|e| e.supports_skin_tones && e.description == description)
        {
            *emoji = emoji.duplicate(tone);
        }
    }
}

// FFI-exported constructors (must be in standalone impl block)
#[uniffi::export]
impl EmojiPicker {
    /// Create a picker over the bundled corpus. Skin tones persist in a SQLite
    /// database at `store_path`, or in memory when no path is given.
    #[uniffi::constructor]
    pub fn new(
        config: PickerConfiguration,
        localization: Localization,
        platform_version: String,
        store_path: Option<String>,
    ) -> Result<Self, PickerError> {
        let store = Self::open_store(store_path)?;
        Ok(Self::bundled(config, localization, platform_version, store))
    }

    /// Create a picker over the bundled corpus with a host-provided store
    #[uniffi::constructor]
    pub fn with_store(
        config: PickerConfiguration,
        localization: Localization,
        platform_version: String,
        store: Arc<dyn SkinToneStore>,
    ) -> Self {
        Self::bundled(config, localization, platform_version, store)
    }

    /// Create a picker whose sections and search come from `provider`
    #[uniffi::constructor]
    pub fn with_provider(
        config: PickerConfiguration,
        localization: Localization,
        store_path: Option<String>,
        provider: Arc<dyn EmojiSectionProvider>,
    ) -> Result<Self, PickerError> {
        let store = Self::open_store(store_path)?;
        Ok(Self::from_parts(config, localization, store, SectionSource::Host(provider)))
    }
}

#[uniffi::export]
impl EmojiPicker {
    // ─────────────────────────────────────────────────────────────────────────────
    // Sections
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn sections(&self) -> Vec<EmojiSection> {
        (**self.sections.read()).clone()
    }

    /// Rebuild the sections from the provider, picking up persisted tone changes
    pub fn reload_sections(&self) {
        let sections = self.source.load_sections(&self.config, &self.localization);
        *self.sections.write() = Arc::new(sections);
    }

    /// Emoji at a grid position, `None` when out of range
    pub fn emoji_at(&self, section: u64, index: u64) -> Option<Emoji> {
        catalog::emoji_at(&self.sections.read(), section, index)
    }

    pub fn random_emoji(&self) -> Option<Emoji> {
        let sections = self.sections.read().clone();
        let mut rng = rand::thread_rng();
        sections.choose(&mut rng)?.emojis.choose(&mut rng).cloned()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────────

    /// Ranked search over the current sections.
    ///
    /// Returns `Superseded` when a newer search started before this one
    /// finished, and `Cancelled` when the work was aborted.
    pub async fn search(&self, query: String) -> Result<Vec<Emoji>, PickerError> {
        let (seq, token) = self.begin_search();
        let _guard = DropGuard::new(token.clone());

        let sections = self.sections.read().clone();
        let source = self.source.clone();
        let token_clone = token.clone();

        // We use runtime.spawn_blocking() instead of tokio::task::spawn_blocking()
        // because UniFFI doesn't provide a tokio runtime context
        let handle = self
            .runtime_handle()
            .spawn_blocking(move || source.search(query, &sections, &token_clone));

        let outcome = handle.await;

        if self.search_seq.load(Ordering::SeqCst) != seq {
            tracing::debug!(seq, "discarding superseded search");
            return Err(PickerError::Superseded);
        }

        match outcome {
            Ok(Some(results)) => Ok(results),
            Ok(None) => Err(PickerError::Cancelled),
            // JoinError means the task panicked or was aborted
            Err(_join_error) => Err(PickerError::Cancelled),
        }
    }

    /// Emoji at `index` of a result list, `None` when out of range
    pub fn search_result_at(&self, results: Vec<Emoji>, index: u64) -> Option<Emoji> {
        let index = usize::try_from(index).ok()?;
        results.into_iter().nth(index)
    }

    /// Title shown above the search results
    pub fn search_results_header(&self, result_count: u64) -> String {
        self.localization.search_results_header(result_count)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Skin tones
    // ─────────────────────────────────────────────────────────────────────────────

    /// Yellow followed by each tone, or empty when skin tones are unavailable
    pub fn skin_tone_variants(&self, emoji: Emoji) -> Vec<Emoji> {
        if !self.config.supports_skin_tones || !emoji.supports_skin_tones {
            return Vec::new();
        }
        emoji.skin_tone_variants()
    }

    /// The toned emoji for a choice made in the selector. The choice is
    /// remembered when persistence is enabled; picking yellow while a default
    /// tone is configured is stored as an explicit "no tone".
    pub fn select_skin_tone(
        &self,
        original: Emoji,
        tone: Option<SkinTone>,
    ) -> Result<Emoji, PickerError> {
        let selected = original.duplicate(tone);
        if !self.config.persist_skin_tones || !original.supports_skin_tones {
            return Ok(selected);
        }

        let identifier = match (tone, self.config.default_skin_tone) {
            (Some(tone), _) => Some(tone.identifier()),
            (None, Some(_)) => Some(""),
            (None, None) => None,
        };
        self.write_tone(&original.description, identifier)?;
        self.show_tone_in_sections(&original.description, tone);

        tracing::debug!(
            emoji = %original.description,
            tone = tone.map(|t| t.identifier()).unwrap_or("none"),
            "persisted skin tone"
        );
        Ok(selected)
    }

    /// Record a tone directly. `None` forgets the entry, so the default tone
    /// applies again.
    pub fn persist_skin_tone(
        &self,
        original: Emoji,
        tone: Option<SkinTone>,
    ) -> Result<(), PickerError> {
        self.write_tone(&original.description, tone.map(|t| t.identifier()))?;
        if original.supports_skin_tones {
            self.show_tone_in_sections(
                &original.description,
                tone.or(self.config.default_skin_tone),
            );
        }
        Ok(())
    }

    pub fn persisted_skin_tones(&self) -> Result<HashMap<String, String>, PickerError> {
        self.store.get()
    }

    /// Forget every persisted tone and rebuild the sections
    pub fn clear_persisted_skin_tones(&self) -> Result<(), PickerError> {
        {
            let _lock = self.tone_write.lock();
            self.store.clear()?;
        }
        self.reload_sections();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::EmojiCategory;

    fn find(sections: &[EmojiSection], description: &str) -> Emoji {
        sections
            .iter()
            .flat_map(|s| &s.emojis)
            .find(|e| e.description == description)
            .cloned()
            .unwrap_or_else(|| panic!("{description} not in sections"))
    }

    fn descriptions(results: &[Emoji]) -> Vec<&str> {
        results.iter().map(|e| e.description.as_str()).collect()
    }

    fn picker_with_store(
        config: PickerConfiguration,
        store: Arc<MemorySkinToneStore>,
    ) -> EmojiPicker {
        EmojiPicker::with_store(config, Localization::default(), "26.0".to_string(), store)
    }

    /// Provider holding two animals whose first search blocks until released
    struct GatedProvider {
        entered: Mutex<Option<std::sync::mpsc::Sender<()>>>,
        release: Mutex<Option<std::sync::mpsc::Receiver<()>>>,
    }

    impl EmojiSectionProvider for GatedProvider {
        fn load_sections(
            &self,
            _config: PickerConfiguration,
            _localization: Localization,
        ) -> Vec<EmojiSection> {
            let emojis = crate::corpus::bundled()
                .into_iter()
                .filter(|e| e.description == "cat face" || e.description == "dog face")
                .collect();
            vec![EmojiSection {
                title: "Pets".to_string(),
                icon: EmojiCategory::AnimalsAndNature.icon().to_string(),
                emojis,
            }]
        }

        fn search(&self, query: String, sections: Vec<EmojiSection>) -> Vec<Emoji> {
            let release = self.release.lock().take();
            if let Some(release) = release {
                if let Some(entered) = self.entered.lock().take() {
                    let _ = entered.send(());
                }
                let _ = release.recv();
            }
            search::search(&query, &sections)
        }
    }

    /// Provider with nothing in it
    struct EmptyProvider;

    impl EmojiSectionProvider for EmptyProvider {
        fn load_sections(&self, _: PickerConfiguration, _: Localization) -> Vec<EmojiSection> {
            Vec::new()
        }

        fn search(&self, _: String, _: Vec<EmojiSection>) -> Vec<Emoji> {
            Vec::new()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Cancellation plumbing
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_cancellation_token() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());

        let guard = DropGuard::new(token.clone());
        assert!(!token.is_cancelled());

        drop(guard);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_dropguard_cancels_on_panic() {
        let token = CancellationToken::new();
        let token_clone = token.clone();

        let result = std::panic::catch_unwind(|| {
            let _guard = DropGuard::new(token_clone);
            panic!("Intentional panic to test unwinding");
        });

        assert!(result.is_err());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_new_search_cancels_inflight_token() {
        let picker = EmojiPicker::new_in_memory();
        let (first_seq, first) = picker.begin_search();
        let (second_seq, second) = picker.begin_search();
        assert!(second_seq > first_seq);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_concurrent_searches_never_cancel_the_newest() {
        const THREADS: usize = 8;
        let picker = EmojiPicker::new_in_memory();
        for _ in 0..200 {
            let barrier = std::sync::Barrier::new(THREADS);
            let (barrier, picker) = (&barrier, &picker);
            let started: Vec<(u64, CancellationToken)> = std::thread::scope(|scope| {
                let handles: Vec<_> = (0..THREADS)
                    .map(move |_| {
                        scope.spawn(move || {
                            barrier.wait();
                            picker.begin_search()
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });

            let (newest_seq, newest) = started.iter().max_by_key(|(seq, _)| *seq).unwrap();
            assert!(!newest.is_cancelled(), "search {newest_seq} was cancelled");
            let live = started.iter().filter(|(_, token)| !token.is_cancelled()).count();
            assert_eq!(live, 1);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Sections
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_picker_builds_all_sections() {
        let picker = EmojiPicker::new_in_memory();
        let sections = picker.sections();
        assert_eq!(sections.len(), EmojiCategory::ALL.len());
        assert_eq!(sections[0].title, "Smileys & Emotion");
        assert_eq!(sections[0].icon, "face.smiling");
    }

    #[test]
    fn test_emoji_at() {
        let picker = EmojiPicker::new_in_memory();
        assert_eq!(picker.emoji_at(0, 0).map(|e| e.description), Some("grinning face".to_string()));
        assert_eq!(picker.emoji_at(0, 10_000), None);
        assert_eq!(picker.emoji_at(42, 0), None);
    }

    #[test]
    fn test_random_emoji() {
        let picker = EmojiPicker::new_in_memory();
        let emoji = picker.random_emoji().unwrap();
        assert_eq!(find(&picker.sections(), &emoji.description), emoji);

        let empty = EmojiPicker::with_provider(
            PickerConfiguration::default(),
            Localization::default(),
            None,
            Arc::new(EmptyProvider),
        )
        .unwrap();
        assert_eq!(empty.random_emoji(), None);
    }

    #[test]
    fn test_sqlite_store_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tones.sqlite").to_string_lossy().to_string();
        let config = PickerConfiguration::default();
        {
            let picker = EmojiPicker::new(config.clone(), Localization::default(), "26.0".to_string(), Some(path.clone())).unwrap();
            let thumbs_up = find(&picker.sections(), "thumbs up");
            picker.select_skin_tone(thumbs_up, Some(SkinTone::Medium)).unwrap();
        }
        let reopened = EmojiPicker::new(config, Localization::default(), "26.0".to_string(), Some(path)).unwrap();
        assert_eq!(find(&reopened.sections(), "thumbs up").skin_tone, Some(SkinTone::Medium));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_search_cat() {
        let picker = EmojiPicker::new_in_memory();
        let results = picker.search("cat".to_string()).await.unwrap();
        // Alias hits lead; the rest only contain "cat" somewhere
        assert_eq!(descriptions(&results[..2]), vec!["cat face", "cat"]);
        assert!(results.iter().all(|e| search::matches_substring(e, "cat")));
        assert_eq!(picker.search_results_header(results.len() as u64), "Search results");
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let picker = EmojiPicker::new_in_memory();
        assert!(picker.search(String::new()).await.unwrap().is_empty());
        assert!(picker.search(" ".to_string()).await.unwrap().is_empty());
        assert_eq!(picker.search_results_header(0), "No results");
    }

    #[tokio::test]
    async fn test_search_result_at() {
        let picker = EmojiPicker::new_in_memory();
        let results = picker.search("thumbs".to_string()).await.unwrap();
        assert_eq!(
            picker.search_result_at(results.clone(), 1).map(|e| e.description),
            Some("thumbs down".to_string())
        );
        assert_eq!(picker.search_result_at(results, 2), None);
    }

    /// UniFFI doesn't provide a tokio runtime, so the picker must fall back
    /// to its own.
    #[test]
    fn test_search_works_without_external_tokio_runtime() {
        let picker = EmojiPicker::new_in_memory();
        let result = futures::executor::block_on(picker.search("heart".to_string()));
        let results = result.unwrap();
        assert_eq!(results[0].description, "red heart");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stale_search_is_superseded() {
        let (entered_tx, entered_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel();
        let provider = GatedProvider {
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(Some(release_rx)),
        };
        let picker = Arc::new(
            EmojiPicker::with_provider(
                PickerConfiguration::default(),
                Localization::default(),
                None,
                Arc::new(provider),
            )
            .unwrap(),
        );

        let first = tokio::spawn({
            let picker = Arc::clone(&picker);
            async move { picker.search("cat".to_string()).await }
        });
        tokio::task::spawn_blocking(move || entered_rx.recv())
            .await
            .unwrap()
            .unwrap();

        let second = picker.search("dog".to_string()).await.unwrap();
        assert_eq!(descriptions(&second), vec!["dog face"]);

        release_tx.send(()).unwrap();
        assert!(matches!(first.await.unwrap(), Err(PickerError::Superseded)));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Skin tones
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_skin_tone_variants_respect_configuration() {
        let picker = EmojiPicker::new_in_memory();
        let thumbs_up = find(&picker.sections(), "thumbs up");
        let variants = picker.skin_tone_variants(thumbs_up.clone());
        assert_eq!(variants.len(), 6);
        assert_eq!(variants[0].skin_tone, None);

        let grinning = find(&picker.sections(), "grinning face");
        assert!(picker.skin_tone_variants(grinning).is_empty());

        let config = PickerConfiguration {
            supports_skin_tones: false,
            ..PickerConfiguration::default()
        };
        let picker = picker_with_store(config, Arc::new(MemorySkinToneStore::new()));
        assert!(picker.skin_tone_variants(thumbs_up).is_empty());
    }

    #[test]
    fn test_select_skin_tone_persists_and_updates_sections() {
        let store = Arc::new(MemorySkinToneStore::new());
        let picker = picker_with_store(PickerConfiguration::default(), Arc::clone(&store));
        let thumbs_up = find(&picker.sections(), "thumbs up");

        let selected = picker.select_skin_tone(thumbs_up, Some(SkinTone::Dark)).unwrap();
        assert_eq!(selected.emoji, "👍🏿");
        assert_eq!(store.get().unwrap().get("thumbs up").map(String::as_str), Some("dark"));
        assert_eq!(find(&picker.sections(), "thumbs up").skin_tone, Some(SkinTone::Dark));

        // Yellow without a default tone forgets the entry
        picker.select_skin_tone(selected, None).unwrap();
        assert!(!store.get().unwrap().contains_key("thumbs up"));
        assert_eq!(find(&picker.sections(), "thumbs up").skin_tone, None);
    }

    #[test]
    fn test_select_yellow_with_default_stores_empty_sentinel() {
        let store = Arc::new(MemorySkinToneStore::new());
        let config = PickerConfiguration {
            default_skin_tone: Some(SkinTone::Medium),
            ..PickerConfiguration::default()
        };
        let picker = picker_with_store(config, Arc::clone(&store));
        let thumbs_up = find(&picker.sections(), "thumbs up");
        assert_eq!(thumbs_up.skin_tone, Some(SkinTone::Medium));

        picker.select_skin_tone(thumbs_up, None).unwrap();
        assert_eq!(store.get().unwrap().get("thumbs up").map(String::as_str), Some(""));

        // The choice survives a rebuild and the default no longer applies
        picker.reload_sections();
        assert_eq!(find(&picker.sections(), "thumbs up").skin_tone, None);
        assert_eq!(find(&picker.sections(), "waving hand").skin_tone, Some(SkinTone::Medium));
    }

    #[test]
    fn test_select_without_persistence_leaves_store_alone() {
        let store = Arc::new(MemorySkinToneStore::new());
        let config = PickerConfiguration {
            persist_skin_tones: false,
            ..PickerConfiguration::default()
        };
        let picker = picker_with_store(config, Arc::clone(&store));
        let thumbs_up = find(&picker.sections(), "thumbs up");

        let selected = picker.select_skin_tone(thumbs_up, Some(SkinTone::Light)).unwrap();
        assert_eq!(selected.skin_tone, Some(SkinTone::Light));
        assert!(store.get().unwrap().is_empty());
        assert_eq!(find(&picker.sections(), "thumbs up").skin_tone, None);
    }

    #[test]
    fn test_persist_skin_tone_direct() {
        let store = Arc::new(MemorySkinToneStore::new());
        let config = PickerConfiguration {
            default_skin_tone: Some(SkinTone::Light),
            ..PickerConfiguration::default()
        };
        let picker = picker_with_store(config, Arc::clone(&store));
        let waving = find(&picker.sections(), "waving hand");

        picker.persist_skin_tone(waving.clone(), Some(SkinTone::MediumDark)).unwrap();
        assert_eq!(
            picker.persisted_skin_tones().unwrap(),
            HashMap::from([("waving hand".to_string(), "medium-dark".to_string())])
        );
        assert_eq!(find(&picker.sections(), "waving hand").skin_tone, Some(SkinTone::MediumDark));

        // Forgetting the entry brings the default back
        picker.persist_skin_tone(waving, None).unwrap();
        assert!(picker.persisted_skin_tones().unwrap().is_empty());
        assert_eq!(find(&picker.sections(), "waving hand").skin_tone, Some(SkinTone::Light));
    }

    #[test]
    fn test_clear_persisted_skin_tones() {
        let store = Arc::new(MemorySkinToneStore::with_tones(HashMap::from([(
            "thumbs up".to_string(),
            "dark".to_string(),
        )])));
        let picker = picker_with_store(PickerConfiguration::default(), Arc::clone(&store));
        assert_eq!(find(&picker.sections(), "thumbs up").skin_tone, Some(SkinTone::Dark));

        picker.clear_persisted_skin_tones().unwrap();
        assert!(store.get().unwrap().is_empty());
        assert_eq!(find(&picker.sections(), "thumbs up").skin_tone, None);
    }
}
