//! Per-intent action preference counters.
//!
//! Counters grow monotonically on successful decisions and persist across
//! restarts through the [`LearningPersistence`] collaborator, which is
//! called at process start and stop only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use murmur_core::error::Result;
use murmur_core::types::{Action, Intent};

/// Occurrence counters: intent -> chosen action -> count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningStore {
    counters: HashMap<Intent, HashMap<Action, u64>>,
}

impl LearningStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful use of `action` for `intent`.
    pub fn record(&mut self, intent: Intent, action: Action) {
        *self
            .counters
            .entry(intent)
            .or_default()
            .entry(action)
            .or_insert(0) += 1;
    }

    /// Times `action` was chosen for `intent`.
    pub fn count(&self, intent: Intent, action: Action) -> u64 {
        self.counters
            .get(&intent)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(0)
    }

    /// The action most frequently chosen for `intent`, if any was ever
    /// recorded. Ties break toward the lexicographically smaller action id
    /// so the result is deterministic.
    pub fn preferred(&self, intent: Intent) -> Option<Action> {
        let actions = self.counters.get(&intent)?;
        let mut best: Option<(Action, u64)> = None;
        for (&action, &count) in actions {
            let better = match best {
                None => true,
                Some((b, c)) => {
                    count > c || (count == c && action.to_string() < b.to_string())
                }
            };
            if better {
                best = Some((action, count));
            }
        }
        best.map(|(action, _)| action)
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

/// Collaborator that loads and saves the learning counters.
pub trait LearningPersistence: Send + Sync {
    fn load(&self) -> Result<LearningStore>;
    fn save(&self, store: &LearningStore) -> Result<()>;
}

/// JSON file persistence. A missing file loads as an empty store.
pub struct JsonLearningPersistence {
    path: PathBuf,
}

impl JsonLearningPersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LearningPersistence for JsonLearningPersistence {
    fn load(&self) -> Result<LearningStore> {
        if !self.path.exists() {
            return Ok(LearningStore::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let store: LearningStore = serde_json::from_str(&content)?;
        info!("Learning data loaded from {}", self.path.display());
        Ok(store)
    }

    fn save(&self, store: &LearningStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(store)?;
        std::fs::write(&self.path, content)?;
        info!("Learning data saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_has_no_preference() {
        let store = LearningStore::new();
        assert!(store.is_empty());
        assert!(store.preferred(Intent::PlayMusic).is_none());
        assert_eq!(store.count(Intent::PlayMusic, Action::OpenSpotify), 0);
    }

    #[test]
    fn test_record_and_count() {
        let mut store = LearningStore::new();
        store.record(Intent::PlayMusic, Action::OpenSpotify);
        store.record(Intent::PlayMusic, Action::OpenSpotify);
        store.record(Intent::PlayMusic, Action::SearchYoutubeMusic);

        assert_eq!(store.count(Intent::PlayMusic, Action::OpenSpotify), 2);
        assert_eq!(store.count(Intent::PlayMusic, Action::SearchYoutubeMusic), 1);
        assert_eq!(store.count(Intent::GetInfo, Action::SearchGoogle), 0);
    }

    #[test]
    fn test_preferred_picks_most_frequent() {
        let mut store = LearningStore::new();
        store.record(Intent::PlayMusic, Action::OpenSpotify);
        store.record(Intent::PlayMusic, Action::SearchYoutubeMusic);
        store.record(Intent::PlayMusic, Action::SearchYoutubeMusic);

        assert_eq!(
            store.preferred(Intent::PlayMusic),
            Some(Action::SearchYoutubeMusic)
        );
    }

    #[test]
    fn test_preferred_is_per_intent() {
        let mut store = LearningStore::new();
        store.record(Intent::PlayMusic, Action::OpenSpotify);
        store.record(Intent::GetInfo, Action::SearchWikipedia);

        assert_eq!(store.preferred(Intent::PlayMusic), Some(Action::OpenSpotify));
        assert_eq!(store.preferred(Intent::GetInfo), Some(Action::SearchWikipedia));
        assert!(store.preferred(Intent::Shopping).is_none());
    }

    #[test]
    fn test_preferred_tie_breaks_lexicographically() {
        let mut store = LearningStore::new();
        store.record(Intent::SearchWeb, Action::SearchGoogle);
        store.record(Intent::SearchWeb, Action::SearchBing);

        // "search_bing" < "search_google"
        assert_eq!(store.preferred(Intent::SearchWeb), Some(Action::SearchBing));
    }

    #[test]
    fn test_counters_grow_monotonically() {
        let mut store = LearningStore::new();
        for _ in 0..100 {
            store.record(Intent::GetInfo, Action::SearchGoogle);
        }
        assert_eq!(store.count(Intent::GetInfo, Action::SearchGoogle), 100);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut store = LearningStore::new();
        store.record(Intent::PlayMusic, Action::OpenSpotify);
        store.record(Intent::GetInfo, Action::SearchGoogle);

        let json = serde_json::to_string(&store).unwrap();
        let rt: LearningStore = serde_json::from_str(&json).unwrap();
        assert_eq!(rt.count(Intent::PlayMusic, Action::OpenSpotify), 1);
        assert_eq!(rt.count(Intent::GetInfo, Action::SearchGoogle), 1);
    }

    #[test]
    fn test_persistence_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonLearningPersistence::new(dir.path().join("missing.json"));
        let store = persistence.load().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_persistence_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonLearningPersistence::new(dir.path().join("learning.json"));

        let mut store = LearningStore::new();
        store.record(Intent::FindVideo, Action::SearchYoutube);
        store.record(Intent::FindVideo, Action::SearchYoutube);
        persistence.save(&store).unwrap();

        let reloaded = persistence.load().unwrap();
        assert_eq!(reloaded.count(Intent::FindVideo, Action::SearchYoutube), 2);
        assert_eq!(reloaded.preferred(Intent::FindVideo), Some(Action::SearchYoutube));
    }

    #[test]
    fn test_persistence_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("learning.json");
        let persistence = JsonLearningPersistence::new(&path);

        persistence.save(&LearningStore::new()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_persistence_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learning.json");
        std::fs::write(&path, "{ not json").unwrap();

        let persistence = JsonLearningPersistence::new(&path);
        assert!(persistence.load().is_err());
    }
}
