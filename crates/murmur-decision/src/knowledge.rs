//! Static intent-to-actions knowledge base.
//!
//! Loaded once at startup and read-only thereafter. Each entry lists the
//! actions an intent can be fulfilled by, a priority ordering used as a
//! tie-break, and flags controlling selection behavior.

use std::collections::HashMap;

use murmur_core::types::{Action, Intent};

/// One knowledge base entry.
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    pub intent: Intent,
    /// Ordered candidate actions. Duplicates are disallowed.
    pub actions: Vec<Action>,
    /// Ordered subsequence of `actions` consulted first when picking
    /// deterministically.
    pub priority: Vec<Action>,
    /// Whether the selector may pick on its own from multiple actions.
    pub context_sensitive: bool,
    /// Whether the intent is only useful with a topic-like parameter.
    pub requires_topic: bool,
}

/// Intent -> entry table.
pub struct KnowledgeBase {
    entries: HashMap<Intent, KnowledgeEntry>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

fn entry(
    intent: Intent,
    actions: &[Action],
    priority: &[Action],
    context_sensitive: bool,
    requires_topic: bool,
) -> KnowledgeEntry {
    for (i, a) in actions.iter().enumerate() {
        assert!(
            !actions[..i].contains(a),
            "duplicate action {} for intent {}",
            a,
            intent
        );
    }
    for p in priority {
        assert!(
            actions.contains(p),
            "priority action {} not in action set for intent {}",
            p,
            intent
        );
    }
    KnowledgeEntry {
        intent,
        actions: actions.to_vec(),
        priority: priority.to_vec(),
        context_sensitive,
        requires_topic,
    }
}

impl KnowledgeBase {
    /// Build the default knowledge base.
    pub fn new() -> Self {
        use Action::*;
        use Intent::*;

        let entries = vec![
            // Entertainment & media
            entry(FindVideo, &[SearchYoutube, CheckLocalVideos], &[SearchYoutube], true, true),
            entry(PlayMusic, &[OpenSpotify, SearchYoutubeMusic], &[OpenSpotify], true, false),
            entry(
                Entertainment,
                &[SearchYoutube, OpenNetflix, OpenSpotify],
                &[SearchYoutube],
                true,
                false,
            ),
            // Information & search
            entry(GetInfo, &[SearchGoogle, SearchWikipedia], &[SearchGoogle], true, true),
            entry(SearchWeb, &[SearchGoogle, SearchBing], &[SearchGoogle], false, true),
            entry(
                NewsUpdate,
                &[SearchGoogleNews, OpenNewsWebsite],
                &[SearchGoogleNews],
                true,
                false,
            ),
            // Web navigation
            entry(
                Intent::OpenWebsite,
                &[Action::OpenWebsite],
                &[Action::OpenWebsite],
                false,
                true,
            ),
            entry(
                SocialMedia,
                &[OpenFacebook, OpenTwitter, OpenInstagram],
                &[OpenFacebook],
                true,
                false,
            ),
            // System & applications
            entry(
                SystemCheck,
                &[GetSystemStatus, CheckPerformance],
                &[GetSystemStatus],
                false,
                false,
            ),
            entry(LaunchApp, &[OpenApplication], &[OpenApplication], false, true),
            // Productivity & work
            entry(WorkTask, &[OpenNotepad, OpenCalculator], &[OpenNotepad], true, false),
            entry(
                FileManagement,
                &[OpenExplorer, SearchFiles],
                &[OpenExplorer],
                true,
                false,
            ),
            entry(
                Productivity,
                &[OpenCalendar, CreateReminder],
                &[OpenCalendar],
                true,
                false,
            ),
            // Learning & education
            entry(
                Learning,
                &[SearchEducationalContent, FindTutorials],
                &[SearchEducationalContent],
                true,
                true,
            ),
            // Communication
            entry(Communication, &[OpenEmail, OpenMessaging], &[OpenEmail], true, false),
            // Shopping & commerce
            entry(
                Shopping,
                &[SearchProducts, OpenShoppingSite],
                &[SearchProducts],
                true,
                true,
            ),
        ];

        Self::custom(entries)
    }

    /// Build a knowledge base from explicit entries. Used by tests and by
    /// embedders that want a narrower action surface.
    pub fn custom(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.intent, e)).collect(),
        }
    }

    pub fn get(&self, intent: Intent) -> Option<&KnowledgeEntry> {
        self.entries.get(&intent)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
