//! Core types and value objects shared across the Murmur crates.
//!
//! Defines the intent and action vocabularies, time-of-day buckets, and
//! the per-session conversation context.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// =============================================================================
// Enums
// =============================================================================

/// Normalized categories of user goal, detectable from a command utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    FindVideo,
    PlayMusic,
    Entertainment,
    GetInfo,
    SearchWeb,
    NewsUpdate,
    OpenWebsite,
    SocialMedia,
    SystemCheck,
    LaunchApp,
    WorkTask,
    FileManagement,
    Productivity,
    Learning,
    Communication,
    Shopping,
}

impl Intent {
    /// Human-readable form with separators rendered as spaces,
    /// e.g. `find_video` -> `"find video"`. Used in clarification prompts
    /// and when matching a free-text reply against candidate intents.
    pub fn spoken_name(&self) -> String {
        self.to_string().replace('_', " ")
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intent::FindVideo => "find_video",
            Intent::PlayMusic => "play_music",
            Intent::Entertainment => "entertainment",
            Intent::GetInfo => "get_info",
            Intent::SearchWeb => "search_web",
            Intent::NewsUpdate => "news_update",
            Intent::OpenWebsite => "open_website",
            Intent::SocialMedia => "social_media",
            Intent::SystemCheck => "system_check",
            Intent::LaunchApp => "launch_app",
            Intent::WorkTask => "work_task",
            Intent::FileManagement => "file_management",
            Intent::Productivity => "productivity",
            Intent::Learning => "learning",
            Intent::Communication => "communication",
            Intent::Shopping => "shopping",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Intent {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "find_video" => Ok(Intent::FindVideo),
            "play_music" => Ok(Intent::PlayMusic),
            "entertainment" => Ok(Intent::Entertainment),
            "get_info" => Ok(Intent::GetInfo),
            "search_web" => Ok(Intent::SearchWeb),
            "news_update" => Ok(Intent::NewsUpdate),
            "open_website" => Ok(Intent::OpenWebsite),
            "social_media" => Ok(Intent::SocialMedia),
            "system_check" => Ok(Intent::SystemCheck),
            "launch_app" => Ok(Intent::LaunchApp),
            "work_task" => Ok(Intent::WorkTask),
            "file_management" => Ok(Intent::FileManagement),
            "productivity" => Ok(Intent::Productivity),
            "learning" => Ok(Intent::Learning),
            "communication" => Ok(Intent::Communication),
            "shopping" => Ok(Intent::Shopping),
            _ => Err(format!("Unknown intent: {}", s)),
        }
    }
}

/// Concrete operations an intent can be fulfilled by.
///
/// Each action maps to exactly one automation command template; the
/// knowledge base decides which actions are reachable from which intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SearchYoutube,
    CheckLocalVideos,
    OpenSpotify,
    SearchYoutubeMusic,
    OpenNetflix,
    SearchGoogle,
    SearchWikipedia,
    SearchBing,
    SearchGoogleNews,
    OpenNewsWebsite,
    OpenWebsite,
    OpenFacebook,
    OpenTwitter,
    OpenInstagram,
    GetSystemStatus,
    CheckPerformance,
    OpenApplication,
    OpenNotepad,
    OpenCalculator,
    OpenExplorer,
    SearchFiles,
    OpenCalendar,
    CreateReminder,
    SearchEducationalContent,
    FindTutorials,
    OpenEmail,
    OpenMessaging,
    SearchProducts,
    OpenShoppingSite,
}

impl Action {
    /// Human-readable form with separators rendered as spaces,
    /// e.g. `search_youtube` -> `"search youtube"`.
    pub fn spoken_name(&self) -> String {
        self.to_string().replace('_', " ")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::SearchYoutube => "search_youtube",
            Action::CheckLocalVideos => "check_local_videos",
            Action::OpenSpotify => "open_spotify",
            Action::SearchYoutubeMusic => "search_youtube_music",
            Action::OpenNetflix => "open_netflix",
            Action::SearchGoogle => "search_google",
            Action::SearchWikipedia => "search_wikipedia",
            Action::SearchBing => "search_bing",
            Action::SearchGoogleNews => "search_google_news",
            Action::OpenNewsWebsite => "open_news_website",
            Action::OpenWebsite => "open_website",
            Action::OpenFacebook => "open_facebook",
            Action::OpenTwitter => "open_twitter",
            Action::OpenInstagram => "open_instagram",
            Action::GetSystemStatus => "get_system_status",
            Action::CheckPerformance => "check_performance",
            Action::OpenApplication => "open_application",
            Action::OpenNotepad => "open_notepad",
            Action::OpenCalculator => "open_calculator",
            Action::OpenExplorer => "open_explorer",
            Action::SearchFiles => "search_files",
            Action::OpenCalendar => "open_calendar",
            Action::CreateReminder => "create_reminder",
            Action::SearchEducationalContent => "search_educational_content",
            Action::FindTutorials => "find_tutorials",
            Action::OpenEmail => "open_email",
            Action::OpenMessaging => "open_messaging",
            Action::SearchProducts => "search_products",
            Action::OpenShoppingSite => "open_shopping_site",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Action {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search_youtube" => Ok(Action::SearchYoutube),
            "check_local_videos" => Ok(Action::CheckLocalVideos),
            "open_spotify" => Ok(Action::OpenSpotify),
            "search_youtube_music" => Ok(Action::SearchYoutubeMusic),
            "open_netflix" => Ok(Action::OpenNetflix),
            "search_google" => Ok(Action::SearchGoogle),
            "search_wikipedia" => Ok(Action::SearchWikipedia),
            "search_bing" => Ok(Action::SearchBing),
            "search_google_news" => Ok(Action::SearchGoogleNews),
            "open_news_website" => Ok(Action::OpenNewsWebsite),
            "open_website" => Ok(Action::OpenWebsite),
            "open_facebook" => Ok(Action::OpenFacebook),
            "open_twitter" => Ok(Action::OpenTwitter),
            "open_instagram" => Ok(Action::OpenInstagram),
            "get_system_status" => Ok(Action::GetSystemStatus),
            "check_performance" => Ok(Action::CheckPerformance),
            "open_application" => Ok(Action::OpenApplication),
            "open_notepad" => Ok(Action::OpenNotepad),
            "open_calculator" => Ok(Action::OpenCalculator),
            "open_explorer" => Ok(Action::OpenExplorer),
            "search_files" => Ok(Action::SearchFiles),
            "open_calendar" => Ok(Action::OpenCalendar),
            "create_reminder" => Ok(Action::CreateReminder),
            "search_educational_content" => Ok(Action::SearchEducationalContent),
            "find_tutorials" => Ok(Action::FindTutorials),
            "open_email" => Ok(Action::OpenEmail),
            "open_messaging" => Ok(Action::OpenMessaging),
            "search_products" => Ok(Action::SearchProducts),
            "open_shopping_site" => Ok(Action::OpenShoppingSite),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// Coarse time-of-day bucket used for context boosting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeBucket {
    /// Bucket for an hour-of-day in 0..24.
    ///
    /// 5-11 morning, 12-16 afternoon, 17-20 evening, everything else night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeBucket::Morning,
            12..=16 => TimeBucket::Afternoon,
            17..=20 => TimeBucket::Evening,
            _ => TimeBucket::Night,
        }
    }

    /// Bucket for the current local time.
    pub fn current() -> Self {
        Self::from_hour(chrono::Local::now().hour())
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeBucket::Morning => "morning",
            TimeBucket::Afternoon => "afternoon",
            TimeBucket::Evening => "evening",
            TimeBucket::Night => "night",
        };
        write!(f, "{}", s)
    }
}

// =============================================================================
// Session context
// =============================================================================

/// One successfully resolved turn, kept for context awareness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub utterance: String,
    pub intent: Intent,
    pub action: Action,
}

/// Short-lived conversational context for one session.
///
/// Owned exclusively by the dialogue coordinator and mutated only after a
/// successful decision. `recent_turns` is bounded: the oldest record is
/// dropped once the configured context window is exceeded.
#[derive(Debug, Clone)]
pub struct SessionContext {
    last_intent: Option<Intent>,
    time_bucket: TimeBucket,
    recent_turns: VecDeque<TurnRecord>,
    capacity: usize,
}

impl SessionContext {
    /// Create a context with the given window size, bucketing the current
    /// local time.
    pub fn new(capacity: usize) -> Self {
        Self::with_time_bucket(capacity, TimeBucket::current())
    }

    /// Create a context with an explicit time bucket (used by tests and
    /// by callers that pin the bucket at session start).
    pub fn with_time_bucket(capacity: usize, time_bucket: TimeBucket) -> Self {
        Self {
            last_intent: None,
            time_bucket,
            recent_turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn last_intent(&self) -> Option<Intent> {
        self.last_intent
    }

    pub fn time_bucket(&self) -> TimeBucket {
        self.time_bucket
    }

    pub fn recent_turns(&self) -> &VecDeque<TurnRecord> {
        &self.recent_turns
    }

    /// Record a resolved turn, evicting the oldest entry beyond the window.
    pub fn record_turn(&mut self, record: TurnRecord) {
        self.last_intent = Some(record.intent);
        self.recent_turns.push_back(record);
        while self.recent_turns.len() > self.capacity {
            self.recent_turns.pop_front();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
