//! Tiered regex pattern bank for intent detection.
//!
//! Every intent carries up to three confidence tiers, each with an ordered
//! list of patterns. Patterns are compiled once at startup and matched
//! against the lowercased, trimmed utterance.

use regex::Regex;

use murmur_core::types::Intent;

/// Confidence tier of a pattern. Higher tiers are evaluated first and
/// contribute a higher base score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// Base confidence contributed by a match in this tier.
    pub fn base_confidence(self) -> f32 {
        match self {
            ConfidenceTier::High => 0.9,
            ConfidenceTier::Medium => 0.6,
            ConfidenceTier::Low => 0.3,
        }
    }
}

/// A single compiled pattern with its tier and source text.
pub(crate) struct TieredPattern {
    pub(crate) regex: Regex,
    pub(crate) source: &'static str,
    pub(crate) tier: ConfidenceTier,
}

/// Static table of intent patterns, compiled once and reused.
///
/// Intents keep their declaration order so that equal-confidence matches
/// rank deterministically.
pub struct PatternBank {
    entries: Vec<(Intent, Vec<TieredPattern>)>,
}

impl Default for PatternBank {
    fn default() -> Self {
        Self::new()
    }
}

type PatternRow = (
    Intent,
    &'static [&'static str],
    &'static [&'static str],
    &'static [&'static str],
);

impl PatternBank {
    /// Build the full pattern table. Panics on an invalid pattern, which is
    /// a programming error caught at startup rather than per request.
    pub fn new() -> Self {
        // (intent, high tier, medium tier, low tier)
        const TABLE: &[PatternRow] = &[
            (
                Intent::FindVideo,
                &[
                    r"show me.*video.*about\s+(.+)",
                    r"find.*video.*on\s+(.+)",
                    r"search.*video.*(.+)",
                    r"want.*watch.*video.*(.+)",
                ],
                &[
                    r"show me.*(.+).*video",
                    r"find.*(.+).*video",
                    r"watch.*(.+)",
                    r"video.*(.+)",
                ],
                &[r"video", r"watch", r"show"],
            ),
            (
                Intent::PlayMusic,
                &[
                    r"play.*music.*by\s+(.+)",
                    r"listen.*to\s+(.+).*music",
                    r"put on.*(.+).*music",
                ],
                &[r"play.*music", r"listen.*music", r"some.*music"],
                &[r"music", r"song", r"play"],
            ),
            (
                Intent::GetInfo,
                &[
                    r"what.*is\s+(.+)",
                    r"tell me.*about\s+(.+)",
                    r"search.*for\s+(.+)",
                    r"explain\s+(.+)",
                ],
                &[r"what.*(.+)", r"about.*(.+)", r"info.*(.+)"],
                &[r"what", r"info", r"tell"],
            ),
            (
                Intent::OpenWebsite,
                &[r"open\s+(https?://[^\s]+)", r"go to\s+(www\.[^\s]+)"],
                &[
                    r"open\s+([a-zA-Z0-9-]+\.[a-zA-Z]{2,})",
                    r"go to\s+([a-zA-Z0-9-]+\.[a-zA-Z]{2,})",
                ],
                &[r"open.*\.com", r"website"],
            ),
            (
                Intent::SystemCheck,
                &[
                    r"system.*status",
                    r"check.*system.*performance",
                    r"performance.*report",
                ],
                &[r"check.*system", r"system.*info", r"performance"],
                &[r"system", r"status", r"check"],
            ),
            (
                Intent::LaunchApp,
                &[
                    r"open\s+(notepad|calculator|paint|word|excel)",
                    r"launch\s+(notepad|calculator|paint)",
                ],
                &[r"open\s+([a-zA-Z]+)", r"launch\s+([a-zA-Z]+)"],
                &[r"open", r"launch", r"start"],
            ),
            (
                Intent::SearchWeb,
                &[
                    r"google.*for\s+(.+)",
                    r"search.*google.*(.+)",
                    r"look up.*(.+).*online",
                ],
                &[r"google.*(.+)", r"search.*(.+)", r"look up.*(.+)"],
                &[r"google", r"search"],
            ),
            (
                Intent::Entertainment,
                &[r"entertain.*me", r"something.*fun.*to.*do", r"i.*am.*bored"],
                &[r"something.*fun", r"bored", r"entertainment"],
                &[r"fun", r"entertain"],
            ),
            (
                Intent::WorkTask,
                &[r"need.*help.*with.*work", r"work.*related.*task"],
                &[r"work.*task", r"office.*task", r"document.*work"],
                &[r"work", r"office"],
            ),
            (
                Intent::FileManagement,
                &[r"find.*file.*named\s+(.+)", r"open.*folder.*(.+)"],
                &[r"find.*file", r"open.*folder", r"browse.*files"],
                &[r"file", r"folder", r"explorer"],
            ),
            (
                Intent::NewsUpdate,
                &[r"latest.*news.*about\s+(.+)", r"news.*today.*(.+)"],
                &[r"latest.*news", r"news.*today", r"current.*events"],
                &[r"news", r"events"],
            ),
            (
                Intent::SocialMedia,
                &[
                    r"open\s+(facebook|twitter|instagram|linkedin|tiktok)",
                    r"check\s+(facebook|twitter|instagram)",
                ],
                &[r"social.*media", r"check.*social"],
                &[r"social", r"facebook", r"twitter"],
            ),
            (
                Intent::Learning,
                &[
                    r"learn.*about\s+(.+)",
                    r"tutorial.*on\s+(.+)",
                    r"teach.*me\s+(.+)",
                ],
                &[r"learn.*(.+)", r"tutorial.*(.+)", r"how.*to.*(.+)"],
                &[r"learn", r"tutorial", r"teach"],
            ),
            (
                Intent::Productivity,
                &[
                    r"schedule.*appointment.*(.+)",
                    r"reminder.*for\s+(.+)",
                    r"organize.*(.+)",
                ],
                &[r"schedule.*(.+)", r"calendar.*(.+)", r"reminder.*(.+)"],
                &[r"schedule", r"calendar", r"reminder"],
            ),
            (
                Intent::Communication,
                &[r"send.*email.*to\s+(.+)", r"call\s+(.+)", r"message\s+(.+)"],
                &[r"send.*email", r"make.*call", r"send.*message"],
                &[r"email", r"call", r"message"],
            ),
            (
                Intent::Shopping,
                &[r"buy\s+(.+)", r"shop.*for\s+(.+)", r"purchase\s+(.+)"],
                &[r"shopping.*(.+)", r"buy.*(.+)", r"price.*(.+)"],
                &[r"buy", r"shop", r"purchase"],
            ),
        ];

        let mut entries = Vec::with_capacity(TABLE.len());
        for (intent, high, medium, low) in TABLE {
            let mut patterns = Vec::new();
            for (tier, sources) in [
                (ConfidenceTier::High, high),
                (ConfidenceTier::Medium, medium),
                (ConfidenceTier::Low, low),
            ] {
                for &source in *sources {
                    patterns.push(TieredPattern {
                        regex: Regex::new(source).expect("Invalid intent pattern"),
                        source,
                        tier,
                    });
                }
            }
            entries.push((*intent, patterns));
        }

        Self { entries }
    }

    /// Number of intents in the bank.
    pub fn intent_count(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &(Intent, Vec<TieredPattern>)> {
        self.entries.iter()
    }
}
