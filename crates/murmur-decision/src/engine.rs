//! The decision engine: one utterance in, one tagged decision out.
//!
//! Composes intent resolution, context boosting, the confidence
//! threshold, action selection, and automation-command mapping.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use murmur_core::config::DecisionConfig;
use murmur_core::types::{Action, Intent, SessionContext};
use murmur_intent::{ContextBooster, IntentMatch, IntentResolver};

use crate::error::DecisionError;
use crate::knowledge::KnowledgeBase;
use crate::learning::LearningStore;
use crate::mapping::{automation_command, clarification_message, low_confidence_message};
use crate::params::normalize_parameters;
use crate::selector::{ActionSelector, Selection};

/// Candidates offered alongside a clarification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alternatives {
    /// Low-confidence resolution: candidate intents, best first.
    Intents(Vec<Intent>),
    /// Ambiguous action set: candidate actions in declared order.
    Actions(Vec<Action>),
}

/// Why a decision produced nothing actionable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Blank input.
    EmptyCommand,
    /// The resolver produced zero candidates.
    NoMatch,
    /// A knowledge entry with no actions was hit (configuration defect).
    EmptyActionSet(Intent),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::EmptyCommand => write!(f, "empty command"),
            FailureReason::NoMatch => write!(f, "no intent matched"),
            FailureReason::EmptyActionSet(intent) => {
                write!(f, "knowledge entry for '{}' has no actions", intent)
            }
        }
    }
}

/// Result of one decision attempt.
#[derive(Debug, Clone)]
pub enum Decision {
    /// A concrete action was chosen and can be dispatched.
    Resolved {
        intent: Intent,
        action: Action,
        automation_command: String,
        parameters: HashMap<String, String>,
        confidence: f32,
    },
    /// The user must disambiguate before anything can be dispatched.
    NeedsClarification {
        intent: Option<Intent>,
        confidence: f32,
        message: String,
        alternatives: Alternatives,
    },
    /// Nothing actionable came out of this utterance.
    Failed { reason: FailureReason },
}

/// Stateless decision pipeline over a pattern bank and knowledge base.
///
/// Session context and learning counters are owned by the caller and
/// passed in by reference; the engine never mutates them.
pub struct DecisionEngine {
    resolver: IntentResolver,
    knowledge: KnowledgeBase,
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self::with_knowledge(config, KnowledgeBase::new())
    }

    pub fn with_knowledge(config: DecisionConfig, knowledge: KnowledgeBase) -> Self {
        Self {
            resolver: IntentResolver::new(),
            knowledge,
            config,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Resolve, boost, and rank the candidates for an utterance.
    fn ranked(&self, command: &str, context: &SessionContext) -> Vec<IntentMatch> {
        let raw = self.resolver.resolve(command);
        ContextBooster::boost(&raw, context)
    }

    /// Run the full decision pipeline for a fresh utterance.
    pub fn decide(
        &self,
        command: &str,
        context: &SessionContext,
        learning: &LearningStore,
    ) -> Decision {
        if command.trim().is_empty() {
            return Decision::Failed {
                reason: FailureReason::EmptyCommand,
            };
        }

        let ranked = self.ranked(command, context);
        if ranked.is_empty() {
            debug!(command, "No intent candidates");
            return Decision::Failed {
                reason: FailureReason::NoMatch,
            };
        }

        let best = &ranked[0];
        info!(intent = %best.intent, confidence = best.confidence, "Best intent match");

        if best.confidence < self.config.confidence_threshold {
            let alternatives: Vec<Intent> = ranked
                .iter()
                .take(self.config.max_alternatives)
                .map(|m| m.intent)
                .collect();
            return Decision::NeedsClarification {
                intent: Some(best.intent),
                confidence: best.confidence,
                message: low_confidence_message(&alternatives),
                alternatives: Alternatives::Intents(alternatives),
            };
        }

        self.decide_from_match(best, learning)
    }

    /// Decide for a user-confirmed intent, bypassing the confidence
    /// threshold. Used when a clarification answer names an intent.
    pub fn decide_for_intent(
        &self,
        command: &str,
        intent: Intent,
        context: &SessionContext,
        learning: &LearningStore,
    ) -> Decision {
        match self.match_for_intent(command, intent, context) {
            Some(m) => self.decide_from_match(&m, learning),
            None => Decision::Failed {
                reason: FailureReason::NoMatch,
            },
        }
    }

    /// Decide with both intent and action pinned by the user.
    pub fn decide_forced_action(
        &self,
        command: &str,
        intent: Intent,
        action: Action,
        context: &SessionContext,
    ) -> Decision {
        match self.match_for_intent(command, intent, context) {
            Some(m) => {
                let parameters = normalize_parameters(intent, &m.entities);
                Decision::Resolved {
                    intent,
                    action,
                    automation_command: automation_command(action, &parameters),
                    parameters,
                    confidence: m.confidence,
                }
            }
            None => Decision::Failed {
                reason: FailureReason::NoMatch,
            },
        }
    }

    fn match_for_intent(
        &self,
        command: &str,
        intent: Intent,
        context: &SessionContext,
    ) -> Option<IntentMatch> {
        self.ranked(command, context)
            .into_iter()
            .find(|m| m.intent == intent)
    }

    fn decide_from_match(&self, best: &IntentMatch, learning: &LearningStore) -> Decision {
        let parameters = normalize_parameters(best.intent, &best.entities);

        let Some(entry) = self.knowledge.get(best.intent) else {
            warn!(intent = %best.intent, "No knowledge entry for resolved intent");
            return Decision::Failed {
                reason: FailureReason::NoMatch,
            };
        };

        match ActionSelector::select(entry, learning) {
            Ok(Selection::Single(action)) => Decision::Resolved {
                intent: best.intent,
                action,
                automation_command: automation_command(action, &parameters),
                parameters,
                confidence: best.confidence,
            },
            Ok(Selection::NeedsClarification(actions)) => Decision::NeedsClarification {
                intent: Some(best.intent),
                confidence: best.confidence,
                message: clarification_message(best.intent, &actions, &parameters),
                alternatives: Alternatives::Actions(actions),
            },
            Err(DecisionError::EmptyActionSet(intent)) => Decision::Failed {
                reason: FailureReason::EmptyActionSet(intent),
            },
            Err(e) => {
                warn!(error = %e, "Action selection failed");
                Decision::Failed {
                    reason: FailureReason::NoMatch,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::types::{TimeBucket, TurnRecord};

    fn engine() -> DecisionEngine {
        DecisionEngine::new(DecisionConfig::default())
    }

    fn ctx() -> SessionContext {
        SessionContext::with_time_bucket(5, TimeBucket::Afternoon)
    }

    #[test]
    fn test_empty_command_fails() {
        let d = engine().decide("   ", &ctx(), &LearningStore::new());
        assert!(matches!(
            d,
            Decision::Failed {
                reason: FailureReason::EmptyCommand
            }
        ));
    }

    #[test]
    fn test_gibberish_is_no_match() {
        let d = engine().decide("purple elephants dance quietly", &ctx(), &LearningStore::new());
        assert!(matches!(
            d,
            Decision::Failed {
                reason: FailureReason::NoMatch
            }
        ));
    }

    #[test]
    fn test_what_is_resolves_to_google_search() {
        let d = engine().decide("what is photosynthesis", &ctx(), &LearningStore::new());
        match d {
            Decision::Resolved {
                intent,
                action,
                automation_command,
                parameters,
                confidence,
            } => {
                assert_eq!(intent, Intent::GetInfo);
                assert_eq!(action, Action::SearchGoogle);
                assert!(automation_command.contains("photosynthesis"));
                assert_eq!(parameters.get("topic").unwrap(), "photosynthesis");
                assert!(confidence >= 0.7);
            }
            other => panic!("Expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_low_confidence_asks_for_clarification() {
        let d = engine().decide("play something", &ctx(), &LearningStore::new());
        match d {
            Decision::NeedsClarification {
                intent,
                confidence,
                alternatives,
                message,
            } => {
                assert_eq!(intent, Some(Intent::PlayMusic));
                assert!(confidence < 0.7);
                assert!(message.contains("Did you mean"));
                match alternatives {
                    Alternatives::Intents(intents) => {
                        assert!(intents.contains(&Intent::PlayMusic));
                        assert!(intents.len() <= 3);
                    }
                    other => panic!("Expected intent alternatives, got {:?}", other),
                }
            }
            other => panic!("Expected NeedsClarification, got {:?}", other),
        }
    }

    #[test]
    fn test_ambiguous_actions_ask_for_clarification() {
        // search_web is not context sensitive and has two actions.
        let d = engine().decide("google for rust tutorials", &ctx(), &LearningStore::new());
        match d {
            Decision::NeedsClarification {
                intent,
                alternatives,
                message,
                ..
            } => {
                assert_eq!(intent, Some(Intent::SearchWeb));
                assert_eq!(
                    alternatives,
                    Alternatives::Actions(vec![Action::SearchGoogle, Action::SearchBing])
                );
                assert!(message.contains("search google"));
                assert!(message.contains("search bing"));
            }
            other => panic!("Expected NeedsClarification, got {:?}", other),
        }
    }

    #[test]
    fn test_context_sensitive_multi_action_resolves() {
        let d = engine().decide("play some music", &ctx(), &LearningStore::new());
        match d {
            Decision::Resolved { intent, action, automation_command, .. } => {
                assert_eq!(intent, Intent::PlayMusic);
                assert_eq!(action, Action::OpenSpotify);
                assert_eq!(automation_command, "open spotify.com");
            }
            other => panic!("Expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_learning_preference_overrides_priority() {
        let mut learning = LearningStore::new();
        learning.record(Intent::PlayMusic, Action::SearchYoutubeMusic);
        learning.record(Intent::PlayMusic, Action::SearchYoutubeMusic);

        let d = engine().decide("play some music", &ctx(), &learning);
        match d {
            Decision::Resolved { action, .. } => {
                assert_eq!(action, Action::SearchYoutubeMusic);
            }
            other => panic!("Expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_action_set_surfaced_distinctly() {
        let kb = KnowledgeBase::custom(vec![crate::knowledge::KnowledgeEntry {
            intent: Intent::GetInfo,
            actions: vec![],
            priority: vec![],
            context_sensitive: false,
            requires_topic: true,
        }]);
        let engine = DecisionEngine::with_knowledge(DecisionConfig::default(), kb);

        let d = engine.decide("what is photosynthesis", &ctx(), &LearningStore::new());
        assert!(matches!(
            d,
            Decision::Failed {
                reason: FailureReason::EmptyActionSet(Intent::GetInfo)
            }
        ));
    }

    #[test]
    fn test_context_boost_raises_confidence() {
        let learning = LearningStore::new();
        let d_cold = engine().decide("play something", &ctx(), &learning);

        let mut warm = ctx();
        warm.record_turn(TurnRecord {
            utterance: "play some music".to_string(),
            intent: Intent::PlayMusic,
            action: Action::OpenSpotify,
        });
        let d_warm = engine().decide("play something", &warm, &learning);

        let (c_cold, c_warm) = match (d_cold, d_warm) {
            (
                Decision::NeedsClarification { confidence: a, .. },
                Decision::NeedsClarification { confidence: b, .. },
            ) => (a, b),
            other => panic!("Expected two clarifications, got {:?}", other),
        };
        assert!(c_warm > c_cold);
        assert!((c_warm - c_cold - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_decide_for_intent_bypasses_threshold() {
        let d = engine().decide_for_intent(
            "play something",
            Intent::PlayMusic,
            &ctx(),
            &LearningStore::new(),
        );
        match d {
            Decision::Resolved { intent, action, .. } => {
                assert_eq!(intent, Intent::PlayMusic);
                assert_eq!(action, Action::OpenSpotify);
            }
            other => panic!("Expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_decide_for_intent_unmatched_intent_fails() {
        let d = engine().decide_for_intent(
            "play something",
            Intent::Shopping,
            &ctx(),
            &LearningStore::new(),
        );
        assert!(matches!(
            d,
            Decision::Failed {
                reason: FailureReason::NoMatch
            }
        ));
    }

    #[test]
    fn test_decide_forced_action() {
        let d = engine().decide_forced_action(
            "google for rust tutorials",
            Intent::SearchWeb,
            Action::SearchBing,
            &ctx(),
        );
        match d {
            Decision::Resolved { intent, action, parameters, .. } => {
                assert_eq!(intent, Intent::SearchWeb);
                assert_eq!(action, Action::SearchBing);
                assert_eq!(parameters.get("topic").unwrap(), "rust tutorials");
            }
            other => panic!("Expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(FailureReason::EmptyCommand.to_string(), "empty command");
        assert_eq!(FailureReason::NoMatch.to_string(), "no intent matched");
        assert_eq!(
            FailureReason::EmptyActionSet(Intent::GetInfo).to_string(),
            "knowledge entry for 'get_info' has no actions"
        );
    }
}
