//! Context-based confidence boosting.
//!
//! Adjusts resolver output using the session's last intent and the
//! current time-of-day bucket, then re-ranks. Boosting is monotonic: a
//! match's confidence never decreases.

use murmur_core::types::{Intent, SessionContext, TimeBucket};

use crate::resolver::IntentMatch;

/// Boost applied when a match's intent equals the session's last intent.
const LAST_INTENT_BOOST: f32 = 0.1;
/// Boost applied when a match's intent is favored by the time bucket.
const TIME_BUCKET_BOOST: f32 = 0.05;

/// Pure confidence adjustment over a copy of the resolver's output.
pub struct ContextBooster;

impl ContextBooster {
    /// Intents favored in the given time bucket.
    pub fn boosted_intents(bucket: TimeBucket) -> &'static [Intent] {
        match bucket {
            TimeBucket::Morning => &[Intent::NewsUpdate, Intent::Productivity],
            TimeBucket::Afternoon => &[],
            TimeBucket::Evening => &[Intent::Entertainment, Intent::FindVideo],
            TimeBucket::Night => &[Intent::Entertainment, Intent::PlayMusic],
        }
    }

    /// Apply both boosting rules independently and additively, each capped
    /// at 1.0, then re-sort descending. The reordering may change the
    /// winning intent relative to the raw ranking; that is intentional.
    ///
    /// The input slice is left untouched; callers should use the returned
    /// list from here on.
    pub fn boost(matches: &[IntentMatch], context: &SessionContext) -> Vec<IntentMatch> {
        let mut boosted: Vec<IntentMatch> = matches.to_vec();
        let favored = Self::boosted_intents(context.time_bucket());

        for m in &mut boosted {
            if context.last_intent() == Some(m.intent) {
                m.confidence = (m.confidence + LAST_INTENT_BOOST).min(1.0);
            }
            if favored.contains(&m.intent) {
                m.confidence = (m.confidence + TIME_BUCKET_BOOST).min(1.0);
            }
        }

        boosted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        boosted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn m(intent: Intent, confidence: f32) -> IntentMatch {
        IntentMatch {
            intent,
            confidence,
            matched_pattern: String::new(),
            entities: HashMap::new(),
        }
    }

    fn ctx(bucket: TimeBucket) -> SessionContext {
        SessionContext::with_time_bucket(5, bucket)
    }

    #[test]
    fn test_no_context_no_change() {
        let matches = vec![m(Intent::GetInfo, 0.8), m(Intent::SearchWeb, 0.6)];
        let boosted = ContextBooster::boost(&matches, &ctx(TimeBucket::Afternoon));
        assert!((boosted[0].confidence - 0.8).abs() < f32::EPSILON);
        assert!((boosted[1].confidence - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_last_intent_boost() {
        let mut context = ctx(TimeBucket::Afternoon);
        context.record_turn(murmur_core::types::TurnRecord {
            utterance: "search the web".to_string(),
            intent: Intent::SearchWeb,
            action: murmur_core::types::Action::SearchGoogle,
        });

        let matches = vec![m(Intent::GetInfo, 0.8), m(Intent::SearchWeb, 0.75)];
        let boosted = ContextBooster::boost(&matches, &context);

        // SearchWeb gains 0.1 and overtakes GetInfo.
        assert_eq!(boosted[0].intent, Intent::SearchWeb);
        assert!((boosted[0].confidence - 0.85).abs() < 1e-6);
        assert_eq!(boosted[1].intent, Intent::GetInfo);
    }

    #[test]
    fn test_time_bucket_boost() {
        let matches = vec![m(Intent::PlayMusic, 0.6)];
        let boosted = ContextBooster::boost(&matches, &ctx(TimeBucket::Night));
        assert!((boosted[0].confidence - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_afternoon_boosts_nothing() {
        for intent in [Intent::PlayMusic, Intent::NewsUpdate, Intent::Entertainment] {
            let boosted = ContextBooster::boost(&[m(intent, 0.5)], &ctx(TimeBucket::Afternoon));
            assert!((boosted[0].confidence - 0.5).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_both_rules_stack() {
        let mut context = ctx(TimeBucket::Night);
        context.record_turn(murmur_core::types::TurnRecord {
            utterance: "play music".to_string(),
            intent: Intent::PlayMusic,
            action: murmur_core::types::Action::OpenSpotify,
        });

        let boosted = ContextBooster::boost(&[m(Intent::PlayMusic, 0.6)], &context);
        // 0.6 + 0.1 (last intent) + 0.05 (night bucket)
        assert!((boosted[0].confidence - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_boost_capped_at_one() {
        let mut context = ctx(TimeBucket::Night);
        context.record_turn(murmur_core::types::TurnRecord {
            utterance: "play music".to_string(),
            intent: Intent::PlayMusic,
            action: murmur_core::types::Action::OpenSpotify,
        });

        let boosted = ContextBooster::boost(&[m(Intent::PlayMusic, 0.98)], &context);
        assert!((boosted[0].confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_boost_is_monotonic() {
        let mut context = ctx(TimeBucket::Evening);
        context.record_turn(murmur_core::types::TurnRecord {
            utterance: "what is rust".to_string(),
            intent: Intent::GetInfo,
            action: murmur_core::types::Action::SearchGoogle,
        });

        let matches = vec![
            m(Intent::GetInfo, 0.4),
            m(Intent::Entertainment, 0.4),
            m(Intent::Shopping, 0.4),
        ];
        let boosted = ContextBooster::boost(&matches, &context);
        for original in &matches {
            let after = boosted.iter().find(|b| b.intent == original.intent).unwrap();
            assert!(after.confidence >= original.confidence);
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let matches = vec![m(Intent::PlayMusic, 0.6)];
        let _ = ContextBooster::boost(&matches, &ctx(TimeBucket::Night));
        assert!((matches[0].confidence - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_reorder_changes_winner() {
        // Evening favors find_video; a near-tie flips.
        let matches = vec![m(Intent::GetInfo, 0.72), m(Intent::FindVideo, 0.70)];
        let boosted = ContextBooster::boost(&matches, &ctx(TimeBucket::Evening));
        assert_eq!(boosted[0].intent, Intent::FindVideo);
    }

    #[test]
    fn test_stable_order_on_ties() {
        let matches = vec![
            m(Intent::GetInfo, 0.5),
            m(Intent::SearchWeb, 0.5),
            m(Intent::Shopping, 0.5),
        ];
        let boosted = ContextBooster::boost(&matches, &ctx(TimeBucket::Afternoon));
        assert_eq!(boosted[0].intent, Intent::GetInfo);
        assert_eq!(boosted[1].intent, Intent::SearchWeb);
        assert_eq!(boosted[2].intent, Intent::Shopping);
    }
}
