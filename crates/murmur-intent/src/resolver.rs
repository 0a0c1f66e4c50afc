//! Confidence-scored intent resolution.
//!
//! Evaluates every intent's pattern tiers against one utterance and
//! produces a ranked list of candidate matches with extracted entities.

use std::collections::HashMap;

use murmur_core::types::Intent;

use crate::entities::{EntityExtractor, PRIMARY_ENTITY};
use crate::patterns::PatternBank;

/// One candidate intent for an utterance.
#[derive(Debug, Clone)]
pub struct IntentMatch {
    pub intent: Intent,
    /// Refined confidence in [0, 1].
    pub confidence: f32,
    /// Source text of the winning pattern.
    pub matched_pattern: String,
    /// Extracted entities: the winning pattern's first capture group under
    /// [`PRIMARY_ENTITY`], plus any generic entity hits.
    pub entities: HashMap<String, String>,
}

/// Resolves utterances against the pattern bank.
pub struct IntentResolver {
    bank: PatternBank,
    extractor: EntityExtractor,
}

impl Default for IntentResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentResolver {
    pub fn new() -> Self {
        Self {
            bank: PatternBank::new(),
            extractor: EntityExtractor::new(),
        }
    }

    /// Resolve an utterance into candidate intents, highest confidence
    /// first. Returns an empty list for blank input or when nothing
    /// matches.
    ///
    /// Per intent only the single best-scoring (tier, pattern) pair
    /// survives. A match score is the tier's base confidence, plus 0.1
    /// when the match spans the whole utterance, plus 0.1 weighted by the
    /// matched span's share of the utterance, capped at 1.0. The sort is
    /// stable: ties keep intent declaration order.
    pub fn resolve(&self, utterance: &str) -> Vec<IntentMatch> {
        let trimmed = utterance.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        let lowered = trimmed.to_lowercase();

        // Generic entities come from the original-case text; pattern
        // matching runs on the lowercased form.
        let generic_entities = self.extractor.extract(trimmed);

        let mut matches = Vec::new();
        for (intent, patterns) in self.bank.iter() {
            let mut best: Option<(f32, &'static str, Option<String>)> = None;

            for pattern in patterns {
                let Some(caps) = pattern.regex.captures(&lowered) else {
                    continue;
                };
                let whole = caps.get(0).map_or("", |m| m.as_str());

                let mut score = pattern.tier.base_confidence();
                if whole == lowered {
                    score += 0.1;
                }
                score += 0.1 * (whole.len() as f32 / lowered.len() as f32);
                let score = score.min(1.0);

                if best.as_ref().map_or(true, |(b, _, _)| score > *b) {
                    let primary = caps
                        .get(1)
                        .map(|m| m.as_str().trim().to_string())
                        .filter(|s| !s.is_empty());
                    best = Some((score, pattern.source, primary));
                }
            }

            if let Some((confidence, source, primary)) = best {
                let mut entities = generic_entities.clone();
                if let Some(primary) = primary {
                    entities.insert(PRIMARY_ENTITY.to_string(), primary);
                }
                matches.push(IntentMatch {
                    intent: *intent,
                    confidence,
                    matched_pattern: source.to_string(),
                    entities,
                });
            }
        }

        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        matches
    }
}
