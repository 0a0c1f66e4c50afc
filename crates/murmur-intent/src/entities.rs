//! Generic entity extraction.
//!
//! Independent regex extractors for time, date, person, and location
//! mentions. These run against the original-case utterance and never
//! influence confidence scoring.

use regex::Regex;
use std::collections::HashMap;

/// Key under which the winning pattern's first capture group is stored.
pub const PRIMARY_ENTITY: &str = "primary_entity";

/// Regex-based extractors for generic entities.
///
/// For each entity type the first matching pattern wins. Person and
/// location extractors key on capitalized words, so they are compiled
/// case-sensitively.
pub struct EntityExtractor {
    extractors: Vec<(&'static str, Vec<Regex>)>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor {
    pub fn new() -> Self {
        let table: &[(&'static str, &[&str])] = &[
            (
                "time",
                &[
                    r"(?i)at\s+(\d{1,2}:\d{2}\s*(?:am|pm)?)",
                    r"(?i)(\d{1,2}\s*(?:am|pm))",
                ],
            ),
            (
                "date",
                &[r"(\d{1,2}/\d{1,2}/\d{2,4})", r"(\d{1,2}-\d{1,2}-\d{2,4})"],
            ),
            (
                "person",
                &[r"(?:call|to|message|email)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)"],
            ),
            (
                "location",
                &[r"(?:in|at|near)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)"],
            ),
        ];

        let extractors = table
            .iter()
            .map(|(name, patterns)| {
                let compiled = patterns
                    .iter()
                    .map(|p| Regex::new(p).expect("Invalid entity pattern"))
                    .collect();
                (*name, compiled)
            })
            .collect();

        Self { extractors }
    }

    /// Run every extractor against `text` and collect the hits.
    ///
    /// The first matching pattern per entity type wins; entity types with
    /// no match are absent from the result.
    pub fn extract(&self, text: &str) -> HashMap<String, String> {
        let mut entities = HashMap::new();
        for (name, patterns) in &self.extractors {
            for pattern in patterns {
                if let Some(caps) = pattern.captures(text) {
                    if let Some(value) = caps.get(1) {
                        entities.insert(name.to_string(), value.as_str().to_string());
                        break;
                    }
                }
            }
        }
        entities
    }
}
