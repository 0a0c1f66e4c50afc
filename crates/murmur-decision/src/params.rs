//! Parameter normalization.
//!
//! Remaps the resolver's generic primary entity onto a semantically named
//! parameter per intent family. Intents outside the table keep the raw
//! entity keys untouched.

use std::collections::HashMap;

use murmur_core::types::Intent;
use murmur_intent::PRIMARY_ENTITY;

/// The canonical parameter name the primary entity maps to for an intent.
pub fn canonical_parameter(intent: Intent) -> Option<&'static str> {
    match intent {
        Intent::FindVideo | Intent::GetInfo | Intent::SearchWeb | Intent::Learning => {
            Some("topic")
        }
        Intent::PlayMusic => Some("music_query"),
        Intent::OpenWebsite => Some("url"),
        Intent::LaunchApp => Some("application"),
        _ => None,
    }
}

/// Copy the extracted entities and add the canonical key when the intent
/// has one and a primary entity was captured. The `primary_entity` key is
/// retained alongside the canonical alias.
pub fn normalize_parameters(
    intent: Intent,
    entities: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut parameters = entities.clone();
    if let (Some(primary), Some(key)) = (entities.get(PRIMARY_ENTITY), canonical_parameter(intent))
    {
        parameters.insert(key.to_string(), primary.clone());
    }
    parameters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(primary: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(PRIMARY_ENTITY.to_string(), primary.to_string());
        map
    }

    #[test]
    fn test_topic_family() {
        for intent in [
            Intent::FindVideo,
            Intent::GetInfo,
            Intent::SearchWeb,
            Intent::Learning,
        ] {
            let params = normalize_parameters(intent, &entities("rust"));
            assert_eq!(params.get("topic").unwrap(), "rust");
            assert_eq!(params.get(PRIMARY_ENTITY).unwrap(), "rust");
        }
    }

    #[test]
    fn test_music_query() {
        let params = normalize_parameters(Intent::PlayMusic, &entities("jazz"));
        assert_eq!(params.get("music_query").unwrap(), "jazz");
    }

    #[test]
    fn test_url() {
        let params = normalize_parameters(Intent::OpenWebsite, &entities("docs.rs"));
        assert_eq!(params.get("url").unwrap(), "docs.rs");
    }

    #[test]
    fn test_application() {
        let params = normalize_parameters(Intent::LaunchApp, &entities("notepad"));
        assert_eq!(params.get("application").unwrap(), "notepad");
    }

    #[test]
    fn test_unmapped_intent_keeps_raw_keys() {
        let params = normalize_parameters(Intent::SystemCheck, &entities("cpu"));
        assert_eq!(params.get(PRIMARY_ENTITY).unwrap(), "cpu");
        assert!(params.get("topic").is_none());
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_no_primary_entity_is_noop() {
        let mut map = HashMap::new();
        map.insert("time".to_string(), "3:00 pm".to_string());
        let params = normalize_parameters(Intent::GetInfo, &map);
        assert_eq!(params, map);
    }

    #[test]
    fn test_generic_entities_preserved() {
        let mut map = entities("the report");
        map.insert("person".to_string(), "Alice".to_string());
        let params = normalize_parameters(Intent::SearchWeb, &map);
        assert_eq!(params.get("topic").unwrap(), "the report");
        assert_eq!(params.get("person").unwrap(), "Alice");
    }
}
