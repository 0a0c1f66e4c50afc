//! Action-to-automation-command mapping and clarification phrasing.

use std::collections::HashMap;

use murmur_core::types::{Action, Intent};

fn param<'a>(params: &'a HashMap<String, String>, key: &str, default: &'a str) -> &'a str {
    params.get(key).map(String::as_str).unwrap_or(default)
}

/// Render the free-text automation command for an action with its
/// normalized parameters. Actions without a template fall back to the
/// action id.
pub fn automation_command(action: Action, params: &HashMap<String, String>) -> String {
    match action {
        Action::SearchYoutube => {
            format!("search youtube for {}", param(params, "topic", "videos"))
        }
        Action::SearchYoutubeMusic => {
            format!(
                "search youtube for {} music",
                param(params, "music_query", "music")
            )
        }
        Action::OpenSpotify => "open spotify.com".to_string(),
        Action::SearchGoogle => {
            format!("search for {}", param(params, "topic", "information"))
        }
        Action::SearchWikipedia => {
            format!(
                "search wikipedia for {}",
                param(params, "topic", "information")
            )
        }
        Action::SearchGoogleNews => {
            format!("search google news for {}", param(params, "topic", "headlines"))
        }
        Action::OpenWebsite => format!("open {}", param(params, "url", "google.com")),
        Action::OpenApplication => {
            format!("open {}", param(params, "application", "notepad"))
        }
        other => other.to_string(),
    }
}

/// Clarification prompt offered when the selector refuses to pick.
///
/// Two intents carry tailored templates; everything else enumerates up to
/// three candidate actions.
pub fn clarification_message(
    intent: Intent,
    actions: &[Action],
    params: &HashMap<String, String>,
) -> String {
    match intent {
        Intent::FindVideo => format!(
            "I can search YouTube for '{}' or check your local files. Which one?",
            param(params, "topic", "videos")
        ),
        Intent::PlayMusic => format!(
            "I can play '{}' on Spotify or YouTube Music. What's your preference?",
            param(params, "music_query", "music")
        ),
        _ => {
            let options: Vec<String> = actions
                .iter()
                .take(3)
                .map(|a| a.spoken_name())
                .collect();
            format!(
                "I have a few options for that: {}. Which should I use?",
                options.join(", ")
            )
        }
    }
}

/// Clarification prompt for a below-threshold best match, listing the
/// top candidate intents.
pub fn low_confidence_message(alternatives: &[Intent]) -> String {
    let options: Vec<String> = alternatives.iter().map(|i| i.spoken_name()).collect();
    format!(
        "I'm not entirely sure what you meant. Did you mean: {}?",
        options.join(", ")
    )
}
