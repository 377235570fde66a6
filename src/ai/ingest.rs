use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::ai::common::{build_chat_body, parse_chat_content, send_chat, strip_code_fences};
use crate::ai::config::AiConfig;
use crate::ai::prompts::INGEST_PROMPT;
use crate::warehouse::CATEGORIES;

/// Low temperature keeps the structured output stable.
const INGEST_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKeyword {
    pub category: &'static str,
    pub keyword: String,
}

/// Ask the chat model to split free text into categorized keywords.
///
/// The model answers with a JSON object mapping category-ish keys to
/// keyword arrays, possibly wrapped in Markdown fences. Keys are mapped
/// onto the canonical category set case-insensitively; unknown keys are
/// dropped. Output that is not valid JSON is a hard error with no
/// partial result.
#[instrument(level = "debug", skip(config, text))]
pub async fn parse_keywords(config: &AiConfig, text: &str) -> Result<Vec<ParsedKeyword>> {
    let body = build_chat_body(&config.model, INGEST_PROMPT, text, INGEST_TEMPERATURE, false);
    let resp = send_chat(&config.api_key, &body, config.chat_url()).await?;
    let raw = resp.text().await?;
    let content = parse_chat_content(&raw)?;
    let parsed = parse_ingest_content(&content)?;
    debug!(keywords = parsed.len(), "Parsed ingest keywords");
    Ok(parsed)
}

/// Pure decoding step, split out for tests.
pub fn parse_ingest_content(content: &str) -> Result<Vec<ParsedKeyword>> {
    let clean = strip_code_fences(content);
    let data: BTreeMap<String, Vec<String>> =
        serde_json::from_str(&clean).context("model output is not the expected JSON object")?;

    let mut out = Vec::new();
    for (key, words) in data {
        let Some(category) = match_category(&key) else {
            debug!(key = %key, "Dropping unknown ingest key");
            continue;
        };
        for word in words {
            let word = word.trim();
            if !word.is_empty() {
                out.push(ParsedKeyword {
                    category,
                    keyword: word.to_string(),
                });
            }
        }
    }
    Ok(out)
}

/// Map a model-supplied key onto a canonical category. The match is
/// case-insensitive and tolerates decorated keys like "StyleReference"
/// by substring containment.
fn match_category(key: &str) -> Option<&'static str> {
    let key = key.to_lowercase();
    CATEGORIES
        .iter()
        .find(|spec| key.contains(&spec.name.to_lowercase()))
        .map(|spec| spec.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_category_is_case_insensitive() {
        assert_eq!(match_category("mood"), Some("Mood"));
        assert_eq!(match_category("StyleReference"), Some("Reference"));
        assert_eq!(match_category("Texture"), None);
    }

    #[test]
    fn fenced_json_parses() {
        let content = "```json\n{\"Subject\": [\"drone\"], \"Mood\": [\" calm \"]}\n```";
        let parsed = parse_ingest_content(content).unwrap();
        assert!(parsed.contains(&ParsedKeyword {
            category: "Subject",
            keyword: "drone".to_string()
        }));
        assert!(parsed.contains(&ParsedKeyword {
            category: "Mood",
            keyword: "calm".to_string()
        }));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_ingest_content("not json at all").is_err());
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let parsed = parse_ingest_content(r#"{"Texture": ["rough"]}"#).unwrap();
        assert!(parsed.is_empty());
    }
}
