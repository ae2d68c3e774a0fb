//! Wordnik API client.
//!
//! One blocking request for definitions and one for pronunciations per lookup.
//! No retries.

use super::{clean_text, Definition, DictionaryClient, LookupError, WordData};
use crate::config::AppConfig;
use log::{info, warn};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Instant;

pub const DEFAULT_BASE_URL: &str = "https://api.wordnik.com/v4";
const DEFINITION_LIMIT: &str = "10";
const PRONUNCIATION_LIMIT: &str = "5";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDefinition {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    part_of_speech: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPronunciation {
    #[serde(default)]
    raw: Option<String>,
}

/// Blocking Wordnik client bound to one API key.
pub struct WordnikClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl WordnikClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<&str>) -> Result<Self, LookupError> {
        let raw_base = base_url.unwrap_or(DEFAULT_BASE_URL);
        let base_url =
            Url::parse(raw_base).map_err(|_| LookupError::InvalidEndpoint(raw_base.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(LookupError::InvalidEndpoint(raw_base.to_string()));
        }

        Ok(Self {
            http: Client::new(),
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Builds a client from the saved configuration.
    ///
    /// # Errors
    /// - `LookupError::Config(KeyNotSet)` when no API key is saved.
    /// - `LookupError::InvalidEndpoint` when `api_base_url` cannot be parsed.
    pub fn from_config(config: &AppConfig) -> Result<Self, LookupError> {
        let api_key = config.require_api_key()?;
        Self::new(api_key, config.api_base_url.as_deref())
    }

    fn endpoint(&self, word: &str, resource: &str) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| LookupError::InvalidEndpoint(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["word.json", word, resource]);
        }
        Ok(url)
    }

    fn get_json(&self, url: Url, query: &[(&str, &str)]) -> Result<String, LookupError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .map_err(LookupError::Network)?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        response.text().map_err(LookupError::Network)
    }

    fn fetch_definitions(&self, word: &str) -> Result<Vec<Definition>, LookupError> {
        let url = self.endpoint(word, "definitions")?;
        let body = self.get_json(
            url,
            &[
                ("limit", DEFINITION_LIMIT),
                ("includeRelated", "false"),
                ("useCanonical", "false"),
                ("includeTags", "false"),
            ],
        )?;
        parse_definitions(&body)
    }

    fn fetch_pronunciations(&self, word: &str) -> Result<Vec<String>, LookupError> {
        let url = self.endpoint(word, "pronunciations")?;
        let body = self.get_json(
            url,
            &[("limit", PRONUNCIATION_LIMIT), ("useCanonical", "false")],
        )?;
        parse_pronunciations(&body)
    }
}

impl DictionaryClient for WordnikClient {
    fn fetch_word(&self, word: &str) -> Result<WordData, LookupError> {
        let started_at = Instant::now();
        info!("event=word_lookup module=dictionary status=start");

        let definitions = match self.fetch_definitions(word) {
            Ok(definitions) if definitions.is_empty() => {
                return Err(LookupError::NotFound {
                    word: word.to_string(),
                })
            }
            Ok(definitions) => definitions,
            Err(LookupError::Http { status: 404 }) => {
                return Err(LookupError::NotFound {
                    word: word.to_string(),
                })
            }
            Err(err) => {
                warn!(
                    "event=word_lookup module=dictionary status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        // Pronunciations are optional decoration.
        let pronunciations = match self.fetch_pronunciations(word) {
            Ok(values) => values,
            Err(err) => {
                warn!("event=pronunciation_lookup module=dictionary status=error error={err}");
                Vec::new()
            }
        };

        info!(
            "event=word_lookup module=dictionary status=ok definitions={} duration_ms={}",
            definitions.len(),
            started_at.elapsed().as_millis()
        );

        Ok(WordData {
            word: word.to_string(),
            definitions,
            pronunciations,
        })
    }
}

fn classify_status(status: StatusCode) -> Option<LookupError> {
    if status.is_success() {
        return None;
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(LookupError::Unauthorized),
        other => Some(LookupError::Http {
            status: other.as_u16(),
        }),
    }
}

fn parse_definitions(body: &str) -> Result<Vec<Definition>, LookupError> {
    let raw: Vec<RawDefinition> =
        serde_json::from_str(body).map_err(|err| LookupError::InvalidResponse(err.to_string()))?;

    Ok(raw
        .into_iter()
        .filter_map(|definition| {
            let text = clean_text(definition.text.as_deref()?);
            if text.is_empty() {
                return None;
            }
            Some(Definition {
                part_of_speech: definition
                    .part_of_speech
                    .filter(|value| !value.trim().is_empty()),
                text,
            })
        })
        .collect())
}

fn parse_pronunciations(body: &str) -> Result<Vec<String>, LookupError> {
    let raw: Vec<RawPronunciation> =
        serde_json::from_str(body).map_err(|err| LookupError::InvalidResponse(err.to_string()))?;

    Ok(raw
        .into_iter()
        .filter_map(|pronunciation| pronunciation.raw)
        .map(|value| clean_text(&value))
        .filter(|value| !value.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{classify_status, parse_definitions, parse_pronunciations, WordnikClient};
    use crate::config::{AppConfig, ConfigError};
    use crate::dictionary::LookupError;
    use reqwest::StatusCode;

    #[test]
    fn parse_definitions_skips_entries_without_text() {
        let body = r#"[
            {"word": "lexicon", "partOfSpeech": "noun", "text": "A <em>dictionary</em>."},
            {"word": "lexicon", "partOfSpeech": "noun"},
            {"word": "lexicon", "text": "   "},
            {"word": "lexicon", "partOfSpeech": "", "text": "The vocabulary of a language."}
        ]"#;

        let definitions = parse_definitions(body).unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].text, "A dictionary.");
        assert_eq!(definitions[0].part_of_speech.as_deref(), Some("noun"));
        assert_eq!(definitions[1].part_of_speech, None);
    }

    #[test]
    fn parse_definitions_rejects_non_array_payload() {
        let err = parse_definitions(r#"{"message": "oops"}"#).unwrap_err();
        assert!(matches!(err, LookupError::InvalidResponse(_)));
    }

    #[test]
    fn parse_pronunciations_reads_raw_field() {
        let body = r#"[{"raw": "(lĕk′sĭ-kŏn′)", "rawType": "ahd-5"}, {"rawType": "arpabet"}]"#;
        assert_eq!(parse_pronunciations(body).unwrap(), vec!["(lĕk′sĭ-kŏn′)"]);
    }

    #[test]
    fn classify_status_maps_auth_and_other_failures() {
        assert!(classify_status(StatusCode::OK).is_none());
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED),
            Some(LookupError::Unauthorized)
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            Some(LookupError::Http { status: 500 })
        ));
    }

    #[test]
    fn endpoint_escapes_word_and_keeps_base_path() {
        let client = WordnikClient::new("key", Some("https://example.test/v4/")).unwrap();
        let url = client.endpoint("ice cream", "definitions").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/v4/word.json/ice%20cream/definitions"
        );
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = WordnikClient::from_config(&AppConfig::default())
            .err()
            .expect("missing key must fail");
        assert!(matches!(err, LookupError::Config(ConfigError::KeyNotSet)));

        let invalid = WordnikClient::from_config(&AppConfig {
            api_key: Some("key".to_string()),
            api_base_url: Some("not a url".to_string()),
        })
        .err()
        .expect("invalid endpoint must fail");
        assert!(matches!(invalid, LookupError::InvalidEndpoint(_)));
    }
}
