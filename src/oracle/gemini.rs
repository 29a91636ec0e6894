use crate::error::OracleError;
use crate::models::{Job, Profile};
use crate::oracle::prompt::build_prompt;
use crate::oracle::response::parse_scores;
use crate::oracle::traits::ScoringOracle;
use crate::oracle::types::{OracleParams, OracleScore};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Longest error body kept in an `OracleError::Status`
const MAX_ERROR_BODY: usize = 240;

/// Scoring oracle backed by the Gemini `generateContent` endpoint
pub struct GeminiOracle {
    client: Client,
    params: OracleParams,
}

impl GeminiOracle {
    /// Create a new Gemini oracle
    pub fn new(params: OracleParams) -> Result<Self, OracleError> {
        if params.api_key.is_empty() || params.api_key == OracleParams::PLACEHOLDER_KEY {
            return Err(OracleError::NotConfigured(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        let client = Client::builder().timeout(params.timeout).build()?;

        Ok(Self { client, params })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.params.endpoint.trim_end_matches('/'),
            self.params.model
        )
    }

    /// Send one prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.params.api_key)
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            warn!("Gemini returned status: {}", status);
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response.json().await?;
        body.into_text().ok_or(OracleError::EmptyResponse)
    }
}

#[async_trait]
impl ScoringOracle for GeminiOracle {
    async fn score_jobs(
        &self,
        jobs: &[Job],
        profile: &Profile,
    ) -> Result<Vec<OracleScore>, OracleError> {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = build_prompt(jobs, profile);
        debug!(jobs = jobs.len(), model = %self.params.model, "Requesting job scores");

        let text = self.generate(&prompt).await?;
        debug!("Received {} bytes of oracle output", text.len());

        parse_scores(&text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_of_first_candidate() {
        let body: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "```json\n[" }, { "text": "]\n```" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();

        assert_eq!(body.into_text().as_deref(), Some("```json\n[]\n```"));
    }

    #[test]
    fn blocked_response_has_no_text() {
        let body: GenerateResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
                .unwrap();

        assert!(body.into_text().is_none());
    }

    #[test]
    fn rejects_placeholder_key() {
        let params = OracleParams {
            api_key: OracleParams::PLACEHOLDER_KEY.to_string(),
            ..OracleParams::default()
        };

        assert!(matches!(
            GeminiOracle::new(params),
            Err(OracleError::NotConfigured(_))
        ));
    }

    #[test]
    fn url_targets_configured_model() {
        let oracle = GeminiOracle::new(OracleParams {
            api_key: "test-key".to_string(),
            endpoint: "http://localhost:9000/v1beta/".to_string(),
            ..OracleParams::default()
        })
        .unwrap();

        assert_eq!(
            oracle.url(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
