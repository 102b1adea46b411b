use crate::config::Config;
use crate::error::{AppError, Result};
use ecoscore_types::{Rating, ScoreRequest};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_SUGGESTIONS: usize = 5;

/// Client for the Anthropic Messages API that turns a scored product into a
/// short list of improvement suggestions. Upstream failures never fail the
/// scoring request; they degrade to a fixed fallback list.
#[derive(Clone)]
pub struct SuggestionClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl SuggestionClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.claude_timeout_secs))
            .build()
            .map_err(|e| AppError::ServerError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(SuggestionClient {
            client,
            api_url: config.claude_api_url.clone(),
            api_key: config.claude_api_key.clone(),
            model: config.claude_model.clone(),
            max_tokens: config.suggestion_max_tokens,
        })
    }

    /// Fetch suggestions for a scored product, falling back to generic
    /// suggestions on any upstream failure.
    pub async fn suggestions(
        &self,
        request: &ScoreRequest,
        score: f64,
        rating: Rating,
    ) -> Vec<String> {
        match self.fetch(request, score, rating).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::warn!("Suggestion request failed, using fallbacks: {}", e);
                fallback_suggestions()
            }
        }
    }

    async fn fetch(
        &self,
        request: &ScoreRequest,
        score: f64,
        rating: Rating,
    ) -> anyhow::Result<Vec<String>> {
        let prompt = build_prompt(request, score, rating);
        let body = build_request_body(&self.model, self.max_tokens, &prompt);

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<MessagesResponse>()
            .await?;

        let text = response
            .content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default();

        Ok(parse_suggestions(text))
    }
}

fn build_request_body(model: &str, max_tokens: u32, prompt: &str) -> serde_json::Value {
    json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": [{
            "role": "user",
            "content": prompt
        }]
    })
}

fn build_prompt(request: &ScoreRequest, score: f64, rating: Rating) -> String {
    let weight = request
        .weight_grams
        .map(|grams| grams.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "Analyze this product's sustainability and provide 3-5 specific, actionable \
         suggestions to improve its environmental impact:\n\n\
         Product: {}\n\
         Materials: {}\n\
         Weight: {} grams\n\
         Transport: {}\n\
         Packaging: {}\n\
         GWP: {} kg CO2e\n\
         Cost: ${}\n\
         Circularity Score: {}/100\n\
         Current Sustainability Score: {}/100 (Rating: {})\n\n\
         Provide ONLY a bulleted list of 3-5 practical suggestions. Be concise and \
         specific. Format as:\n\
         - Suggestion 1\n\
         - Suggestion 2\n\
         etc.",
        request.product_name,
        request.materials.join(", "),
        weight,
        request.transport,
        request.packaging,
        request.gwp,
        request.cost,
        request.circularity,
        score,
        rating,
    )
}

// Keep only bulleted lines, stripped of the bullet prefix
fn parse_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .map(|line| line.trim_start_matches(['-', ' ']).trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn fallback_suggestions() -> Vec<String> {
    vec![
        "Consider using more sustainable materials".to_string(),
        "Optimize transport method to reduce emissions".to_string(),
        "Improve packaging recyclability".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CLAUDE_MODEL;
    use httpmock::prelude::*;

    fn score_request() -> ScoreRequest {
        ScoreRequest {
            product_name: "Water bottle".to_string(),
            materials: vec!["Aluminium".to_string(), "Plastic cap".to_string()],
            weight_grams: Some(250.0),
            transport: "ship".to_string(),
            packaging: "cardboard".to_string(),
            gwp: 12.5,
            cost: 15.0,
            circularity: 70.0,
            weights: None,
        }
    }

    fn test_config(api_url: String) -> Config {
        Config {
            server_address: "127.0.0.1:0".to_string(),
            claude_api_key: "test-key".to_string(),
            claude_api_url: api_url,
            claude_model: DEFAULT_CLAUDE_MODEL.to_string(),
            suggestion_max_tokens: 500,
            claude_timeout_secs: 5,
        }
    }

    #[test]
    fn prompt_includes_product_fields_and_score() {
        let prompt = build_prompt(&score_request(), 71.25, Rating::B);
        assert!(prompt.contains("Product: Water bottle"));
        assert!(prompt.contains("Materials: Aluminium, Plastic cap"));
        assert!(prompt.contains("Weight: 250 grams"));
        assert!(prompt.contains("GWP: 12.5 kg CO2e"));
        assert!(prompt.contains("Current Sustainability Score: 71.25/100 (Rating: B)"));
    }

    #[test]
    fn prompt_uses_placeholder_when_weight_is_missing() {
        let mut request = score_request();
        request.weight_grams = None;
        let prompt = build_prompt(&request, 50.0, Rating::D);
        assert!(prompt.contains("Weight: N/A grams"));
    }

    #[test]
    fn request_body_shape() {
        let body = build_request_body("claude-sonnet-4-5-20250929", 500, "prompt text");
        assert_eq!(body["model"].as_str(), Some("claude-sonnet-4-5-20250929"));
        assert_eq!(body["max_tokens"].as_u64(), Some(500));
        assert_eq!(body["messages"][0]["role"].as_str(), Some("user"));
        assert_eq!(body["messages"][0]["content"].as_str(), Some("prompt text"));
    }

    #[test]
    fn parse_keeps_only_bulleted_lines_capped_at_five() {
        let text = "Here are some ideas:\n\
                    - Use recycled aluminium\n\
                    - Switch to sea freight\n\
                    not a bullet\n\
                    - Third\n\
                    - Fourth\n\
                    - Fifth\n\
                    - Sixth";
        let suggestions = parse_suggestions(text);
        assert_eq!(suggestions.len(), 5);
        assert_eq!(suggestions[0], "Use recycled aluminium");
        assert_eq!(suggestions[4], "Fifth");
    }

    #[test]
    fn parse_of_unbulleted_text_is_empty() {
        assert!(parse_suggestions("No bullets here.").is_empty());
    }

    #[tokio::test]
    async fn fetches_suggestions_from_messages_api() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .header("x-api-key", "test-key")
                .header("anthropic-version", ANTHROPIC_VERSION);
            then.status(200).json_body(serde_json::json!({
                "content": [{
                    "type": "text",
                    "text": "- Use recycled aluminium\n- Remove the plastic cap"
                }]
            }));
        });

        let client = SuggestionClient::new(&test_config(server.base_url())).unwrap();
        let suggestions = client.suggestions(&score_request(), 71.25, Rating::B).await;

        mock.assert();
        assert_eq!(
            suggestions,
            vec![
                "Use recycled aluminium".to_string(),
                "Remove the plastic cap".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn upstream_error_degrades_to_fallbacks() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(529).body("overloaded");
        });

        let client = SuggestionClient::new(&test_config(server.base_url())).unwrap();
        let suggestions = client.suggestions(&score_request(), 50.0, Rating::D).await;

        assert_eq!(suggestions, fallback_suggestions());
    }
}
