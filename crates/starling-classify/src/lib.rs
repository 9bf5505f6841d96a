//! HTTP classifier client for the Starling enrichment pipeline.
//!
//! Talks to any OpenAI-compatible chat-completions endpoint and returns the
//! assistant's raw reply text; the defensive verdict parsing lives in
//! [`starling_core::enrich`]. When no endpoint or credentials are
//! configured, wire [`starling_core::enrich::NullClassifier`] instead.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use starling_core::enrich::{ClassifyError, Classifier};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that classifies \
short product reviews. Return a JSON object with two keys: 'tone' and \
'sentiment'.";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection settings for an OpenAI-compatible chat-completions service.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
  /// Service root, e.g. `https://api.openai.com`. The
  /// `/v1/chat/completions` path is appended.
  pub base_url: String,
  /// Bearer token; omitted for keyless local endpoints.
  pub api_key:  Option<String>,
  pub model:    String,
  /// Hard timeout on the whole HTTP exchange.
  pub timeout:  Duration,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model:       &'a str,
  messages:    Vec<ChatMessage<'a>>,
  temperature: f32,
  max_tokens:  u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  content: String,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// A [`Classifier`] backed by an OpenAI-compatible HTTP endpoint.
pub struct HttpClassifier {
  client:   reqwest::Client,
  base_url: String,
  api_key:  Option<String>,
  model:    String,
}

impl HttpClassifier {
  pub fn new(config: ClassifierConfig) -> Result<Self, ClassifyError> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| ClassifyError::Request(e.to_string()))?;

    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      api_key: config.api_key,
      model: config.model,
    })
  }
}

impl Classifier for HttpClassifier {
  async fn classify(&self, text: &str, stars: i64) -> Result<String, ClassifyError> {
    let user_prompt =
      format!("Review text: {text}\nStars: {stars}\n\nReturn JSON only.");
    let body = ChatRequest {
      model:       &self.model,
      messages:    vec![
        ChatMessage { role: "system", content: SYSTEM_PROMPT },
        ChatMessage { role: "user", content: &user_prompt },
      ],
      temperature: 0.0,
      max_tokens:  120,
    };

    let url = format!("{}/v1/chat/completions", self.base_url);
    let mut request = self.client.post(&url).json(&body);
    if let Some(key) = &self.api_key {
      request = request.bearer_auth(key);
    }

    let response = request
      .send()
      .await
      .map_err(|e| ClassifyError::Request(e.to_string()))?
      .error_for_status()
      .map_err(|e| ClassifyError::Request(e.to_string()))?;

    let parsed: ChatResponse = response
      .json()
      .await
      .map_err(|e| ClassifyError::Reply(e.to_string()))?;

    let content = parsed
      .choices
      .into_iter()
      .next()
      .map(|c| c.message.content)
      .ok_or_else(|| ClassifyError::Reply("reply has no choices".to_string()))?;

    tracing::debug!(model = %self.model, "classifier replied");
    Ok(content.trim().to_string())
  }
}

#[cfg(test)]
mod tests {
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
  };

  use super::*;

  fn config(server: &MockServer) -> ClassifierConfig {
    ClassifierConfig {
      base_url: server.uri(),
      api_key:  Some("test-key".to_string()),
      model:    "gpt-4o-mini".to_string(),
      timeout:  Duration::from_secs(5),
    }
  }

  fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
      "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
  }

  #[tokio::test]
  async fn returns_trimmed_reply_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .and(header("authorization", "Bearer test-key"))
      .and(body_partial_json(serde_json::json!({ "model": "gpt-4o-mini" })))
      .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
        "  {\"tone\":\"warm\",\"sentiment\":\"positive\"}\n",
      )))
      .mount(&server)
      .await;

    let classifier = HttpClassifier::new(config(&server)).unwrap();
    let raw = classifier.classify("love it", 5).await.unwrap();
    assert_eq!(raw, "{\"tone\":\"warm\",\"sentiment\":\"positive\"}");
  }

  #[tokio::test]
  async fn prompt_carries_text_and_stars() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("{}")))
      .expect(1)
      .mount(&server)
      .await;

    let classifier = HttpClassifier::new(config(&server)).unwrap();
    classifier.classify("sturdy hinge", 4).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value =
      serde_json::from_slice(&requests[0].body).unwrap();
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("sturdy hinge"));
    assert!(user.contains("Stars: 4"));
  }

  #[tokio::test]
  async fn server_error_is_a_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let classifier = HttpClassifier::new(config(&server)).unwrap();
    let err = classifier.classify("hm", 3).await.unwrap_err();
    assert!(matches!(err, ClassifyError::Request(_)));
  }

  #[tokio::test]
  async fn malformed_body_is_a_reply_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
      .mount(&server)
      .await;

    let classifier = HttpClassifier::new(config(&server)).unwrap();
    let err = classifier.classify("hm", 3).await.unwrap_err();
    assert!(matches!(err, ClassifyError::Reply(_)));
  }

  #[tokio::test]
  async fn empty_choices_is_a_reply_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(serde_json::json!({ "choices": [] })),
      )
      .mount(&server)
      .await;

    let classifier = HttpClassifier::new(config(&server)).unwrap();
    let err = classifier.classify("hm", 3).await.unwrap_err();
    assert!(matches!(err, ClassifyError::Reply(_)));
  }
}
