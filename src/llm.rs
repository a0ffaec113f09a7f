use std::future::Future;

use eyre::{Result, bail};
use log::debug;

use crate::credential::Credential;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A text completion service: one prompt in, generated text out.
pub trait Completion {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>>;
}

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    client: reqwest::Client,
    credential: Credential,
    model: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, credential: Credential, model: impl Into<String>) -> Self {
        GeminiClient {
            client,
            credential,
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{GEMINI_BASE_URL}/{}:generateContent", self.model)
    }
}

impl Completion for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!("Requesting completion from {} ({} chars)", self.model, prompt.chars().count());

        let body = serde_json::json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.credential.expose())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("Gemini API returned {status}: {}", error_message(&body));
        }

        let json: serde_json::Value = resp.json().await?;
        extract_gemini_text(&json)
    }
}

/// Pull `error.message` out of an error body, falling back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String> {
    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str())
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }

    if let Some(reason) = json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        bail!("Gemini blocked the prompt: {reason}");
    }
    bail!("unexpected Gemini API response format");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_gemini_text() {
        let json = serde_json::json!({
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [
                            { "text": "첫 문장. " },
                            { "text": "둘째 문장." }
                        ]
                    }
                }
            ]
        });
        assert_eq!(extract_gemini_text(&json).unwrap(), "첫 문장. 둘째 문장.");
    }

    #[test]
    fn test_extract_gemini_text_empty() {
        let json = serde_json::json!({"candidates": []});
        assert!(extract_gemini_text(&json).is_err());
    }

    #[test]
    fn test_extract_gemini_text_blocked() {
        let json = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = extract_gemini_text(&json).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_error_message_from_json_body() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid.");
        assert_eq!(error_message("plain failure"), "plain failure");
    }

    #[test]
    fn test_endpoint_uses_model() {
        let client = GeminiClient::new(reqwest::Client::new(), Credential::new("k"), DEFAULT_MODEL);
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
