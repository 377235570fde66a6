use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Build a chat-completion request body in the OpenAI wire format the
/// DeepSeek endpoint speaks.
pub fn build_chat_body(
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
    stream: bool,
) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ],
        "temperature": temperature,
        "stream": stream,
    })
}

/// POST a chat body and fail on any non-success status.
pub async fn send_chat(
    api_key: &str,
    body: &serde_json::Value,
    url: &str,
) -> Result<reqwest::Response> {
    debug!(url, "sending chat completion request");

    let client = reqwest::Client::new();
    let resp = client
        .post(url)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let err_text = resp.text().await.unwrap_or_default();
        warn!(%status, "chat completion API error");
        return Err(anyhow!("chat completion API error {status}: {err_text}"));
    }
    Ok(resp)
}

/// Extract the assistant text from a non-streamed chat response body.
pub fn parse_chat_content(raw: &str) -> Result<String> {
    let chat: ChatResponse = serde_json::from_str(raw)?;
    Ok(chat
        .choices
        .first()
        .ok_or_else(|| anyhow!("missing chat choice"))?
        .message
        .content
        .trim()
        .to_string())
}

/// Drop the Markdown code fences models like to wrap JSON answers in.
pub fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}
