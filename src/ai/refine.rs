use anyhow::{anyhow, Result};
use futures_util::StreamExt;
use serde::Deserialize;
use tracing::{instrument, trace, warn};

use crate::ai::common::{build_chat_body, send_chat};
use crate::ai::config::AiConfig;
use crate::ai::prompts::CREATIVE_DIRECTOR_PROMPT;

/// Sampling temperature for creative refinement.
const REFINE_TEMPERATURE: f32 = 0.85;

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

/// Fallback prompt when no AI is configured at all.
pub fn offline_fallback(index: usize, skeleton: &str) -> String {
    format!("Plan {index}: {skeleton} (AI Offline)")
}

/// Fallback prompt when the refine call failed mid-flight.
pub fn error_fallback(index: usize, skeleton: &str) -> String {
    format!("Plan {index}: {skeleton} (Error)")
}

/// Refine one skeleton into key-visual prose.
///
/// This never fails: any network, auth or decoding problem degrades to a
/// deterministic fallback string that still carries the skeleton, so the
/// caller can queue something for every draft.
#[instrument(level = "debug", skip(config, skeleton))]
pub async fn refine(config: &AiConfig, index: usize, skeleton: &str) -> String {
    match refine_inner(config, index, skeleton).await {
        Ok(text) => text,
        Err(err) => {
            warn!(index, error = %err, "Refine call failed, emitting fallback");
            error_fallback(index, skeleton)
        }
    }
}

/// Streamed refine call. Exposed so tests can assert on the Ok path;
/// the mock-server override comes in through the config's chat URL.
pub async fn refine_inner(config: &AiConfig, index: usize, skeleton: &str) -> Result<String> {
    let user_prompt = format!(
        "Visual skeleton: {skeleton}\nBased on this skeleton, write a professional \
key-visual description of at most 150 words, starting with 'Plan {index}:'."
    );
    let body = build_chat_body(
        &config.model,
        CREATIVE_DIRECTOR_PROMPT,
        &user_prompt,
        REFINE_TEMPERATURE,
        true,
    );

    let resp = send_chat(&config.api_key, &body, config.chat_url()).await?;
    collect_stream(resp).await
}

/// Concatenate the SSE fragments of a streamed chat response in arrival
/// order. Network chunks may split anywhere, including inside a line or
/// inside a multi-byte code point, so the carry buffer holds raw bytes
/// and only complete lines are decoded.
async fn collect_stream(resp: reqwest::Response) -> Result<String> {
    let mut stream = resp.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();
    let mut text = String::new();
    let mut done = false;

    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
        if drain_lines(&mut buffer, &mut text)? {
            done = true;
            break;
        }
    }
    if !done && !buffer.is_empty() {
        let tail = String::from_utf8_lossy(&buffer);
        let tail = tail.trim_end();
        if !tail.is_empty() {
            consume_sse_line(tail, &mut text)?;
        }
    }

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(anyhow!("stream produced no content"));
    }
    trace!(len = text.len(), "collected streamed completion");
    Ok(text)
}

/// Consume every complete line in the byte buffer, leaving any
/// unterminated tail (which may end mid code point) untouched.
/// Returns `true` once the terminal `[DONE]` marker was seen.
fn drain_lines(buffer: &mut Vec<u8>, text: &mut String) -> Result<bool> {
    while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();
        let line = String::from_utf8_lossy(&line);
        if consume_sse_line(line.trim_end(), text)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Process one SSE line, appending any delta content to `text`.
/// Returns `true` on the terminal `[DONE]` marker.
fn consume_sse_line(line: &str, text: &mut String) -> Result<bool> {
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(false);
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(false);
    }
    if payload == "[DONE]" {
        return Ok(true);
    }
    let chunk: StreamChunk = serde_json::from_str(payload)?;
    if let Some(choice) = chunk.choices.first() {
        if let Some(content) = &choice.delta.content {
            text.push_str(content);
        }
    }
    Ok(false)
}
