use std::env;

pub const DEEPSEEK_CHAT_URL: &str = "https://api.deepseek.com/chat/completions";

#[derive(Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub chat_url: Option<String>,
}

impl AiConfig {
    /// Read the chat-completion configuration from the environment.
    /// Returns `None` when no API key is set; generation then falls back
    /// to raw skeletons with an offline marker.
    pub fn from_env() -> Option<Self> {
        let api_key = match env::var("DEEPSEEK_API_KEY") {
            Ok(k) => k,
            Err(_) => return None,
        };
        Some(Self {
            api_key,
            model: env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| "deepseek-chat".to_string()),
            chat_url: env::var("DEEPSEEK_CHAT_URL").ok(),
        })
    }

    pub fn chat_url(&self) -> &str {
        self.chat_url.as_deref().unwrap_or(DEEPSEEK_CHAT_URL)
    }
}
