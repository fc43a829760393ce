use serde::Deserialize;

/// Chat defaults applied when a conversation or one-shot chat starts
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Model to pin at startup; when absent the first available model is used
    #[serde(default)]
    pub default_model: Option<String>,
    /// System prompt prepended to new conversations
    #[serde(default)]
    pub system_prompt: Option<String>,
}
