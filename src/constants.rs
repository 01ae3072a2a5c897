// Defaults for the guidance client, loaded from the environment.

use std::env;

// Each value falls back to a built-in default when its variable is unset or unparsable.
lazy_static::lazy_static! {
    pub static ref RELAY_URL: String = env::var("GUIDANCE_RELAY_URL")
        .unwrap_or_else(|_| "https://integrate.api.nvidia.com/v1/chat/completions".to_string());
    // Candidate models, tried in order until one answers.
    pub static ref GUIDANCE_MODELS: Vec<String> = env::var("GUIDANCE_MODELS")
        .map(|raw| parse_model_list(&raw))
        .unwrap_or_else(|_| vec![
            "meta/llama-4-maverick-17b-128e-instruct".to_string(),
            "meta/llama-3.3-70b-instruct".to_string(),
        ]);
    pub static ref GUIDANCE_API_KEY: String = env::var("GUIDANCE_API_KEY").unwrap_or_default();
    pub static ref GUIDANCE_TIMEOUT_SECS: u64 = env::var("GUIDANCE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);
    // Idle web sessions are dropped after this long.
    pub static ref SESSION_TTL_SECS: u64 = env::var("GUIDANCE_SESSION_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60 * 60);
    pub static ref MAX_SESSIONS: usize = env::var("GUIDANCE_MAX_SESSIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10_000);
}

pub const MAX_TOKENS: u32 = 512;
pub const TEMPERATURE: f32 = 0.8;
pub const TOP_P: f32 = 0.9;
pub const FREQUENCY_PENALTY: f32 = 0.1;
pub const PRESENCE_PENALTY: f32 = 0.1;

// Courtesy pacing for `generate_all`.
pub const BATCH_SIZE: usize = 3;
pub const BATCH_STAGGER_MS: u64 = 500;
pub const BATCH_PAUSE_MS: u64 = 1000;

pub const DEFAULT_PORT: u16 = 9900;

/// Split a comma separated model list, dropping blanks.
pub fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_list() {
        assert_eq!(
            parse_model_list(" a/b , ,c/d,"),
            vec!["a/b".to_string(), "c/d".to_string()]
        );
        assert!(parse_model_list("").is_empty());
    }
}
