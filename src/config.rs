use std::time::Duration;

use crate::constants;

/// Runtime settings for the guidance client.
#[derive(Debug, Clone)]
pub struct GuidanceConfig {
    pub relay_url: String,
    pub api_key: Option<String>,
    /// Candidate model identifiers, tried once each in order.
    pub models: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub timeout: Duration,
    pub batch: BatchPolicy,
}

/// Pacing used when generating guidance for many paths at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    pub batch_size: usize,
    pub stagger: Duration,
    pub batch_pause: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            batch_size: constants::BATCH_SIZE,
            stagger: Duration::from_millis(constants::BATCH_STAGGER_MS),
            batch_pause: Duration::from_millis(constants::BATCH_PAUSE_MS),
        }
    }
}

impl BatchPolicy {
    /// No pacing at all; handy for tests and local relays.
    pub fn immediate(batch_size: usize) -> Self {
        Self {
            batch_size,
            stagger: Duration::ZERO,
            batch_pause: Duration::ZERO,
        }
    }
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        let api_key = constants::GUIDANCE_API_KEY.clone();
        Self {
            relay_url: constants::RELAY_URL.clone(),
            api_key: (!api_key.is_empty()).then_some(api_key),
            models: constants::GUIDANCE_MODELS.clone(),
            max_tokens: constants::MAX_TOKENS,
            temperature: constants::TEMPERATURE,
            top_p: constants::TOP_P,
            frequency_penalty: constants::FREQUENCY_PENALTY,
            presence_penalty: constants::PRESENCE_PENALTY,
            timeout: Duration::from_secs(*constants::GUIDANCE_TIMEOUT_SECS),
            batch: BatchPolicy::default(),
        }
    }
}

impl GuidanceConfig {
    /// Point the client at a specific relay, keeping every other default.
    pub fn with_relay(relay_url: impl Into<String>) -> Self {
        Self {
            relay_url: relay_url.into(),
            ..Self::default()
        }
    }

    pub fn models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn batch(mut self, batch: BatchPolicy) -> Self {
        self.batch = batch;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_relay_keeps_defaults() {
        let config = GuidanceConfig::with_relay("http://localhost:1234/v1/chat/completions");
        assert_eq!(config.relay_url, "http://localhost:1234/v1/chat/completions");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.batch.batch_size, 3);
    }

    #[test]
    fn test_builder_overrides() {
        let config = GuidanceConfig::with_relay("http://relay")
            .models(vec!["only/model".to_string()])
            .timeout(Duration::from_secs(2))
            .batch(BatchPolicy::immediate(5));
        assert_eq!(config.models, vec!["only/model".to_string()]);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.batch.stagger, Duration::ZERO);
        assert_eq!(config.batch.batch_size, 5);
    }
}
