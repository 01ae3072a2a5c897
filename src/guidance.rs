use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::catalog::Path;
use crate::config::GuidanceConfig;
use crate::fallback;

/// Advice resolved for one path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guidance {
    pub path_id: u8,
    pub text: String,
    pub source: GuidanceSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuidanceSource {
    /// Generated by the named model.
    Oracle { model: String },
    /// Canned text from the fallback table.
    Fallback,
}

impl Guidance {
    pub fn fallback(path_id: u8) -> Self {
        Self {
            path_id,
            text: fallback::fallback_text(path_id).to_string(),
            source: GuidanceSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == GuidanceSource::Fallback
    }
}

/// Why a single completion attempt produced nothing usable.
/// Never leaves this module: `generate` turns every variant into fallback text.
#[derive(Debug, Error)]
enum GuidanceError {
    #[error("no candidate models configured")]
    NoCandidates,
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("relay body could not be parsed: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("relay returned no content")]
    Empty,
}

// Chat-completions request/response shapes spoken by the relay.
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Build the oracle prompt for one path and dilemma.
pub fn build_prompt(path: &Path, dilemma: &str) -> String {
    format!(
        "You are an ancient mystic advisor drawing wisdom from Hindu mythology. \
        A person is facing this dilemma: \"{dilemma}\"\n\n\
        You must provide guidance following the path of \"{name}\" - {subtitle}\n\n\
        The theme is: {theme}\n\n\
        Provide a thoughtful, practical solution that:\n\
        1. Incorporates the mythological symbolism of this path\n\
        2. Gives specific, actionable advice\n\
        3. Maintains the mystical tone while being genuinely helpful\n\
        4. Is 2-3 sentences long\n\n\
        Respond as if you are a wise oracle speaking directly to the seeker.",
        dilemma = dilemma,
        name = path.name,
        subtitle = path.subtitle,
        theme = path.theme,
    )
}

/// Client for the completion relay. `generate` always yields guidance.
#[derive(Debug, Clone)]
pub struct GuidanceClient {
    http: Client,
    config: GuidanceConfig,
}

impl GuidanceClient {
    pub fn new(config: GuidanceConfig) -> Self {
        // Builder only fails on TLS backend setup; a plain client still works.
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build configured HTTP client, using defaults");
                Client::new()
            });
        Self { http, config }
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    /// Produce guidance for `path`. Falls back to canned text on any failure.
    #[instrument(skip(self, path, dilemma), fields(path_id = path.id, path_name = path.name))]
    pub async fn generate(&self, path: &Path, dilemma: &str) -> Guidance {
        let prompt = build_prompt(path, dilemma);
        match self.first_answer(&prompt).await {
            Ok((model, text)) => {
                info!(%model, "Guidance generated");
                Guidance {
                    path_id: path.id,
                    text,
                    source: GuidanceSource::Oracle { model },
                }
            }
            Err(e) => {
                warn!(error = %e, "Guidance generation failed, using fallback");
                Guidance::fallback(path.id)
            }
        }
    }

    /// Generate guidance for every path, a batch at a time.
    /// Output order matches `paths`.
    pub async fn generate_all(&self, paths: &[Path], dilemma: &str) -> Vec<Guidance> {
        let policy = self.config.batch;
        let batch_size = policy.batch_size.max(1);
        let mut out = Vec::with_capacity(paths.len());

        for (n, batch) in paths.chunks(batch_size).enumerate() {
            if n > 0 && !policy.batch_pause.is_zero() {
                tokio::time::sleep(policy.batch_pause).await;
            }
            debug!(batch = n, size = batch.len(), "Generating guidance batch");
            let pending = batch.iter().enumerate().map(|(i, path)| async move {
                let delay = policy.stagger * i as u32;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                self.generate(path, dilemma).await
            });
            out.extend(join_all(pending).await);
        }
        out
    }

    // Each candidate is tried once, in order; first usable answer wins.
    async fn first_answer(&self, prompt: &str) -> Result<(String, String), GuidanceError> {
        let mut last_err = GuidanceError::NoCandidates;
        for model in &self.config.models {
            match self.request_completion(model, prompt).await {
                Ok(text) => return Ok((model.clone(), text)),
                Err(e) => {
                    debug!(%model, error = %e, "Candidate model failed");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    #[instrument(skip(self, prompt))]
    async fn request_completion(&self, model: &str, prompt: &str) -> Result<String, GuidanceError> {
        let payload = CompletionRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            frequency_penalty: self.config.frequency_penalty,
            presence_penalty: self.config.presence_penalty,
            stream: false,
        };

        let mut request = self.http.post(&self.config.relay_url).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(GuidanceError::Status { status, body });
        }

        let body = response.bytes().await?;
        extract_content(&body)
    }
}

impl Default for GuidanceClient {
    fn default() -> Self {
        Self::new(GuidanceConfig::default())
    }
}

// Pull `choices[0].message.content` out of a success body, verbatim.
fn extract_content(body: &[u8]) -> Result<String, GuidanceError> {
    let parsed: CompletionResponse =
        serde_json::from_slice(body).map_err(GuidanceError::Malformed)?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or(GuidanceError::Empty)?;
    if content.trim().is_empty() {
        return Err(GuidanceError::Empty);
    }
    Ok(content)
}
