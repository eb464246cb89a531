//! Tutoring client for a local Ollama-compatible text-generation endpoint.
//!
//! The client degrades gracefully: network trouble is retried a bounded
//! number of times and then reported as [`TutorReply::Unavailable`] with a
//! message naming the cause. Callers can always tell a failure from an
//! answer, because the two are different variants, not both strings.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::config::Config;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "codellama";

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// What came back from the tutoring endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TutorReply {
    /// Verbatim response text from a successful request.
    Answer(String),
    /// A user-facing description of why no answer is available.
    Unavailable(String),
}

impl TutorReply {
    pub fn text(&self) -> &str {
        match self {
            TutorReply::Answer(text) => text,
            TutorReply::Unavailable(reason) => reason,
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, TutorReply::Answer(_))
    }
}

/// HTTP client for the tutoring endpoint.
pub struct TutorClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl TutorClient {
    /// Build a client with a per-request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::new(
            &config.tutor.endpoint,
            &config.tutor.model,
            Duration::from_secs(config.tutor.timeout_secs),
        )?;
        client.api_key = config.tutor.api_key.clone();
        Ok(client)
    }

    /// Attach a bearer credential to every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn prompt_for(question: &str) -> String {
        format!(
            "You are a programming tutor. Answer the following question with examples:\n\n{}",
            question
        )
    }

    /// Ask a free-text question.
    ///
    /// Up to 3 attempts total on connection failure or non-success status,
    /// one second apart. Exhaustion yields `Unavailable`, never an error.
    pub async fn ask(&self, question: &str) -> TutorReply {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": Self::prompt_for(question),
            "stream": false,
        });

        let mut last_failure = format!("the endpoint {} did not respond", self.endpoint);
        for attempt in 1..=MAX_ATTEMPTS {
            let mut request = self.client.post(&self.endpoint).json(&body);
            if let Some(api_key) = &self.api_key {
                request = request.header("Authorization", format!("Bearer {}", api_key));
            }

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    return match response.json::<Value>().await {
                        Ok(value) => match value.get("response").and_then(Value::as_str) {
                            Some(text) => TutorReply::Answer(text.to_string()),
                            None => TutorReply::Unavailable(
                                "The tutoring endpoint replied without a 'response' field."
                                    .to_string(),
                            ),
                        },
                        Err(err) => TutorReply::Unavailable(format!(
                            "The tutoring endpoint returned an unreadable body: {}",
                            err
                        )),
                    };
                }
                Ok(response) => {
                    let status = response.status();
                    warn!(
                        "tutoring endpoint returned status {} (attempt {} of {})",
                        status, attempt, MAX_ATTEMPTS
                    );
                    last_failure =
                        format!("the endpoint answered with status {}", status);
                }
                Err(err) => {
                    warn!(
                        "could not reach tutoring endpoint (attempt {} of {}): {}",
                        attempt, MAX_ATTEMPTS, err
                    );
                    last_failure = format!(
                        "could not connect to {}. Check that the model server is running",
                        self.endpoint
                    );
                }
            }

            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }

        TutorReply::Unavailable(format!(
            "Tutoring is unavailable after {} attempts: {}.",
            MAX_ATTEMPTS, last_failure
        ))
    }
}
