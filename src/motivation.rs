//! Motivational quote requested from a chat-completion API whenever a task is
//! completed.
//!
//! Requests are fire-and-forget: each one runs on the tokio runtime and posts
//! its [`Outcome`] back over a channel. Nothing is cancelled or deduplicated,
//! so when requests overlap the last one to resolve decides what is shown.

use crate::config::Config;
use crate::error::MotivationError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

pub const FALLBACK_MESSAGE: &str = "Stay focused and keep making progress!";
pub const PLACEHOLDER_MESSAGE: &str = "Complete tasks to unlock motivational quotes!";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Sends one completion request and returns the first choice's text verbatim.
pub async fn request_quote(
    client: &reqwest::Client,
    config: &Config,
) -> Result<String, MotivationError> {
    let body = ChatRequest {
        model: &config.model,
        messages: [ChatMessage {
            role: "user",
            content: &config.prompt,
        }],
    };

    let response = client
        .post(&config.api_url)
        .header(AUTHORIZATION, format!("Bearer {}", config.api_key()))
        .header(CONTENT_TYPE, "application/json")
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(MotivationError::Status { status, body });
    }

    let data: ChatResponse = response.json().await?;
    data.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(MotivationError::MissingContent)
}

/// Result of one request, already resolved to display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub request: u64,
    pub message: String,
}

/// What the "Productivity Tip" panel shows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MotivationPanel {
    pub loading: bool,
    pub message: Option<String>,
}

impl MotivationPanel {
    pub fn start(&mut self) {
        self.loading = true;
    }

    /// Any outcome overwrites the message and clears the spinner, even if
    /// other requests are still in flight.
    pub fn finish(&mut self, outcome: Outcome) {
        self.message = Some(outcome.message);
        self.loading = false;
    }

    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or(PLACEHOLDER_MESSAGE)
    }
}

pub struct MotivationFetcher {
    client: reqwest::Client,
    config: Arc<Config>,
    runtime: Handle,
    tx: UnboundedSender<Outcome>,
    next_request: u64,
}

impl MotivationFetcher {
    pub fn new(config: Arc<Config>, runtime: Handle) -> (Self, UnboundedReceiver<Outcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Self {
            client: reqwest::Client::new(),
            config,
            runtime,
            tx,
            next_request: 0,
        };
        (fetcher, rx)
    }

    /// Starts a request in the background and returns its sequence number.
    pub fn spawn(&mut self) -> u64 {
        self.next_request += 1;
        let request = self.next_request;
        let client = self.client.clone();
        let config = Arc::clone(&self.config);
        let tx = self.tx.clone();

        info!(request, url = %config.api_url, "requesting motivational quote");
        let _ = self.runtime.spawn(async move {
            let message = match request_quote(&client, &config).await {
                Ok(quote) => {
                    info!(request, "motivational quote received");
                    quote
                }
                Err(err) => {
                    error!(request, error = %err, "error fetching motivation");
                    FALLBACK_MESSAGE.to_string()
                }
            };
            // receiver gone means the UI has exited
            let _ = tx.send(Outcome { request, message });
        });
        request
    }
}
