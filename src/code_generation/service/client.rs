use std::thread;
use std::time::Instant;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::code_generation::service::policy::ServicePolicy;
use crate::shared::error::ServiceError;
use crate::user_config::Credential;

pub const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const MODEL: &str = "gpt-4o-mini";

/// Anything that can turn a prompt into text
pub trait TextGenerator {
    /// Send one prompt and return the reply text as-is
    fn generate(&self, prompt: &str, credential: &Credential) -> Result<String, ServiceError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking client for the OpenAI chat completions endpoint
pub struct OpenAiClient {
    agent: ureq::Agent,
    endpoint: String,
    policy: ServicePolicy,
}

impl OpenAiClient {
    pub fn new(policy: ServicePolicy) -> Self {
        Self::with_endpoint(CHAT_COMPLETIONS_URL, policy)
    }

    pub fn with_endpoint(endpoint: &str, policy: ServicePolicy) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = policy.timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            agent: builder.build(),
            endpoint: endpoint.to_string(),
            policy,
        }
    }

    /// Serialize the single-message request body
    fn request_body(prompt: &str) -> Result<String, ServiceError> {
        let request = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage { role: "user", content: prompt }],
        };
        serde_json::to_string(&request)
            .map_err(|e| ServiceError::InvalidResponse(format!("encoding request: {}", e)))
    }

    /// Pull the first completion's text out of a response body
    fn parse_reply(body: &str) -> Result<String, ServiceError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| ServiceError::InvalidResponse("no choices in response".to_string()))
    }

    fn send_once(&self, body: &str, credential: &Credential) -> Result<String, ServiceError> {
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", credential.expose()))
            .set("Content-Type", "application/json")
            .send_string(body);

        match response {
            Ok(response) => {
                let text = response
                    .into_string()
                    .map_err(|e| ServiceError::Transport(format!("reading response: {}", e)))?;
                Self::parse_reply(&text)
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(ServiceError::Status { status, body })
            }
            Err(ureq::Error::Transport(transport)) => Err(ServiceError::Transport(transport.to_string())),
        }
    }
}

impl TextGenerator for OpenAiClient {
    fn generate(&self, prompt: &str, credential: &Credential) -> Result<String, ServiceError> {
        let body = Self::request_body(prompt)?;
        debug!("Sending prompt of {} characters to {}", prompt.len(), MODEL);

        let attempts = self.policy.attempts();
        let mut attempt = 1;
        loop {
            let start = Instant::now();
            match self.send_once(&body, credential) {
                Ok(text) => {
                    info!(
                        "Generation completed in {:.2}s ({} characters)",
                        start.elapsed().as_secs_f64(),
                        text.len()
                    );
                    return Ok(text);
                }
                Err(e) if e.is_transient() && attempt < attempts => {
                    let delay = self.policy.delay_before(attempt);
                    warn!("Attempt {}/{} failed: {}; retrying in {:?}", attempt, attempts, e, delay);
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => {
                    error!("Error generating text: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
