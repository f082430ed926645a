//! Remote inference through an OpenAI-compatible chat-completions endpoint.
//!
//! Each example's prompt is sent as a single user message. The reply is
//! appended, together with the example and the usage block, to a responses
//! file that is separate from the pipeline output.

use super::{extract_prompt, Runner};
use crate::core::Example;
use crate::errors::{KableError, Result};
use crate::io::writers::jsonl::append_record;
use crate::pipeline::stages::output_path::{absolutize_creating_parent, expand_home};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Text of the first choice, empty when the model returned none.
    pub fn first_message(&self) -> &str {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or("")
    }
}

/// Sends one chat request and returns the decoded completion.
pub trait ChatTransport {
    fn complete(&self, request: &ChatRequest<'_>) -> Result<ChatCompletion>;
}

/// Blocking HTTP transport.
pub struct HttpTransport {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatTransport for HttpTransport {
    fn complete(&self, request: &ChatRequest<'_>) -> Result<ChatCompletion> {
        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(request)
            .map_err(|e| KableError::http(&self.endpoint, e))?;

        response
            .body_mut()
            .read_json::<ChatCompletion>()
            .map_err(|e| KableError::http(&self.endpoint, e))
    }
}

/// Settings for [`ChatRunner::new`]. Unset values fall back to the
/// environment and then to the built-in defaults.
#[derive(Debug, Clone)]
pub struct ChatRunnerConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub responses_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for ChatRunnerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
            responses_path: None,
            output_dir: PathBuf::from(crate::pipeline::DEFAULT_OUTPUT_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Serialize)]
struct ResponseRecord<'a> {
    model: &'a str,
    prompt: &'a str,
    response: &'a str,
    example: Map<String, Value>,
    usage: Option<&'a Value>,
}

/// Runner that submits every prompt to a chat model.
pub struct ChatRunner<T: ChatTransport = HttpTransport> {
    model: String,
    transport: T,
    responses_path: PathBuf,
}

impl ChatRunner<HttpTransport> {
    /// Build a runner against the real endpoint.
    ///
    /// Fails with [`KableError::Configuration`] when no API key is given and
    /// none is set in the environment.
    pub fn new(config: ChatRunnerConfig) -> Result<Self> {
        let api_key = resolve_api_key(config.api_key.as_deref(), std::env::var(API_KEY_ENV).ok())?;
        let base_url = resolve_base_url(config.base_url, std::env::var(BASE_URL_ENV).ok());

        let transport = HttpTransport::new(&base_url, api_key, config.timeout);
        let responses_path = config
            .responses_path
            .unwrap_or_else(|| default_responses_path(&config.output_dir, &config.model));
        Self::with_transport(config.model, transport, &responses_path)
    }
}

impl<T: ChatTransport> ChatRunner<T> {
    pub fn with_transport(model: impl Into<String>, transport: T, responses_path: &Path) -> Result<Self> {
        let responses_path = absolutize_creating_parent(&expand_home(responses_path))?;
        Ok(Self {
            model: model.into(),
            transport,
            responses_path,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn responses_path(&self) -> &Path {
        &self.responses_path
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: ChatTransport> Runner for ChatRunner<T> {
    fn run(&mut self, example: &Example) -> Result<()> {
        let prompt = extract_prompt(example)?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let completion = self.transport.complete(&request)?;
        log::debug!(
            "{} answered {} chars for a {} example",
            self.model,
            completion.first_message().len(),
            example.subject()
        );

        let record = ResponseRecord {
            model: &self.model,
            prompt,
            response: completion.first_message(),
            example: example.to_record(),
            usage: completion.usage.as_ref(),
        };
        append_record(&self.responses_path, &record)
    }
}

/// Explicit URL, else the environment's, else [`DEFAULT_BASE_URL`].
pub fn resolve_base_url(explicit: Option<String>, from_env: Option<String>) -> String {
    non_blank(explicit)
        .or_else(|| non_blank(from_env))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// `<output_dir>/<model>-responses.jsonl`
pub fn default_responses_path(output_dir: &Path, model: &str) -> PathBuf {
    output_dir.join(format!("{}-responses.jsonl", model))
}

/// `None` for unset and blank values alike.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Pick the explicit key, else the environment's, rejecting blank values.
pub fn resolve_api_key(explicit: Option<&str>, from_env: Option<String>) -> Result<String> {
    non_blank(explicit.map(str::to_string))
        .or_else(|| non_blank(from_env))
        .ok_or_else(|| {
            KableError::config(format!(
                "An OpenAI API key is required. Provide one via --api-key or the {} environment variable.",
                API_KEY_ENV
            ))
        })
}
