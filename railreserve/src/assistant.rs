//! Assistant Gateway: free-text travel questions answered by a hosted model.
//!
//! The gateway is opaque to the booking desk. It receives the question and a
//! route summary, and always comes back with displayable text: any failure
//! or timeout turns into [`FALLBACK_REPLY`].

use futures::future::{self, BoxFuture, FutureExt};
use railreserve_anthropic::{AnthropicClient, ClaudeError, Message, MessagesRequest};
use std::time::Duration;
use thiserror::Error;

/// Shown whenever the assistant cannot be reached
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting to the network. Please try again in a moment.";

/// Shown when the assistant answers with no text
pub const EMPTY_REPLY: &str = "Error processing request.";

/// Station named in the assistant's instructions by default
pub const DEFAULT_STATION: &str = "Amaravati Railway Station";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// Reply length cap used when none is configured
pub const DEFAULT_MAX_TOKENS: u32 = 512;

const TEMPERATURE: f32 = 0.7;

const NETWORK: &str = "Pune, Nagpur, Akola, Mumbai, Delhi, Hyderabad, Bangalore, Chennai, \
                       Ahmedabad, Surat, Jabalpur, Raipur, Indore, Bhopal, and Varanasi";

/// One question for the assistant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistantRequest {
    /// What the user typed
    pub query: String,
    /// Route list of the current catalog
    pub context_summary: String,
}

/// Why the assistant produced no answer
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No API key was configured
    #[error("Travel assistant is not configured")]
    NotConfigured,

    /// The hosted model call failed
    #[error("Travel assistant request failed: {0}")]
    Upstream(#[from] ClaudeError),

    /// No answer within the allotted time
    #[error("Travel assistant timed out after {0:?}")]
    Timeout(Duration),
}

/// Boxed future returned by [`TravelAssistant::ask`]
pub type AssistantFuture<'a> = BoxFuture<'a, Result<String, AssistantError>>;

/// Something that can answer travel questions
pub trait TravelAssistant: Send + Sync {
    /// Answer `request`
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError`] if no answer could be produced.
    fn ask(&self, request: AssistantRequest) -> AssistantFuture<'_>;
}

/// Assistant backed by the Anthropic Messages API
#[derive(Debug, Clone)]
pub struct ClaudeTravelAssistant {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
    station: String,
}

impl ClaudeTravelAssistant {
    /// Assistant using `client` with the default model and station
    #[must_use]
    pub fn new(client: AnthropicClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            station: DEFAULT_STATION.to_string(),
        }
    }

    /// Builder: Set model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder: Set reply length cap
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Builder: Set the station the assistant speaks for
    #[must_use]
    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = station.into();
        self
    }

    /// Instructions sent with every question
    #[must_use]
    pub fn system_prompt(&self, context_summary: &str) -> String {
        format!(
            "You are a RailReserve assistant for {}. Help users with train timings and travel \
             tips. The network now covers major destinations: {NETWORK}. Be concise and \
             professional. Context of trains currently in system: {context_summary}",
            self.station
        )
    }
}

impl TravelAssistant for ClaudeTravelAssistant {
    fn ask(&self, request: AssistantRequest) -> AssistantFuture<'_> {
        async move {
            let messages_request = MessagesRequest::new(vec![Message::user(request.query)])
                .with_model(self.model.clone())
                .with_max_tokens(self.max_tokens)
                .with_system(self.system_prompt(&request.context_summary))
                .with_temperature(TEMPERATURE);

            let response = self.client.messages(messages_request).await?;
            Ok(response.text())
        }
        .boxed()
    }
}

/// Assistant used when no API key is configured; every question fails
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAssistant;

impl TravelAssistant for OfflineAssistant {
    fn ask(&self, _request: AssistantRequest) -> AssistantFuture<'_> {
        future::ready(Err(AssistantError::NotConfigured)).boxed()
    }
}

/// Ask `assistant`, always producing displayable text.
///
/// Errors and timeouts become [`FALLBACK_REPLY`]; a blank answer becomes
/// [`EMPTY_REPLY`]. Nothing escapes to the caller.
pub async fn ask_with_fallback(
    assistant: &dyn TravelAssistant,
    request: AssistantRequest,
    timeout: Duration,
) -> String {
    let outcome = tokio::time::timeout(timeout, assistant.ask(request))
        .await
        .unwrap_or_else(|_| Err(AssistantError::Timeout(timeout)));

    match outcome {
        Ok(text) if text.trim().is_empty() => {
            tracing::warn!("Travel assistant returned an empty answer");
            EMPTY_REPLY.to_string()
        },
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Travel assistant unavailable");
            FALLBACK_REPLY.to_string()
        },
    }
}
