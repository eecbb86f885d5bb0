//! # Anthropic Messages API Client
//!
//! The slice of the Anthropic API the RailReserve travel assistant needs:
//! a single non-streaming `messages` call with a system prompt and a
//! sampling temperature.
//!
//! ## Example
//!
//! ```no_run
//! use railreserve_anthropic::{AnthropicClient, Message, MessagesRequest};
//!
//! # async fn example() -> Result<(), railreserve_anthropic::ClaudeError> {
//! let client = AnthropicClient::from_env()?;
//! let request = MessagesRequest::new(vec![Message::user("Fastest train to Pune?")])
//!     .with_system("You are a railway station assistant.".to_string())
//!     .with_temperature(0.7);
//!
//! let response = client.messages(request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod messages;
pub mod types;

pub use client::AnthropicClient;
pub use error::ClaudeError;
pub use messages::{MessagesRequest, MessagesResponse};
pub use types::{ContentBlock, Message, Role, StopReason, Usage};
