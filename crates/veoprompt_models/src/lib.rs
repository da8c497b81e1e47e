//! Model provider drivers for VeoPrompt.
//!
//! Each provider sits behind its own feature flag and implements
//! [`VeoDriver`](veoprompt_interface::VeoDriver). Drivers do not retry; the
//! pipeline owns retry and timeout policy so every stage is bounded the same
//! way.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use veoprompt_core::{GenerateRequest, Message, Role};
//! use veoprompt_interface::VeoDriver;
//! use veoprompt_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::from_env("gemini-2.5-flash")?;
//! let request = GenerateRequest {
//!     messages: vec![Message::text(Role::User, "Describe a misty pine forest")],
//!     ..Default::default()
//! };
//! let response = client.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod errors;

pub use errors::classify_error;

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::GeminiClient;
