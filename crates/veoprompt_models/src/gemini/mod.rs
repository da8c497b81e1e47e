//! Google Gemini driver.

mod client;

pub use client::GeminiClient;
