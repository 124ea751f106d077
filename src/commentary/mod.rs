//! Live commentary on game events
//!
//! A [`CommentaryProvider`] turns an event plus the current score into a
//! short display string. Providers never fail observably: anything that
//! goes wrong inside them resolves to fallback text instead.

pub mod fallback;
pub mod gemini;

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use thiserror::Error;

use crate::platform;
use crate::settings::Settings;
use crate::sim::GameEvent;

pub use fallback::{FALLBACK_REACTIONS, FallbackCommentary};
pub use gemini::{GeminiCommentary, Transport, TransportFuture, build_prompt};

/// A pending commentary string
pub type CommentaryFuture = Pin<Box<dyn Future<Output = String>>>;

/// Produces commentary for game events
pub trait CommentaryProvider {
    /// Generate a reaction to `event`. Always resolves to a non-empty string.
    fn generate_reaction(&self, event: GameEvent, score: u32, misses: u32) -> CommentaryFuture;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Failures inside a provider. Logged and replaced by fallback text.
#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("no HTTP transport available on this platform")]
    TransportUnavailable,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service responded with HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Pick a provider for the given settings
///
/// Without an API key this is the fallback provider; that is a supported
/// mode, not an error.
pub fn provider_from_settings(settings: &Settings, seed: u64) -> Rc<dyn CommentaryProvider> {
    let fallback = FallbackCommentary::new(seed);
    match settings.api_key() {
        Some(key) => {
            log::info!("Commentary: Gemini ({})", settings.model);
            Rc::new(GeminiCommentary::new(
                key,
                &settings.model,
                &settings.endpoint,
                platform::http_transport(),
                fallback,
            ))
        }
        None => {
            log::info!("Commentary: no API key configured, using fallback lines");
            Rc::new(fallback)
        }
    }
}
