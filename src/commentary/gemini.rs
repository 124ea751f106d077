//! Gemini-backed commentary
//!
//! Sends a short prompt to the `generateContent` REST endpoint and returns
//! the trimmed reply. Transport and decoding errors are logged and masked
//! with a fallback line.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::fallback::FallbackCommentary;
use super::{CommentaryError, CommentaryFuture, CommentaryProvider};
use crate::sim::GameEvent;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Returned when the service answers with no text
pub const EMPTY_REPLY: &str = "System ready.";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// A pending HTTP response body
pub type TransportFuture = Pin<Box<dyn Future<Output = Result<String, CommentaryError>>>>;

/// Minimal HTTP client seam (fetch in the browser, a stub on native, mocks in tests)
pub trait Transport {
    /// POST a JSON body and resolve to the response body on a 2xx status
    fn post_json(&self, url: &str, headers: &[(&str, &str)], body: String) -> TransportFuture;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Situation line for each event
fn event_context(event: GameEvent, score: u32, misses: u32) -> String {
    match event {
        GameEvent::Start => {
            "Game started. Player controls a basket to catch falling fruit.".to_string()
        }
        GameEvent::CatchStreak => format!(
            "Player is doing well. Score is {score}. They are catching fruits efficiently."
        ),
        GameEvent::MissStreak => format!(
            "Player just missed a fruit. Total misses: {misses}. They need to be faster."
        ),
        GameEvent::GameOver => format!(
            "Game over. Final score: {score}. The player missed too many fruits."
        ),
    }
}

/// Prompt sent to the model
pub fn build_prompt(event: GameEvent, score: u32, misses: u32) -> String {
    format!(
        "You are a high-speed sports commentator AI watching a fruit catching game.\n\
         \n\
         Context: {context}\n\
         \n\
         Write a very short, punchy, energetic comment (max 12 words).\n\
         \n\
         Tone:\n\
         - If 'catch_streak': Hyped, impressed by speed.\n\
         - If 'miss_streak': Urgent warning, \"fumble detected\".\n\
         - If 'gameover': Summary of performance, better luck next time.\n\
         - If 'start': \"Ready, set, catch!\"\n\
         \n\
         Event: {event}",
        context = event_context(event, score, misses),
        event = event.as_str(),
    )
}

/// JSON body for a `generateContent` call
fn request_body(prompt: String) -> Result<String, CommentaryError> {
    let request = GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
    };
    Ok(serde_json::to_string(&request)?)
}

/// Text of the first candidate, trimmed (possibly empty)
fn reply_text(body: &str) -> Result<String, CommentaryError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    Ok(text.trim().to_string())
}

/// One `generateContent` round trip
async fn request_reply(
    transport: &dyn Transport,
    url: &str,
    api_key: &str,
    prompt: String,
) -> Result<String, CommentaryError> {
    let body = request_body(prompt)?;
    let headers = [("Content-Type", "application/json"), (API_KEY_HEADER, api_key)];
    let response = transport.post_json(url, &headers, body).await?;
    reply_text(&response)
}

/// Commentary from the Gemini API, falling back to local lines on failure
pub struct GeminiCommentary {
    api_key: Rc<str>,
    url: Rc<str>,
    transport: Rc<dyn Transport>,
    fallback: Rc<FallbackCommentary>,
}

impl GeminiCommentary {
    pub fn new(
        api_key: &str,
        model: &str,
        endpoint: &str,
        transport: Rc<dyn Transport>,
        fallback: FallbackCommentary,
    ) -> Self {
        let url = format!(
            "{}/models/{}:generateContent",
            endpoint.trim_end_matches('/'),
            model
        );
        Self {
            api_key: Rc::from(api_key),
            url: Rc::from(url),
            transport,
            fallback: Rc::new(fallback),
        }
    }

    /// Full `generateContent` URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CommentaryProvider for GeminiCommentary {
    fn generate_reaction(&self, event: GameEvent, score: u32, misses: u32) -> CommentaryFuture {
        let prompt = build_prompt(event, score, misses);
        let api_key = Rc::clone(&self.api_key);
        let url = Rc::clone(&self.url);
        let transport = Rc::clone(&self.transport);
        let fallback = Rc::clone(&self.fallback);

        Box::pin(async move {
            match request_reply(&*transport, &url, &api_key, prompt).await {
                Ok(text) if text.is_empty() => EMPTY_REPLY.to_string(),
                Ok(text) => text,
                Err(err) => {
                    log::error!("Gemini API error ({}): {}", event.as_str(), err);
                    fallback.pick().to_string()
                }
            }
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::FALLBACK_REACTIONS;
    use std::cell::RefCell;
    use std::future;

    /// Canned transport that records requests
    struct MockTransport {
        reply: Box<dyn Fn() -> Result<String, CommentaryError>>,
        requests: RefCell<Vec<(String, Vec<(String, String)>, String)>>,
    }

    impl MockTransport {
        fn new(reply: impl Fn() -> Result<String, CommentaryError> + 'static) -> Rc<Self> {
            Rc::new(Self {
                reply: Box::new(reply),
                requests: RefCell::new(Vec::new()),
            })
        }
    }

    impl Transport for MockTransport {
        fn post_json(&self, url: &str, headers: &[(&str, &str)], body: String) -> TransportFuture {
            let headers = headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            self.requests
                .borrow_mut()
                .push((url.to_string(), headers, body));
            Box::pin(future::ready((self.reply)()))
        }
    }

    fn provider(transport: Rc<MockTransport>) -> GeminiCommentary {
        GeminiCommentary::new(
            "test-key",
            DEFAULT_MODEL,
            DEFAULT_ENDPOINT,
            transport,
            FallbackCommentary::new(1),
        )
    }

    #[test]
    fn test_prompt_mentions_context() {
        let prompt = build_prompt(GameEvent::GameOver, 42, 5);
        assert!(prompt.contains("Final score: 42"));
        assert!(prompt.contains("max 12 words"));

        let prompt = build_prompt(GameEvent::MissStreak, 3, 2);
        assert!(prompt.contains("Total misses: 2"));
    }

    #[test]
    fn test_reply_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  Great "},{"text":"catch! "}]}}]}"#;
        assert_eq!(reply_text(body).unwrap(), "Great catch!");
        assert_eq!(reply_text(r#"{"candidates":[]}"#).unwrap(), "");
        assert_eq!(reply_text("{}").unwrap(), "");
        assert!(reply_text("not json").is_err());
    }

    #[test]
    fn test_successful_reply() {
        let transport = MockTransport::new(|| {
            Ok(r#"{"candidates":[{"content":{"parts":[{"text":"Ready, set, catch!"}]}}]}"#
                .to_string())
        });
        let gemini = provider(Rc::clone(&transport));
        let text = pollster::block_on(gemini.generate_reaction(GameEvent::Start, 0, 0));
        assert_eq!(text, "Ready, set, catch!");

        let requests = transport.requests.borrow();
        let (url, headers, body) = &requests[0];
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(headers.contains(&("x-goog-api-key".to_string(), "test-key".to_string())));
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert!(
            body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("Game started")
        );
    }

    #[test]
    fn test_empty_reply_uses_placeholder() {
        let transport = MockTransport::new(|| Ok(r#"{"candidates":[]}"#.to_string()));
        let text = pollster::block_on(provider(transport).generate_reaction(
            GameEvent::CatchStreak,
            5,
            0,
        ));
        assert_eq!(text, EMPTY_REPLY);
    }

    #[test]
    fn test_failures_mask_to_fallback() {
        let failures: Vec<Box<dyn Fn() -> Result<String, CommentaryError>>> = vec![
            Box::new(|| Err(CommentaryError::Status(500))),
            Box::new(|| Err(CommentaryError::TransportUnavailable)),
            Box::new(|| Ok("<html>".to_string())),
        ];
        for failure in failures {
            let transport = MockTransport::new(failure);
            let text = pollster::block_on(provider(transport).generate_reaction(
                GameEvent::MissStreak,
                1,
                1,
            ));
            assert!(FALLBACK_REACTIONS.contains(&text.as_str()), "got {text}");
        }
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let gemini = GeminiCommentary::new(
            "k",
            "m",
            "https://example.test/v1/",
            MockTransport::new(|| Ok(String::new())),
            FallbackCommentary::new(1),
        );
        assert_eq!(gemini.url(), "https://example.test/v1/models/m:generateContent");
    }
}
