//! Browser platform

use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::{LocalTask, Spawner};
use crate::commentary::{CommentaryError, Transport, TransportFuture};

/// Spawns tasks onto the browser's microtask queue
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSpawner;

impl Spawner for LocalSpawner {
    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// Default spawner for this platform
pub fn spawner() -> Rc<dyn Spawner> {
    Rc::new(LocalSpawner)
}

/// `fetch`-based transport
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

fn js_error(value: JsValue) -> CommentaryError {
    CommentaryError::Transport(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

impl Transport for FetchTransport {
    fn post_json(&self, url: &str, headers: &[(&str, &str)], body: String) -> TransportFuture {
        let url = url.to_string();
        let headers: Vec<(String, String)> = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Box::pin(async move {
            let window = web_sys::window().ok_or(CommentaryError::TransportUnavailable)?;

            let opts = RequestInit::new();
            opts.set_method("POST");
            opts.set_mode(RequestMode::Cors);
            opts.set_body(&JsValue::from_str(&body));

            let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
            for (name, value) in &headers {
                request.headers().set(name, value).map_err(js_error)?;
            }

            let response = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(js_error)?;
            let response: Response = response.dyn_into().map_err(js_error)?;
            if !response.ok() {
                return Err(CommentaryError::Status(response.status()));
            }

            let text = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?;
            text.as_string()
                .ok_or_else(|| CommentaryError::Transport("response body is not text".to_string()))
        })
    }
}

/// HTTP transport for this platform
pub fn http_transport() -> Rc<dyn Transport> {
    Rc::new(FetchTransport)
}

/// Milliseconds on the same clock as `requestAnimationFrame` timestamps
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Seed from wall-clock time
pub fn seed() -> u64 {
    js_sys::Date::now() as u64
}

pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}
