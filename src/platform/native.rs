//! Native platform: headless demo and tests

use std::rc::Rc;
use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use super::{LocalTask, Spawner};
use crate::commentary::{CommentaryError, Transport, TransportFuture};

/// Runs each task to completion on the spot
///
/// Native commentary only ever resolves immediately (fallback or an
/// unavailable transport), so blocking here never stalls a frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingSpawner;

impl Spawner for BlockingSpawner {
    fn spawn(&self, task: LocalTask) {
        pollster::block_on(task);
    }
}

/// Default spawner for this platform
pub fn spawner() -> Rc<dyn Spawner> {
    Rc::new(BlockingSpawner)
}

/// No HTTP client is bundled for native builds
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableTransport;

impl Transport for UnavailableTransport {
    fn post_json(&self, _url: &str, _headers: &[(&str, &str)], _body: String) -> TransportFuture {
        Box::pin(std::future::ready(Err(CommentaryError::TransportUnavailable)))
    }
}

/// HTTP transport for this platform
pub fn http_transport() -> Rc<dyn Transport> {
    Rc::new(UnavailableTransport)
}

/// Milliseconds since the first call (monotonic)
pub fn now_ms() -> f64 {
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Seed from wall-clock time
pub fn seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
