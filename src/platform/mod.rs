//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (frame-clock milliseconds)
//! - Seeds
//! - Detached tasks (commentary requests)
//! - HTTP transport
//! - Logger setup

use std::future::Future;
use std::pin::Pin;

/// A detached single-threaded task
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Runs detached tasks without blocking the caller's frame
pub trait Spawner {
    fn spawn(&self, task: LocalTask);
}

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(not(target_arch = "wasm32"))]
pub use native::*;
