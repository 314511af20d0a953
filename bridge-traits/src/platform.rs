//! Trait-bound helpers that follow the threading model of each target.
//!
//! Native hosts share bridge implementations across tokio tasks and need
//! `Send + Sync`. Browser hosts wrap single-threaded objects (media elements,
//! the speech synthesis API) that can never satisfy those bounds, so the
//! markers collapse to nothing on `wasm32`.

/// `Send + Sync` on native targets, no bound on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> PlatformSendSync for T where T: Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSendSync for T {}
