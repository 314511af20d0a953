//! # Desktop Bridge Implementations
//!
//! Native implementations of bridge traits for running the reader core
//! outside a browser (tools, tests against the live API, server-side use).
//!
//! - `HttpClient` using `reqwest` with rustls
//!
//! Media output has no desktop adapter; hosts that play audio inject their own
//! `AudioOutput` and `SpeechSynthesizer`.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let config = ReaderConfig::builder().http_client(http_client).build()?;
//! ```

mod http;

pub use http::ReqwestHttpClient;
