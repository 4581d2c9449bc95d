//! `steady-http` is an async HTTP caller that wraps every request in a
//! per-attempt timeout and a bounded retry loop.
//!
//! The crate exposes one client with ergonomic methods:
//! - [`SteadyClient::call`]
//! - [`SteadyClient::try_call`]
//! - [`SteadyClient::get`] / [`SteadyClient::post`] and friends

mod client;
mod error;
mod failure;
mod options;
mod request;

pub use client::SteadyClient;
pub use error::CallError;
pub use failure::CallFailure;
pub use options::ClientOptions;
pub use request::CallRequest;

pub use reqwest::Method;

/// Taxonomy-preserving result, returned by [`SteadyClient::try_call`].
pub type Result<T> = std::result::Result<T, CallError>;

/// Uniform-boundary result, returned by [`SteadyClient::call`]. The error
/// branch is an ordinary value; nothing at this boundary panics.
pub type CallResult<T> = std::result::Result<T, CallFailure>;
