//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that completes the
//! Spotify OAuth 2.0 PKCE flow (`genrecli auth`).
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the authorization code from Spotify, exchanges it
//!   together with the stored code verifier for a token and hands the token
//!   back to the waiting auth flow.
//! - [`health`] - Reports status and version, handy to check that the
//!   callback address is reachable before starting the flow.
//!
//! ## Related Modules
//!
//! - [`crate::spotify::auth`] - Drives the flow and persists the token
//! - [`crate::server`] - Binds the router to `SERVER_ADDRESS`

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
