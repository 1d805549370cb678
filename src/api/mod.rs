//! Typed client for the auth9-core REST API.

pub mod client;

pub use client::Auth9Client;
