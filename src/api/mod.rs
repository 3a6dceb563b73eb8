//! HTTP API client modules.
//!
//! This module provides the typed client for the test server's REST API.

pub mod client;

pub use client::{ApiClient, FetchError};
