//! GitLab API module
//!
//! Provides a thin client for the GitLab REST API. Every call is exactly one
//! HTTP round trip; the real business logic lives on GitLab's side.

pub mod client;

pub use client::GitLabClient;
