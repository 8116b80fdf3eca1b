//! REST clients for the video studio backends.
//!
//! This crate provides:
//! - Explicit configuration with runtime-injected base URLs
//! - A shared JSON transport with read retries, tracing spans and metrics
//! - A request interceptor seam for credentials
//! - The core project API client (CRUD + stage generation)
//! - The YouTube proxy client (auth, upload, scheduling, metadata, thumbnails)

pub mod config;
pub mod error;
pub mod metrics;
pub mod projects;
pub mod retry;
pub mod transport;
pub mod youtube;

#[cfg(test)]
mod client_tests;

pub use config::{RuntimeValues, StudioConfig};
pub use error::{StudioError, StudioResult};
pub use projects::{ProjectsApi, ProjectsClient};
pub use retry::RetryConfig;
pub use transport::{BearerToken, RequestInterceptor, RestClient};
pub use youtube::{YouTubeApi, YouTubeClient};
