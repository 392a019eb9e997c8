//! # Estuary
//!
//! An aggregation server that turns many unrelated sources (feeds, scraped
//! HTML pages, JSON APIs) into one uniform title+link list.
//!
//! ## Architecture
//!
//! ```text
//! POST /resource {type, args} → Router → Adapter → Fetcher → upstream
//!                                  ↓
//!                {code: "ok"|"error", res: {title, items}}
//! ```
//!
//! - [`router`]: static name→adapter dispatch with the uniform envelope
//! - [`adapters`]: one normalizer per upstream source
//! - [`twitch`]: token exchange and the dependent Helix lookup chains
//! - [`fetcher`]: outbound HTTP with failures-as-values
//! - [`server`]: the axum surface (`/resource`, `/status`)

/// Application context and error handling.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Request-definition file served by `/status`.
pub mod config;

/// Core domain models: [`Item`](domain::Item), [`FeedResult`](domain::FeedResult),
/// [`Envelope`](domain::Envelope), [`IgnoreList`](domain::IgnoreList).
pub mod domain;

/// Outbound HTTP.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait over transport
/// - [`HttpClient`](fetcher::HttpClient): reqwest-based implementation with a
///   browser identity and an optional extended trust bundle
pub mod fetcher;

/// Source adapters, one per upstream shape.
pub mod adapters;

/// Request dispatch and the success/failure envelope contract.
pub mod router;

/// Inbound HTTP endpoints.
pub mod server;

/// Twitch Helix sub-client with the process-wide token cache.
pub mod twitch;
