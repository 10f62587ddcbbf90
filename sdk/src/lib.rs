//! Typed client for the Vigil monitoring API.
//!
//! # Overview
//! Every call follows the same path: a service method builds a plain-data
//! [`Request`], the dispatcher executes it against the configured base URL
//! with auth headers and a timeout, and the `{status, message, data, meta}`
//! envelope is decoded into the concrete type the call site names. Errors
//! are never swallowed: exactly one of (value, error) comes back per call.
//!
//! # Design
//! - [`Client`] is immutable after construction and safe to share across
//!   tasks; it never retries on its own.
//! - Cancellation is caller-driven: every method takes a
//!   `CancellationToken` and aborts in-flight calls promptly.
//! - Single-entity fetches are strict (missing `data` is an error); list
//!   fetches are lenient (missing `data` is an empty collection).
//! - [`ServiceTracker`] and the `convert` helpers support agents building
//!   submission payloads from platform counters; they do no I/O.

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod http;
pub mod page;
mod resources;
pub mod tracker;
pub mod types;

pub use client::Client;
pub use config::{Config, Credentials};
pub use error::{Error, Result};
pub use http::{Envelope, Request};
pub use page::{PageMeta, PageOptions};
pub use tracker::{health_score, uptime_since, MetricsSample, ServiceStatus, ServiceTracker};
pub use types::{Alert, DiskIoSample, HealthReport, RegisterServer, Server, ServiceHealth};
