//! Async client for a PostgREST-style remote table store.
//!
//! # Overview
//! Exposes get-all, get-filtered, insert, update and delete against a named
//! table. Requests are built and responses parsed as plain data (`rest`), and
//! a pooled `reqwest` transport executes them, so the wire format can be
//! tested without a server.
//!
//! # Design
//! - `StoreClient` is constructed once from `StoreConfig`, fails fast on a
//!   blank URL or key, and is cheap to clone.
//! - No retries or backoff: transport failures surface as `StoreError`.
//! - An empty row set is never an error; callers decide what it means.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod rest;
pub mod transport;

pub use client::{StoreClient, Table};
pub use config::{AccessKey, StoreConfig};
pub use error::StoreError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use rest::{parse_rows, Endpoint, Filter};
pub use transport::Transport;
