//! devgate is a development reverse proxy for single-page web clients.
//!
//! Each incoming request path goes through the [`filter`]: GraphQL
//! endpoint and console paths, OAuth flows and logout are forwarded to
//! a backend origin (by default `http://localhost:8081/`); everything
//! else is served from a local build directory with an `index.html`
//! fallback, or answered with 404 when no directory is configured.
//!
//! # Architecture
//!
//! - [`filter`] -- The path router predicate and its rule matching.
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate,
//!   check, health).
//! - [`config`] -- Configuration model, validation, file sources, and
//!   hot-reloading via the [`ConfigSource`](config::ConfigSource) trait.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /_devgate/health` handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty output.
//! - [`proxy`] -- Request dispatch: backend forwarding, header
//!   construction, and local static serving.
//! - [`server`] -- Axum server setup, shared application state, HTTP
//!   client, and graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file formats |
//! | `full` | All features |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod filter;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
