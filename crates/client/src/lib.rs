//! Client-side engine for swcache.
//!
//! This crate provides the reqwest-backed network and the request
//! interceptor (routing, caching policies, lifecycle, side channels) shared
//! by the MCP server and the CLI.

pub mod fetch;
pub mod worker;

pub use fetch::{FetchConfig, HttpNetwork, UrlError, resolve};
pub use worker::{
    ClickOutcome, EventOutcome, Lifecycle, Notification, Phase, Policy, Route, Router, Worker, WorkerContext,
    WorkerEvent, WorkerHost,
};
