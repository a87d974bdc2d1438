//! # ModKit
//!
//! Shared building blocks for the server's modules:
//!
//! - **Contracts**: `DbModule`, `RestfulModule`, `RestHostModule`
//! - **Problem responses**: RFC 9457 `application/problem+json` errors
//! - **DB**: SeaORM connection helper with SQLite path handling
//! - **Runtime**: phase runner (db → rest → serve) with signal-driven shutdown

pub use anyhow::Result;
pub use async_trait::async_trait;

// Core module contracts and traits
pub mod contracts;
pub use crate::contracts::*;

pub mod api;
pub use api::problem::{Problem, ProblemResponse, ValidationError};

pub mod db;
pub mod runtime;

pub use runtime::{run, RunOptions, ShutdownOptions};
