//! tillbook - Point-of-sale daily ledger and analytics engine
//!
//! This library provides the core functionality for the tillbook
//! point-of-sale companion. It maintains a carry-forward daily cash
//! balance, records manual expenses against income from the sales store,
//! and derives period analytics reports for rendering layers.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, balances, expenses, sales, periods)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer (ledger, analytics, import)
//! - `reports`: Derived report payloads for renderers
//! - `cli`: Command handlers for the `tillbook` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use tillbook::config::{paths::TillbookPaths, settings::Settings};
//!
//! let paths = TillbookPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TillbookError, TillbookResult};
