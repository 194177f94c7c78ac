//! Library crate for user-dashboard.
//!
//! This crate exposes the building blocks of the TUI:
//! - HTTP client and user record types (`api`)
//! - Application state, fetch dispatch and update loop (`app`)
//! - Command-line and config-file settings (`config`)
//! - Error and result types (`error`)
//! - Filter/sort/paginate derivation over the users state (`view`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `user-dashboard` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod ui;
pub mod view;

/// Error and result types shared across the crate.
pub use error::{FetchError, Result};
