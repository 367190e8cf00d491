//! Pazar Core - Shared domain types.
//!
//! This crate provides the types every Pazar component agrees on:
//! - `storefront` - Stores, catalog mapping, and the JSON surface
//! - `integration-tests` - End-to-end checks against fake upstreams
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no global state. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, and product snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
