//! Pazar storefront library.
//!
//! Cart, favorites, session, and filter state behind a single [`store::Store`],
//! the category-driven catalog fetch, the auth client, and the JSON API that
//! exposes them. The binary in `main.rs` only wires these together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
