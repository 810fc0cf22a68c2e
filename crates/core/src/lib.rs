//! Bistro Core - Shared domain types.
//!
//! This crate provides the data model used across all Bistro components:
//! - `storefront` - Public menu, cart and checkout API plus the admin panel API
//! - `cli` - Command-line tools for managing the storage directory
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, emails, slugs and the menu/content/guest entities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
