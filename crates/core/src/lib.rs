//! BlueDrop Core - Shared domain types.
//!
//! This crate provides common types used across all BlueDrop components:
//! - `server` - Web application (owner and staff sessions)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, phone numbers, month
//!   buckets, QR payloads, and domain enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
