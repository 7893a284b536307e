//! BlueDrop server library.
//!
//! Exposes the server as a library so the CLI and integration tests can
//! reuse the repositories, services, and router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
