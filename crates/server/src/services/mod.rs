//! Business logic services.

pub mod auth;
pub mod billing;
pub mod identity;
pub mod notifier;
pub mod qr;
pub mod recorder;
pub mod registry;
pub mod scan;
