//! Core types for BlueDrop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod kind;
pub mod month;
pub mod phone;
pub mod qr;
pub mod role;

pub use category::CustomerCategory;
pub use email::{Email, EmailError};
pub use id::*;
pub use kind::NotificationKind;
pub use month::{MonthKey, MonthKeyError};
pub use phone::{Msisdn, Phone, PhoneError};
pub use qr::{QR_MARKER, QrPayload, QrPayloadError};
pub use role::Role;
