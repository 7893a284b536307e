//! Domain models for the BlueDrop server.
//!
//! These types represent validated rows from the database plus the
//! session-held identity. Repositories in [`crate::db`] construct them;
//! services in [`crate::services`] operate on them.

pub mod account;
pub mod customer;
pub mod delivery;
pub mod notification;
pub mod payment;
pub mod session;

pub use account::{Account, BusinessProfile, StaffInvite};
pub use customer::{Customer, CustomerUpdate, NewCustomer};
pub use delivery::Delivery;
pub use notification::Notification;
pub use payment::Payment;
pub use session::{CurrentUser, keys as session_keys};
