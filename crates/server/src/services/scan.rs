//! QR scan pipeline.
//!
//! The scan flow is a small state machine held in the session: open the
//! scanner, decode a code, confirm the matched customer, submit the
//! quantity form. Transitions are pure functions on [`ScanState`] so the
//! legality rules are testable without a session or a database; the
//! service wraps them with session persistence and the customer lookup.
//!
//! A decoded code is validated against the marker and the signed-in
//! business before any lookup happens, so a foreign business's code is
//! rejected without touching data. Every terminal outcome, success or
//! failure, lands the machine back in `Idle`.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use bluedrop_core::{CustomerId, QrPayload};

use crate::error::AppError;
use crate::models::{CurrentUser, Customer, session_keys};
use crate::services::registry::CustomerRegistry;
use crate::state::AppState;

/// State of the scan pipeline for one session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ScanState {
    /// No scan in progress.
    #[default]
    Idle,
    /// Scanner is open, waiting for a decode.
    Scanning,
    /// A code matched a customer; waiting for confirmation.
    CandidateFound {
        /// The matched customer.
        customer_id: CustomerId,
    },
    /// Quantity form is open for the confirmed customer.
    FormOpen {
        /// The confirmed customer.
        customer_id: CustomerId,
    },
}

/// A transition that is not legal from the current state, or a code that
/// failed validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScanError {
    /// The scanner is not open.
    #[error("no scan in progress")]
    NotScanning,
    /// The code is not one of ours.
    #[error("unrecognized code: {0}")]
    UnrecognizedCode(String),
    /// The code belongs to a different business.
    #[error("code belongs to another business")]
    ForeignBusiness,
    /// No candidate to confirm.
    #[error("no matched customer to confirm")]
    NoCandidate,
    /// No open form to submit.
    #[error("no open form")]
    NoOpenForm,
}

impl ScanState {
    /// Open the scanner. Restarting an in-flight flow discards it.
    #[must_use]
    pub const fn start(self) -> Self {
        Self::Scanning
    }

    /// Apply a decoded code.
    ///
    /// The marker and business check happens here, before the caller is
    /// allowed to look anything up.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::NotScanning` if the scanner isn't open,
    /// `ScanError::UnrecognizedCode` for a malformed or foreign-marker
    /// code, `ScanError::ForeignBusiness` for another business's code.
    pub fn decode(self, raw: &str, user: &CurrentUser) -> Result<Self, ScanError> {
        if self != Self::Scanning {
            return Err(ScanError::NotScanning);
        }

        let payload =
            QrPayload::parse(raw).map_err(|e| ScanError::UnrecognizedCode(e.to_string()))?;

        if !payload.matches_business(user.business_id) {
            return Err(ScanError::ForeignBusiness);
        }

        Ok(Self::CandidateFound {
            customer_id: payload.customer_id(),
        })
    }

    /// Pick a customer by hand instead of scanning.
    ///
    /// Legal from any state; this is the fallback for torn or unreadable
    /// codes, so it does not require an open scanner.
    #[must_use]
    pub const fn select(self, customer_id: CustomerId) -> Self {
        Self::CandidateFound { customer_id }
    }

    /// Confirm the candidate and open the quantity form.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::NoCandidate` unless a candidate is pending.
    pub fn confirm(self) -> Result<Self, ScanError> {
        match self {
            Self::CandidateFound { customer_id } => Ok(Self::FormOpen { customer_id }),
            _ => Err(ScanError::NoCandidate),
        }
    }

    /// Submit the form, yielding the confirmed customer and resetting.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::NoOpenForm` unless the form is open.
    pub fn submit(self) -> Result<(CustomerId, Self), ScanError> {
        match self {
            Self::FormOpen { customer_id } => Ok((customer_id, Self::Idle)),
            _ => Err(ScanError::NoOpenForm),
        }
    }

    /// Abandon the flow from any state.
    #[must_use]
    pub const fn cancel(self) -> Self {
        Self::Idle
    }
}

/// Session-backed scan service.
pub struct ScanService<'a> {
    state: &'a AppState,
    session: &'a Session,
}

impl<'a> ScanService<'a> {
    /// Create a new scan service for one request.
    #[must_use]
    pub const fn new(state: &'a AppState, session: &'a Session) -> Self {
        Self { state, session }
    }

    /// Open the scanner.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the session cannot be written.
    pub async fn start(&self) -> Result<ScanState, AppError> {
        let next = self.load().await.start();
        self.store(&next).await?;
        Ok(next)
    }

    /// Apply a decoded code and look up the matched customer.
    ///
    /// A code that fails validation, or matches no known customer, resets
    /// the flow to `Idle` before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for rejected codes and
    /// `AppError::NotFound` for a valid code whose customer is gone.
    pub async fn handle_decode(
        &self,
        user: &CurrentUser,
        raw: &str,
    ) -> Result<Customer, AppError> {
        let current = self.load().await;

        let next = match current.decode(raw, user) {
            Ok(next) => next,
            Err(e) => {
                self.store(&ScanState::Idle).await?;
                return Err(AppError::Validation(e.to_string()));
            }
        };

        let ScanState::CandidateFound { customer_id } = next else {
            self.store(&ScanState::Idle).await?;
            return Err(AppError::Internal("scan decode produced no candidate".to_owned()));
        };

        match CustomerRegistry::new(self.state)
            .get(user.business_id, customer_id)
            .await
        {
            Ok(customer) => {
                self.store(&next).await?;
                Ok(customer)
            }
            Err(e) => {
                self.store(&ScanState::Idle).await?;
                Err(e)
            }
        }
    }

    /// Pick a customer by hand, skipping the scanner.
    ///
    /// The customer must exist in the caller's business; an unknown id
    /// resets the flow.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the customer doesn't exist.
    pub async fn handle_select(
        &self,
        user: &CurrentUser,
        customer_id: CustomerId,
    ) -> Result<Customer, AppError> {
        match CustomerRegistry::new(self.state)
            .get(user.business_id, customer_id)
            .await
        {
            Ok(customer) => {
                self.store(&self.load().await.select(customer_id)).await?;
                Ok(customer)
            }
            Err(e) => {
                self.store(&ScanState::Idle).await?;
                Err(e)
            }
        }
    }

    /// Confirm the candidate and open the quantity form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if no candidate is pending.
    pub async fn confirm(&self) -> Result<CustomerId, AppError> {
        let next = self
            .load()
            .await
            .confirm()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.store(&next).await?;

        match next {
            ScanState::FormOpen { customer_id } => Ok(customer_id),
            _ => Err(AppError::Internal("confirm produced no form".to_owned())),
        }
    }

    /// Take the confirmed customer for recording and reset the flow.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the form isn't open.
    pub async fn take_submission(&self) -> Result<CustomerId, AppError> {
        let (customer_id, next) = self
            .load()
            .await
            .submit()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.store(&next).await?;
        Ok(customer_id)
    }

    /// Abandon the flow.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the session cannot be written.
    pub async fn cancel(&self) -> Result<(), AppError> {
        self.store(&ScanState::Idle).await
    }

    async fn load(&self) -> ScanState {
        self.session
            .get::<ScanState>(session_keys::SCAN_STATE)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    async fn store(&self, state: &ScanState) -> Result<(), AppError> {
        self.session
            .insert(session_keys::SCAN_STATE, state)
            .await
            .map_err(|e| AppError::Internal(format!("session write failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bluedrop_core::{AccountId, BusinessId, Role};
    use rust_decimal::Decimal;

    fn user_for(business_id: BusinessId) -> CurrentUser {
        CurrentUser {
            account_id: AccountId::generate(),
            business_id,
            display_name: "Meena".to_owned(),
            role: Role::Staff,
            business_name: "Sharma Waters".to_owned(),
            default_price: Decimal::from(25),
            contact_phone: "9876543210".to_owned(),
        }
    }

    fn code_for(customer_id: CustomerId, business_id: BusinessId) -> String {
        QrPayload::new(customer_id, business_id).to_string()
    }

    #[test]
    fn test_full_flow() {
        let business = BusinessId::generate();
        let customer = CustomerId::generate();
        let user = user_for(business);

        let state = ScanState::Idle.start();
        let state = state.decode(&code_for(customer, business), &user).unwrap();
        assert_eq!(state, ScanState::CandidateFound { customer_id: customer });

        let state = state.confirm().unwrap();
        let (submitted, state) = state.submit().unwrap();
        assert_eq!(submitted, customer);
        assert_eq!(state, ScanState::Idle);
    }

    #[test]
    fn test_decode_requires_open_scanner() {
        let business = BusinessId::generate();
        let user = user_for(business);
        let code = code_for(CustomerId::generate(), business);

        assert_eq!(
            ScanState::Idle.decode(&code, &user),
            Err(ScanError::NotScanning)
        );
    }

    #[test]
    fn test_decode_rejects_foreign_business() {
        let user = user_for(BusinessId::generate());
        let code = code_for(CustomerId::generate(), BusinessId::generate());

        assert_eq!(
            ScanState::Scanning.decode(&code, &user),
            Err(ScanError::ForeignBusiness)
        );
    }

    #[test]
    fn test_decode_rejects_unrecognized_code() {
        let user = user_for(BusinessId::generate());

        assert!(matches!(
            ScanState::Scanning.decode("https://example.com/menu", &user),
            Err(ScanError::UnrecognizedCode(_))
        ));
    }

    #[test]
    fn test_confirm_and_submit_require_order() {
        assert_eq!(ScanState::Idle.confirm(), Err(ScanError::NoCandidate));
        assert_eq!(ScanState::Scanning.confirm(), Err(ScanError::NoCandidate));
        assert_eq!(ScanState::Scanning.submit(), Err(ScanError::NoOpenForm));
        assert_eq!(
            ScanState::CandidateFound {
                customer_id: CustomerId::generate()
            }
            .submit(),
            Err(ScanError::NoOpenForm)
        );
    }

    #[test]
    fn test_cancel_from_any_state() {
        assert_eq!(ScanState::Scanning.cancel(), ScanState::Idle);
        assert_eq!(
            ScanState::FormOpen {
                customer_id: CustomerId::generate()
            }
            .cancel(),
            ScanState::Idle
        );
    }

    #[test]
    fn test_select_works_without_open_scanner() {
        let customer = CustomerId::generate();

        assert_eq!(
            ScanState::Idle.select(customer),
            ScanState::CandidateFound { customer_id: customer }
        );
        // A hand-picked customer replaces any in-flight candidate
        assert_eq!(
            ScanState::CandidateFound {
                customer_id: CustomerId::generate()
            }
            .select(customer),
            ScanState::CandidateFound { customer_id: customer }
        );
    }

    #[test]
    fn test_restart_discards_candidate() {
        let state = ScanState::CandidateFound {
            customer_id: CustomerId::generate(),
        };
        assert_eq!(state.start(), ScanState::Scanning);
    }
}
