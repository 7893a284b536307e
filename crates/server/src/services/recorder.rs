//! Delivery recorder.
//!
//! Records, edits, and deletes delivery events, keeping the customer's
//! running totals in step. A record is two sequential writes: the delivery
//! row first, then one atomic increment of the totals. The pair is
//! deliberately not a transaction; if the increment fails the delivery row
//! stands, the error is surfaced, and `bd-cli reconcile` repairs the drift
//! offline.

use chrono::{DateTime, Utc};

use bluedrop_core::{CustomerId, DeliveryId, MonthKey};

use crate::db::customers::CustomerRepository;
use crate::db::deliveries::DeliveryRepository;
use crate::error::AppError;
use crate::middleware::OwnerSession;
use crate::models::{CurrentUser, Delivery};
use crate::services::notifier::Notifier;
use crate::state::AppState;

/// Delivery recorder service.
pub struct DeliveryRecorder<'a> {
    state: &'a AppState,
}

impl<'a> DeliveryRecorder<'a> {
    /// Create a new recorder over the shared state.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Record a delivery for a customer.
    ///
    /// A missing quantity means one can. `delivered_at` defaults to now;
    /// the month bucket is always derived from it, never trusted from the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the quantity is not positive.
    /// Returns `AppError::NotFound` if the customer doesn't exist in this
    /// business.
    pub async fn record(
        &self,
        user: &CurrentUser,
        customer_id: CustomerId,
        quantity: Option<i32>,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Result<Delivery, AppError> {
        let quantity = quantity.unwrap_or(1);
        if quantity <= 0 {
            return Err(AppError::Validation(
                "quantity must be a positive number of cans".to_owned(),
            ));
        }

        let customers = CustomerRepository::new(self.state.pool());
        let customer = customers
            .get(user.business_id, customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer {customer_id}")))?;

        let delivered_at = delivered_at.unwrap_or_else(Utc::now);
        let delivery = Delivery {
            id: DeliveryId::generate(),
            business_id: user.business_id,
            customer_id,
            quantity,
            month: MonthKey::from_datetime(delivered_at),
            delivered_at,
            recorded_by: user.account_id,
            recorded_by_role: user.role,
        };

        DeliveryRepository::new(self.state.pool())
            .insert(&delivery)
            .await?;
        customers
            .apply_delivery_recorded(customer_id, quantity)
            .await?;

        self.state
            .customer_cache()
            .invalidate(&user.business_id)
            .await;

        Notifier::new(self.state)
            .delivery_recorded(
                user.business_id,
                user.account_id,
                &user.display_name,
                &customer.name,
                quantity,
            )
            .await;

        Ok(delivery)
    }

    /// Owner-only quantity edit.
    ///
    /// The customer's running total moves by the delta between old and new
    /// quantity; an unchanged quantity is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the quantity is not positive.
    /// Returns `AppError::NotFound` if the delivery doesn't exist.
    pub async fn edit_quantity(
        &self,
        owner: &OwnerSession,
        delivery_id: DeliveryId,
        quantity: i32,
    ) -> Result<Delivery, AppError> {
        if quantity <= 0 {
            return Err(AppError::Validation(
                "quantity must be a positive number of cans".to_owned(),
            ));
        }

        let business = owner.user().business_id;
        let deliveries = DeliveryRepository::new(self.state.pool());
        let mut delivery = deliveries
            .get(business, delivery_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("delivery {delivery_id}")))?;

        let delta = quantity - delivery.quantity;
        if delta == 0 {
            return Ok(delivery);
        }

        deliveries
            .update_quantity(business, delivery_id, quantity)
            .await?;
        CustomerRepository::new(self.state.pool())
            .apply_delivery_edited(delivery.customer_id, delta)
            .await?;

        self.state.customer_cache().invalidate(&business).await;

        delivery.quantity = quantity;
        Ok(delivery)
    }

    /// Owner-only delete of a delivery, reverting its quantity from the
    /// customer's running totals.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the delivery doesn't exist.
    pub async fn delete(
        &self,
        owner: &OwnerSession,
        delivery_id: DeliveryId,
    ) -> Result<(), AppError> {
        let business = owner.user().business_id;
        let deliveries = DeliveryRepository::new(self.state.pool());
        let delivery = deliveries
            .get(business, delivery_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("delivery {delivery_id}")))?;

        if !deliveries.delete(business, delivery_id).await? {
            return Err(AppError::NotFound(format!("delivery {delivery_id}")));
        }
        CustomerRepository::new(self.state.pool())
            .apply_delivery_deleted(delivery.customer_id, delivery.quantity)
            .await?;

        self.state.customer_cache().invalidate(&business).await;

        Ok(())
    }
}
