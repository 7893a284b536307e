//! Customer registry.
//!
//! Owns the customer list, its per-business cache, and the lifecycle
//! operations (create, edit, delete, search). The cache is only touched
//! after the backing write has succeeded, so readers never observe a
//! mutation that the database rejected.

use std::sync::Arc;

use chrono::Utc;

use bluedrop_core::{BusinessId, CustomerId, Phone};

use crate::db::customers::CustomerRepository;
use crate::db::deliveries::DeliveryRepository;
use crate::error::AppError;
use crate::models::{Customer, CustomerUpdate, NewCustomer};
use crate::services::qr;
use crate::state::AppState;

/// Customer registry service.
pub struct CustomerRegistry<'a> {
    state: &'a AppState,
}

impl<'a> CustomerRegistry<'a> {
    /// Create a new registry over the shared state.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// List all customers of a business, cached.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the underlying load fails.
    pub async fn list(&self, business: BusinessId) -> Result<Arc<Vec<Customer>>, AppError> {
        let pool = self.state.pool().clone();
        self.state
            .customer_cache()
            .try_get_with(business, async move {
                CustomerRepository::new(&pool).list(business).await.map(Arc::new)
            })
            .await
            .map_err(|e| AppError::Internal(format!("customer list load failed: {e}")))
    }

    /// Case-insensitive search over name, phone, and address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the underlying load fails.
    pub async fn search(
        &self,
        business: BusinessId,
        term: &str,
    ) -> Result<Vec<Customer>, AppError> {
        let customers = self.list(business).await?;
        let term = term.trim();
        if term.is_empty() {
            return Ok(customers.as_ref().clone());
        }

        Ok(customers
            .iter()
            .filter(|c| c.matches_search(term))
            .cloned()
            .collect())
    }

    /// Get a single customer, scoped to the business.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no such customer exists in this
    /// business.
    pub async fn get(
        &self,
        business: BusinessId,
        id: CustomerId,
    ) -> Result<Customer, AppError> {
        CustomerRepository::new(self.state.pool())
            .get(business, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer {id}")))
    }

    /// Create a customer and kick off background QR provisioning.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a required field is empty or the
    /// phone is unusable.
    pub async fn create(
        &self,
        business: BusinessId,
        new: NewCustomer,
    ) -> Result<Customer, AppError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("customer name is required".to_owned()));
        }
        let address = new.address.trim();
        if address.is_empty() {
            return Err(AppError::Validation(
                "customer address is required".to_owned(),
            ));
        }
        let phone =
            Phone::parse(&new.phone).map_err(|e| AppError::Validation(e.to_string()))?;

        let customer = Customer {
            id: CustomerId::generate(),
            business_id: business,
            name: name.to_owned(),
            phone,
            address: address.to_owned(),
            category: new.category,
            price_per_unit: new.price_per_unit,
            total_units: 0,
            total_deliveries: 0,
            qr_payload: None,
            qr_image_url: None,
            created_at: Utc::now(),
        };

        CustomerRepository::new(self.state.pool())
            .insert(&customer)
            .await?;
        self.state.customer_cache().invalidate(&business).await;

        // QR provisioning talks to external services; the customer must not
        // wait on it, and its failure must not fail the create.
        let state = self.state.clone();
        let for_qr = customer.clone();
        tokio::spawn(async move {
            qr::provision(&state, &for_qr).await;
        });

        Ok(customer)
    }

    /// Apply an owner edit to a customer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the customer doesn't exist.
    /// Returns `AppError::Validation` if an updated phone is unusable.
    pub async fn update(
        &self,
        business: BusinessId,
        id: CustomerId,
        mut fields: CustomerUpdate,
    ) -> Result<Customer, AppError> {
        if let Some(ref phone) = fields.phone {
            let parsed =
                Phone::parse(phone).map_err(|e| AppError::Validation(e.to_string()))?;
            fields.phone = Some(parsed.into_inner());
        }

        let customer = CustomerRepository::new(self.state.pool())
            .update(business, id, &fields)
            .await?;
        self.state.customer_cache().invalidate(&business).await;

        Ok(customer)
    }

    /// Delete a customer and every delivery that references them.
    ///
    /// The delivery cascade runs after the customer row is gone; its row
    /// count is logged so a failed cascade is visible in the log rather
    /// than silent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the customer doesn't exist.
    pub async fn delete(&self, business: BusinessId, id: CustomerId) -> Result<(), AppError> {
        let deleted = CustomerRepository::new(self.state.pool())
            .delete(business, id)
            .await?;
        if !deleted {
            return Err(AppError::NotFound(format!("customer {id}")));
        }

        let removed = DeliveryRepository::new(self.state.pool())
            .delete_for_customer(business, id)
            .await?;
        tracing::info!(customer_id = %id, deliveries_removed = removed, "customer deleted");

        self.state.customer_cache().invalidate(&business).await;

        Ok(())
    }
}
