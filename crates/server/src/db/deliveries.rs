//! Delivery repository.

use sqlx::PgPool;

use bluedrop_core::{BusinessId, CustomerId, DeliveryId, MonthKey};

use super::RepositoryError;
use crate::models::Delivery;

/// Repository for delivery database operations.
pub struct DeliveryRepository<'a> {
    pool: &'a PgPool,
}

const SELECT_COLUMNS: &str = "id, business_id, customer_id, quantity, month, \
     delivered_at, recorded_by, recorded_by_role";

impl<'a> DeliveryRepository<'a> {
    /// Create a new delivery repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a delivery row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, delivery: &Delivery) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO delivery
                (id, business_id, customer_id, quantity, month, delivered_at,
                 recorded_by, recorded_by_role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(delivery.id)
        .bind(delivery.business_id)
        .bind(delivery.customer_id)
        .bind(delivery.quantity)
        .bind(delivery.month)
        .bind(delivery.delivered_at)
        .bind(delivery.recorded_by)
        .bind(delivery.recorded_by_role)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a delivery by ID, scoped to a business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        business: BusinessId,
        id: DeliveryId,
    ) -> Result<Option<Delivery>, RepositoryError> {
        let delivery = sqlx::query_as::<_, Delivery>(&format!(
            "SELECT {SELECT_COLUMNS} FROM delivery WHERE business_id = $1 AND id = $2"
        ))
        .bind(business)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(delivery)
    }

    /// List a customer's deliveries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        business: BusinessId,
        customer: CustomerId,
    ) -> Result<Vec<Delivery>, RepositoryError> {
        let deliveries = sqlx::query_as::<_, Delivery>(&format!(
            r"
            SELECT {SELECT_COLUMNS} FROM delivery
            WHERE business_id = $1 AND customer_id = $2
            ORDER BY delivered_at DESC
            "
        ))
        .bind(business)
        .bind(customer)
        .fetch_all(self.pool)
        .await?;

        Ok(deliveries)
    }

    /// List a customer's deliveries within a month bucket.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer_month(
        &self,
        business: BusinessId,
        customer: CustomerId,
        month: MonthKey,
    ) -> Result<Vec<Delivery>, RepositoryError> {
        let deliveries = sqlx::query_as::<_, Delivery>(&format!(
            r"
            SELECT {SELECT_COLUMNS} FROM delivery
            WHERE business_id = $1 AND customer_id = $2 AND month = $3
            ORDER BY delivered_at
            "
        ))
        .bind(business)
        .bind(customer)
        .bind(month)
        .fetch_all(self.pool)
        .await?;

        Ok(deliveries)
    }

    /// List every delivery of a business within a month bucket.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_month(
        &self,
        business: BusinessId,
        month: MonthKey,
    ) -> Result<Vec<Delivery>, RepositoryError> {
        let deliveries = sqlx::query_as::<_, Delivery>(&format!(
            r"
            SELECT {SELECT_COLUMNS} FROM delivery
            WHERE business_id = $1 AND month = $2
            ORDER BY delivered_at
            "
        ))
        .bind(business)
        .bind(month)
        .fetch_all(self.pool)
        .await?;

        Ok(deliveries)
    }

    /// Write a new quantity to a delivery (owner-only edit).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the delivery doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_quantity(
        &self,
        business: BusinessId,
        id: DeliveryId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE delivery SET quantity = $3 WHERE business_id = $1 AND id = $2")
                .bind(business)
                .bind(id)
                .bind(quantity)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a delivery row. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(
        &self,
        business: BusinessId,
        id: DeliveryId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM delivery WHERE business_id = $1 AND id = $2")
            .bind(business)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Cascade-delete every delivery referencing a customer.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_for_customer(
        &self,
        business: BusinessId,
        customer: CustomerId,
    ) -> Result<u64, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM delivery WHERE business_id = $1 AND customer_id = $2")
                .bind(business)
                .bind(customer)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
