//! Payments ledger repository.

use sqlx::PgPool;

use bluedrop_core::{BusinessId, CustomerId, MonthKey};

use super::RepositoryError;
use crate::models::Payment;

/// Repository for the payments ledger.
pub struct PaymentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentRepository<'a> {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a payment record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, payment: &Payment) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO payment
                (id, business_id, customer_id, month, amount, paid_at, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(payment.id)
        .bind(payment.business_id)
        .bind(payment.customer_id)
        .bind(payment.month)
        .bind(payment.amount)
        .bind(payment.paid_at)
        .bind(payment.recorded_by)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Whether any payment exists for a (customer, month) pair.
    ///
    /// Presence alone decides paid status; the amount is never cross-checked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(
        &self,
        business: BusinessId,
        customer: CustomerId,
        month: MonthKey,
    ) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1 FROM payment
                WHERE business_id = $1 AND customer_id = $2 AND month = $3
            )
            ",
        )
        .bind(business)
        .bind(customer)
        .bind(month)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// List every payment of a business within a month bucket.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_month(
        &self,
        business: BusinessId,
        month: MonthKey,
    ) -> Result<Vec<Payment>, RepositoryError> {
        let payments = sqlx::query_as::<_, Payment>(
            r"
            SELECT id, business_id, customer_id, month, amount, paid_at, recorded_by
            FROM payment
            WHERE business_id = $1 AND month = $2
            ORDER BY paid_at
            ",
        )
        .bind(business)
        .bind(month)
        .fetch_all(self.pool)
        .await?;

        Ok(payments)
    }
}
