//! Customer repository.
//!
//! Besides CRUD, this repository owns the intention-revealing total
//! mutations: every path that changes a customer's running totals goes
//! through `apply_delivery_recorded` / `apply_delivery_edited` /
//! `apply_delivery_deleted`, each a single server-side atomic UPDATE so
//! concurrent recorders on separate devices cannot clobber each other.

use sqlx::PgPool;

use bluedrop_core::{BusinessId, CustomerId};

use super::RepositoryError;
use crate::models::{Customer, CustomerUpdate};

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

const SELECT_COLUMNS: &str = "id, business_id, name, phone, address, category, \
     price_per_unit, total_units, total_deliveries, qr_payload, qr_image_url, created_at";

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all customers of a business, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, business: BusinessId) -> Result<Vec<Customer>, RepositoryError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {SELECT_COLUMNS} FROM customer WHERE business_id = $1 ORDER BY name"
        ))
        .bind(business)
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Get a customer by ID, scoped to a business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        business: BusinessId,
        id: CustomerId,
    ) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {SELECT_COLUMNS} FROM customer WHERE business_id = $1 AND id = $2"
        ))
        .bind(business)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Insert a new customer row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, customer: &Customer) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO customer
                (id, business_id, name, phone, address, category, price_per_unit,
                 total_units, total_deliveries, qr_payload, qr_image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(customer.id)
        .bind(customer.business_id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.category)
        .bind(customer.price_per_unit)
        .bind(customer.total_units)
        .bind(customer.total_deliveries)
        .bind(customer.qr_payload.as_deref())
        .bind(customer.qr_image_url.as_deref())
        .bind(customer.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Merge an owner edit into a customer row. Absent fields are unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        business: BusinessId,
        id: CustomerId,
        fields: &CustomerUpdate,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r"
            UPDATE customer
            SET name = COALESCE($3, name),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                category = COALESCE($6, category),
                price_per_unit = COALESCE($7, price_per_unit)
            WHERE business_id = $1 AND id = $2
            RETURNING {SELECT_COLUMNS}
            "
        ))
        .bind(business)
        .bind(id)
        .bind(fields.name.as_deref())
        .bind(fields.phone.as_deref())
        .bind(fields.address.as_deref())
        .bind(fields.category)
        .bind(fields.price_per_unit)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(customer)
    }

    /// Delete a customer row.
    ///
    /// Returns `true` if a row was deleted. Cascading deletion of the
    /// customer's deliveries is the registry's responsibility, not a
    /// database-level cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(
        &self,
        business: BusinessId,
        id: CustomerId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE business_id = $1 AND id = $2")
            .bind(business)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store a provisioned QR payload and hosted image URL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_qr(
        &self,
        id: CustomerId,
        payload: &str,
        image_url: &str,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE customer SET qr_payload = $2, qr_image_url = $3 WHERE id = $1")
                .bind(id)
                .bind(payload)
                .bind(image_url)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Atomically add a recorded delivery to the running totals.
    ///
    /// This must stay a single server-side increment, never a
    /// read-modify-write: two staff phones recording concurrently must both
    /// land.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn apply_delivery_recorded(
        &self,
        id: CustomerId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer
            SET total_units = total_units + $2,
                total_deliveries = total_deliveries + 1
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Atomically apply a quantity-edit delta to `total_units`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn apply_delivery_edited(
        &self,
        id: CustomerId,
        delta: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE customer SET total_units = total_units + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Atomically revert a deleted delivery from the running totals.
    ///
    /// Clamped at zero so earlier drift never surfaces negative totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn apply_delivery_deleted(
        &self,
        id: CustomerId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer
            SET total_units = GREATEST(total_units - $2, 0),
                total_deliveries = GREATEST(total_deliveries - 1, 0)
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Rewrite every customer's running totals from the true delivery sums.
    ///
    /// This is the out-of-band reconciliation for drift left behind by
    /// partial multi-write failures. Returns the number of rows corrected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn reconcile_totals(&self) -> Result<u64, RepositoryError> {
        let zeroed = sqlx::query(
            r"
            UPDATE customer c
            SET total_units = 0, total_deliveries = 0
            WHERE NOT EXISTS (SELECT 1 FROM delivery d WHERE d.customer_id = c.id)
              AND (c.total_units <> 0 OR c.total_deliveries <> 0)
            ",
        )
        .execute(self.pool)
        .await?;

        let summed = sqlx::query(
            r"
            UPDATE customer c
            SET total_units = sub.units, total_deliveries = sub.deliveries
            FROM (
                SELECT customer_id,
                       COALESCE(SUM(quantity), 0)::INT AS units,
                       COUNT(*)::INT AS deliveries
                FROM delivery
                GROUP BY customer_id
            ) sub
            WHERE c.id = sub.customer_id
              AND (c.total_units <> sub.units OR c.total_deliveries <> sub.deliveries)
            ",
        )
        .execute(self.pool)
        .await?;

        Ok(zeroed.rows_affected() + summed.rows_affected())
    }
}
