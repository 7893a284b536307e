//! Notification log repository.

use sqlx::PgPool;

use bluedrop_core::{BusinessId, NotificationId};

use super::RepositoryError;
use crate::models::Notification;

/// Repository for the business-scoped notification log.
pub struct NotificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a notification record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, notification: &Notification) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO notification
                (id, business_id, title, message, kind, read, created_at, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(notification.id)
        .bind(notification.business_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.kind)
        .bind(notification.read)
        .bind(notification.created_at)
        .bind(notification.created_by)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List the newest notifications, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        business: BusinessId,
        limit: i64,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r"
            SELECT id, business_id, title, message, kind, read, created_at, created_by
            FROM notification
            WHERE business_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(business)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(notifications)
    }

    /// Mark a notification read. Returns `true` if a row changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn mark_read(
        &self,
        business: BusinessId,
        id: NotificationId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE notification SET read = TRUE WHERE business_id = $1 AND id = $2")
                .bind(business)
                .bind(id)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete one notification. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(
        &self,
        business: BusinessId,
        id: NotificationId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM notification WHERE business_id = $1 AND id = $2")
            .bind(business)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every notification of a business. Returns the rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear_all(&self, business: BusinessId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM notification WHERE business_id = $1")
            .bind(business)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count unread notifications (the badge number).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unread_count(&self, business: BusinessId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notification WHERE business_id = $1 AND read = FALSE",
        )
        .bind(business)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
