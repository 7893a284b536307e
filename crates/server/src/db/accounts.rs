//! Account, business settings, and staff invite repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use bluedrop_core::{AccountId, BusinessId, InviteId, Role};

use super::RepositoryError;
use crate::models::{Account, BusinessProfile, StaffInvite};

/// Repository for principal and business-settings operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by its login email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            r"
            SELECT id, email, password_hash, display_name, role, owner_link,
                   created_at, updated_at
            FROM account
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Create an owner account together with its business settings row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_owner(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        business_name: &str,
        default_price: Decimal,
        contact_phone: &str,
    ) -> Result<Account, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let id = AccountId::generate();

        let account = sqlx::query_as::<_, Account>(
            r"
            INSERT INTO account (id, email, password_hash, display_name, role, owner_link)
            VALUES ($1, $2, $3, $4, $5, NULL)
            RETURNING id, email, password_hash, display_name, role, owner_link,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .bind(Role::Owner)
        .fetch_one(&mut *tx)
        .await
        .map_err(unique_conflict("email already exists"))?;

        sqlx::query(
            r"
            INSERT INTO business (id, business_name, default_price, contact_phone)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(id.as_business())
        .bind(business_name)
        .bind(default_price)
        .bind(contact_phone)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(account)
    }

    /// Create a staff account linked to an owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_staff(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        owner: AccountId,
    ) -> Result<Account, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            r"
            INSERT INTO account (id, email, password_hash, display_name, role, owner_link)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, password_hash, display_name, role, owner_link,
                      created_at, updated_at
            ",
        )
        .bind(AccountId::generate())
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .bind(Role::Staff)
        .bind(owner)
        .fetch_one(self.pool)
        .await
        .map_err(unique_conflict("email already exists"))?;

        Ok(account)
    }

    /// Get a business settings row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_business(
        &self,
        id: BusinessId,
    ) -> Result<Option<BusinessProfile>, RepositoryError> {
        let profile = sqlx::query_as::<_, BusinessProfile>(
            r"
            SELECT id, business_name, default_price, contact_phone, updated_at
            FROM business
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Save business settings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the business row doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_business(
        &self,
        id: BusinessId,
        business_name: &str,
        default_price: Decimal,
        contact_phone: &str,
    ) -> Result<BusinessProfile, RepositoryError> {
        let profile = sqlx::query_as::<_, BusinessProfile>(
            r"
            UPDATE business
            SET business_name = $2, default_price = $3, contact_phone = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, business_name, default_price, contact_phone, updated_at
            ",
        )
        .bind(id)
        .bind(business_name)
        .bind(default_price)
        .bind(contact_phone)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(profile)
    }

    /// List staff accounts linked to a business.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_staff(&self, business: BusinessId) -> Result<Vec<Account>, RepositoryError> {
        let staff = sqlx::query_as::<_, Account>(
            r"
            SELECT id, email, password_hash, display_name, role, owner_link,
                   created_at, updated_at
            FROM account
            WHERE owner_link = $1
            ORDER BY display_name
            ",
        )
        .bind(AccountId::new(business.as_uuid()))
        .fetch_all(self.pool)
        .await?;

        Ok(staff)
    }

    /// Remove a staff account from a business.
    ///
    /// Returns `true` if a linked staff account was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_staff(
        &self,
        business: BusinessId,
        staff: AccountId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM account
            WHERE id = $1 AND owner_link = $2 AND role = 'staff'
            ",
        )
        .bind(staff)
        .bind(AccountId::new(business.as_uuid()))
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Issue a staff invite code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_invite(
        &self,
        business: BusinessId,
        email: &str,
        code: &str,
    ) -> Result<StaffInvite, RepositoryError> {
        let invite = sqlx::query_as::<_, StaffInvite>(
            r"
            INSERT INTO staff_invite (id, business_id, code, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, business_id, code, email, used, created_at
            ",
        )
        .bind(InviteId::generate())
        .bind(business)
        .bind(code)
        .bind(email)
        .fetch_one(self.pool)
        .await
        .map_err(unique_conflict("invite code already exists"))?;

        Ok(invite)
    }

    /// Look up an unused invite by its code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_invite_by_code(
        &self,
        code: &str,
    ) -> Result<Option<StaffInvite>, RepositoryError> {
        let invite = sqlx::query_as::<_, StaffInvite>(
            r"
            SELECT id, business_id, code, email, used, created_at
            FROM staff_invite
            WHERE code = $1 AND used = FALSE
            ",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(invite)
    }

    /// Consume an invite so it cannot be reused.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the invite doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_invite_used(&self, id: InviteId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE staff_invite SET used = TRUE WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Map a unique violation onto `RepositoryError::Conflict`.
fn unique_conflict(message: &'static str) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(message.to_owned());
        }
        RepositoryError::Database(e)
    }
}
