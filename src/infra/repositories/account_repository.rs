//! Account repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::{Account, AccountFilter, NewAccount};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Credential store contract.
///
/// Email uniqueness is enforced by the database; `create` surfaces a
/// violation as `Conflict`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account
    async fn create(&self, account: NewAccount) -> AppResult<Account>;

    /// Find the first account matching the filter
    async fn find_one(&self, filter: AccountFilter) -> AppResult<Option<Account>>;
}

/// Concrete implementation of AccountRepository over SeaORM
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            first_name: Set(account.first_name),
            last_name: Set(account.last_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match e.sql_err() {
                // The unique index on email is the authority on duplicates
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Account"),
                _ => AppError::from(e),
            }
        })?;

        Ok(Account::from(model))
    }

    async fn find_one(&self, filter: AccountFilter) -> AppResult<Option<Account>> {
        let mut select = AccountEntity::find();

        if let Some(id) = filter.id {
            select = select.filter(account::Column::Id.eq(id));
        }
        if let Some(email) = filter.email {
            select = select.filter(account::Column::Email.eq(email));
        }

        let result = select.one(&self.db).await.map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }
}
