//! Account service - account creation and lookup on top of the credential store.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Account, AccountFilter, NewAccount};
use crate::errors::AppResult;
use crate::infra::AccountRepository;

/// Account service trait for dependency injection.
///
/// Store errors surface as-is, including `Conflict` on a duplicate email.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Persist a new account and return the created record
    async fn create(&self, account: NewAccount) -> AppResult<Account>;

    /// Return the first account matching the filter, or None
    async fn find_one_where(&self, filter: AccountFilter) -> AppResult<Option<Account>>;
}

/// Concrete implementation of AccountService
pub struct AccountManager {
    repo: Arc<dyn AccountRepository>,
}

impl AccountManager {
    /// Create new account service instance with an injected store
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        self.repo.create(account).await
    }

    async fn find_one_where(&self, filter: AccountFilter) -> AppResult<Option<Account>> {
        self.repo.find_one(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::MockAccountRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn stored_account(id: i32, email: &str) -> Account {
        Account {
            id,
            email: email.to_string(),
            password_hash: "hashed".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_returns_created_record() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create()
            .returning(|account| Ok(stored_account(1, &account.email)));

        let service = AccountManager::new(Arc::new(repo));
        let account = service
            .create(NewAccount {
                email: "test@email.com".to_string(),
                password_hash: "hashed".to_string(),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(account.id, 1);
        assert_eq!(account.email, "test@email.com");
    }

    #[tokio::test]
    async fn test_create_surfaces_store_conflict() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create()
            .returning(|_| Err(AppError::conflict("Account")));

        let service = AccountManager::new(Arc::new(repo));
        let result = service
            .create(NewAccount {
                email: "taken@email.com".to_string(),
                password_hash: "hashed".to_string(),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_one_where_by_email() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_one()
            .with(eq(AccountFilter::by_email("test@email.com")))
            .returning(|_| Ok(Some(stored_account(1, "test@email.com"))));

        let service = AccountManager::new(Arc::new(repo));
        let found = service
            .find_one_where(AccountFilter::by_email("test@email.com"))
            .await
            .unwrap();

        assert_eq!(found.unwrap().email, "test@email.com");
    }

    #[tokio::test]
    async fn test_find_one_where_no_match() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_one().returning(|_| Ok(None));

        let service = AccountManager::new(Arc::new(repo));
        let found = service
            .find_one_where(AccountFilter::by_id(42))
            .await
            .unwrap();

        assert!(found.is_none());
    }
}
