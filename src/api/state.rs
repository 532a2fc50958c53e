//! Application state - shared service handles.
//!
//! Wiring is explicit: repositories and the token signer are constructed
//! here and passed to services through their constructors. Tests build the
//! same state from fakes via [`AppState::new`].

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{AccountStore, Database, ProductStore};
use crate::services::{
    AccountManager, AccountService, AuthService, Authenticator, JwtSigner, ProductManager,
    ProductService, TokenSigner,
};

/// Application state containing all services
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Product service
    pub product_service: Arc<dyn ProductService>,
}

impl AppState {
    /// Create application state from a database connection and config.
    pub fn from_config(database: &Database, config: &Config) -> Self {
        let account_repo = Arc::new(AccountStore::new(database.get_connection()));
        let product_repo = Arc::new(ProductStore::new(database.get_connection()));

        let account_service: Arc<dyn AccountService> = Arc::new(AccountManager::new(account_repo));
        let signer: Arc<dyn TokenSigner> = Arc::new(JwtSigner::from_config(config));

        let auth_service = Arc::new(Authenticator::new(account_service, signer));
        let product_service = Arc::new(ProductManager::new(product_repo));

        Self {
            auth_service,
            product_service,
        }
    }

    /// Create application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        product_service: Arc<dyn ProductService>,
    ) -> Self {
        Self {
            auth_service,
            product_service,
        }
    }
}
