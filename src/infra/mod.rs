//! Infrastructure layer - External systems integration
//!
//! Database connection management, SeaORM entities, and repositories.

pub mod db;
pub mod repositories;

pub use db::Database;
pub use repositories::{AccountRepository, AccountStore, ProductRepository, ProductStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockAccountRepository, MockProductRepository};
