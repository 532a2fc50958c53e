//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! keeping SeaORM specifics out of the service layer.

mod account_repository;
pub(crate) mod entities;
mod product_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use product_repository::{ProductRepository, ProductStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
