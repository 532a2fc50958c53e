//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. Collaborators are passed explicitly through
//! constructors and depended on as traits.

mod account_service;
mod auth_service;
mod product_service;

pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthService, Authenticator, JwtPayload, JwtSigner, TokenResponse, TokenSigner};
pub use product_service::{ProductManager, ProductService};
