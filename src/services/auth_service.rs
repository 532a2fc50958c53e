//! Authentication service - registration, login, credential verification,
//! and JWT issuance.
//!
//! Both collaborators (account service and token signer) are injected
//! through the constructor; tests substitute fakes implementing the same
//! traits.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{
    Account, AccountFilter, AccountResponse, Credentials, NewAccount, Password, SignUp,
};
use crate::errors::{AppError, AppResult};
use crate::services::AccountService;

/// JWT payload carried by access tokens.
///
/// Created at login and consumed on every authenticated request;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtPayload {
    pub email: String,
    pub account_id: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Token signing and decoding contract
pub trait TokenSigner: Send + Sync {
    /// Sign a payload into a compact token
    fn sign(&self, payload: &JwtPayload) -> AppResult<String>;

    /// Decode a token, verifying its signature and expiry
    fn verify(&self, token: &str) -> AppResult<JwtPayload>;

    /// Decode a token WITHOUT verifying the signature.
    ///
    /// Test/debug introspection only. Authenticated paths must use
    /// [`TokenSigner::verify`].
    fn decode_unverified(&self, token: &str) -> AppResult<JwtPayload>;

    /// Token lifetime in seconds, used to derive `exp`
    fn expiration_seconds(&self) -> i64;
}

/// HMAC (HS256) token signer backed by a shared secret
pub struct JwtSigner {
    secret: Vec<u8>,
    expiration_seconds: i64,
}

impl JwtSigner {
    /// Create a signer from a raw secret and an expiration in hours
    pub fn new(secret: &[u8], expiration_hours: i64) -> Self {
        Self {
            secret: secret.to_vec(),
            expiration_seconds: expiration_hours * SECONDS_PER_HOUR,
        }
    }

    /// Create a signer from application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret_bytes(), config.jwt_expiration_hours)
    }
}

impl TokenSigner for JwtSigner {
    fn sign(&self, payload: &JwtPayload) -> AppResult<String> {
        let token = encode(
            &Header::default(),
            payload,
            &EncodingKey::from_secret(&self.secret),
        )?;
        Ok(token)
    }

    fn verify(&self, token: &str) -> AppResult<JwtPayload> {
        let token_data = decode::<JwtPayload>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    fn decode_unverified(&self, token: &str) -> AppResult<JwtPayload> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        let token_data = decode::<JwtPayload>(token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(token_data.claims)
    }

    fn expiration_seconds(&self) -> i64 {
        self.expiration_seconds
    }
}

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account; the result carries no password material
    async fn register(&self, signup: SignUp) -> AppResult<AccountResponse>;

    /// Validate credentials and return a signed access token
    async fn login(&self, credentials: Credentials) -> AppResult<TokenResponse>;

    /// Decode and verify a token's signature and expiry
    fn verify_token(&self, token: &str) -> AppResult<JwtPayload>;

    /// Re-fetch the account referenced by a decoded payload.
    ///
    /// Returns None when the account no longer exists, e.g. it was deleted
    /// after the token was issued.
    async fn verify_payload(&self, payload: &JwtPayload) -> AppResult<Option<AccountResponse>>;

    /// Decode a token into its payload without signature verification.
    ///
    /// Test/debug introspection only; never part of an authenticated path.
    fn parse_jwt(&self, token: &str) -> AppResult<JwtPayload>;
}

/// Concrete implementation of AuthService
pub struct Authenticator {
    accounts: Arc<dyn AccountService>,
    signer: Arc<dyn TokenSigner>,
}

impl Authenticator {
    /// Create new auth service instance with injected collaborators
    pub fn new(accounts: Arc<dyn AccountService>, signer: Arc<dyn TokenSigner>) -> Self {
        Self { accounts, signer }
    }

    /// Look up the account for the given credentials and verify the
    /// password. The result carries no password material.
    ///
    /// Every failure maps to the same `InvalidCredentials` error; callers
    /// cannot tell an unknown email from a wrong password.
    pub async fn validate_account(&self, credentials: &Credentials) -> AppResult<AccountResponse> {
        let account = self.validate_account_email(&credentials.email).await?;
        Self::validate_account_password(&credentials.password, &account.password_hash)?;
        Ok(AccountResponse::from(account))
    }

    /// Fetch the account for an email, or fail with `InvalidCredentials`.
    ///
    /// Returns the full record including the password hash; internal use only.
    pub async fn validate_account_email(&self, email: &str) -> AppResult<Account> {
        self.accounts
            .find_one_where(AccountFilter::by_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)
    }

    /// Verify a candidate password against the stored hash.
    ///
    /// The comparison happens inside the argon2 verifier, which is
    /// constant-time over the digest.
    pub fn validate_account_password(candidate: &str, stored_hash: &str) -> AppResult<()> {
        if Password::from_hash(stored_hash.to_string()).verify(candidate) {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, signup: SignUp) -> AppResult<AccountResponse> {
        let password_hash = Password::new(&signup.password)?.into_string();

        // A duplicate email surfaces from the store as Conflict
        let account = self
            .accounts
            .create(NewAccount {
                email: signup.email,
                password_hash,
                first_name: signup.first_name,
                last_name: signup.last_name,
            })
            .await?;

        Ok(AccountResponse::from(account))
    }

    async fn login(&self, credentials: Credentials) -> AppResult<TokenResponse> {
        let account = self.validate_account(&credentials).await?;

        let now = Utc::now().timestamp();
        let payload = JwtPayload {
            email: account.email.clone(),
            account_id: account.id,
            iat: now,
            exp: now + self.signer.expiration_seconds(),
        };

        let access_token = self.signer.sign(&payload)?;

        Ok(TokenResponse {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.signer.expiration_seconds(),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<JwtPayload> {
        self.signer.verify(token)
    }

    async fn verify_payload(&self, payload: &JwtPayload) -> AppResult<Option<AccountResponse>> {
        let account = self
            .accounts
            .find_one_where(AccountFilter::by_email(&payload.email))
            .await?;

        Ok(account.map(AccountResponse::from))
    }

    fn parse_jwt(&self, token: &str) -> AppResult<JwtPayload> {
        self.signer.decode_unverified(token)
    }
}
