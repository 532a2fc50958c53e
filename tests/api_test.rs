//! Router-level API tests.
//!
//! The router is built over stub services implementing the same service
//! traits, so requests exercise routing, extraction, validation, the auth
//! middleware, and error mapping without any infrastructure.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use tower::ServiceExt;

use storefront_api::api::{create_router, AppState};
use storefront_api::domain::{
    AccountResponse, Credentials, NewProduct, Product, ProductUpdate, SignUp,
};
use storefront_api::errors::{AppError, AppResult};
use storefront_api::services::{AuthService, JwtPayload, ProductService, TokenResponse};
use storefront_api::types::{Paginated, QueryParams};

const VALID_TOKEN: &str = "valid-test-token";
const DELETED_ACCOUNT_TOKEN: &str = "deleted-account-token";

fn payload_for(email: &str, account_id: i32) -> JwtPayload {
    let now = Utc::now().timestamp();
    JwtPayload {
        email: email.to_string(),
        account_id,
        iat: now,
        exp: now + 3600,
    }
}

fn account_response(email: &str, account_id: i32) -> AccountResponse {
    AccountResponse {
        id: account_id,
        email: email.to_string(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        created_at: Utc::now(),
    }
}

/// Stub auth service with fixed token behavior
struct StubAuthService;

#[async_trait]
impl AuthService for StubAuthService {
    async fn register(&self, signup: SignUp) -> AppResult<AccountResponse> {
        if signup.email == "taken@email.com" {
            return Err(AppError::conflict("Account"));
        }
        Ok(AccountResponse {
            id: 1,
            email: signup.email,
            first_name: signup.first_name,
            last_name: signup.last_name,
            created_at: Utc::now(),
        })
    }

    async fn login(&self, credentials: Credentials) -> AppResult<TokenResponse> {
        if credentials.password != "12345678" {
            return Err(AppError::InvalidCredentials);
        }
        Ok(TokenResponse {
            access_token: VALID_TOKEN.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 86400,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<JwtPayload> {
        match token {
            VALID_TOKEN => Ok(payload_for("test@email.com", 1)),
            DELETED_ACCOUNT_TOKEN => Ok(payload_for("ghost@email.com", 2)),
            _ => Err(AppError::Unauthorized),
        }
    }

    async fn verify_payload(&self, payload: &JwtPayload) -> AppResult<Option<AccountResponse>> {
        // The ghost account was deleted after its token was issued
        if payload.email == "ghost@email.com" {
            return Ok(None);
        }
        Ok(Some(account_response(&payload.email, payload.account_id)))
    }

    fn parse_jwt(&self, token: &str) -> AppResult<JwtPayload> {
        self.verify_token(token)
    }
}

/// Stub product service over a fixed catalog
struct StubProductService;

fn sample_product(id: i32) -> Product {
    Product {
        id,
        name: "Keyboard".to_string(),
        description: None,
        price: 79.99,
        stock: 42,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl ProductService for StubProductService {
    async fn find_many(&self, _params: QueryParams) -> AppResult<Paginated<Product>> {
        Ok(Paginated::new(vec![sample_product(1)], 0, 20, 1))
    }

    async fn find_one(&self, id: i32) -> AppResult<Product> {
        if id == 99 {
            return Err(AppError::NotFound);
        }
        Ok(sample_product(id))
    }

    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        Ok(Product {
            id: 1,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn update(&self, id: i32, _update: ProductUpdate) -> AppResult<Product> {
        Ok(sample_product(id))
    }

    async fn remove(&self, _id: i32) -> AppResult<()> {
        Ok(())
    }
}

fn test_router() -> axum::Router {
    let state = AppState::new(Arc::new(StubAuthService), Arc::new(StubProductService));
    create_router(state)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_returns_created_without_password() {
    let response = test_router()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            r#"{"email":"test@email.com","password":"12345678","firstName":"John","lastName":"Doe"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["email"], "test@email.com");
    assert_eq!(json["firstName"], "John");
    assert!(json.get("password").is_none());
    assert!(json.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let response = test_router()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            r#"{"email":"not-an-email","password":"12345678","firstName":"John","lastName":"Doe"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_conflict_maps_to_409() {
    let response = test_router()
        .oneshot(json_request(
            "POST",
            "/auth/register",
            r#"{"email":"taken@email.com","password":"12345678","firstName":"John","lastName":"Doe"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_returns_access_token() {
    let response = test_router()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            r#"{"email":"test@email.com","password":"12345678"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["access_token"], VALID_TOKEN);
    assert_eq!(json["token_type"], "Bearer");
}

#[tokio::test]
async fn test_login_failure_maps_to_401() {
    let response = test_router()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            r#"{"email":"test@email.com","password":"wrong-password"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_products_require_token() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_products_reject_malformed_authorization() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/products")
                .header(header::AUTHORIZATION, VALID_TOKEN) // missing Bearer prefix
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_products_listing_with_valid_token() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/products?skip=0&take=20")
                .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"][0]["name"], "Keyboard");
    assert_eq!(json["meta"]["total"], 1);
}

#[tokio::test]
async fn test_products_reject_token_for_deleted_account() {
    // Signature-valid token whose account no longer exists
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/products")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", DELETED_ACCOUNT_TOKEN),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_product_not_found_maps_to_404() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/products/99")
                .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_product_returns_created() {
    let response = test_router()
        .oneshot({
            let mut request = json_request(
                "POST",
                "/products",
                r#"{"name":"Keyboard","price":79.99,"stock":42}"#,
            );
            request.headers_mut().insert(
                header::AUTHORIZATION,
                format!("Bearer {}", VALID_TOKEN).parse().unwrap(),
            );
            request
        })
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Keyboard");
    assert_eq!(json["price"], 79.99);
}

#[tokio::test]
async fn test_delete_product_returns_no_content() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/products/1")
                .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}
