//! Product CRUD handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{NewProduct, Product, ProductUpdate};
use crate::errors::{AppError, AppResult};
use crate::types::{Comparison, Created, NoContent, Paginated, QueryParams, SortDirection};

/// Product creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Mechanical keyboard")]
    pub name: String,
    /// Optional long description
    pub description: Option<String>,
    /// Unit price
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    #[schema(example = 79.99)]
    pub price: f64,
    /// Units in stock
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    #[schema(example = 42)]
    pub stock: i32,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
        }
    }
}

/// Partial product update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: Option<i32>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
        }
    }
}

/// Product listing query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    /// Number of records to skip
    pub skip: Option<u64>,
    /// Page size
    pub take: Option<u64>,
    /// Comma-separated `field:direction` pairs, e.g. `price:desc,name:asc`
    pub sort: Option<String>,
    /// Substring match on the product name
    pub name: Option<String>,
    /// Lower price bound (inclusive)
    pub min_price: Option<f64>,
    /// Upper price bound (inclusive)
    pub max_price: Option<f64>,
}

impl ListProductsQuery {
    /// Build generic query parameters from the query string
    fn into_params(self) -> AppResult<QueryParams> {
        let mut params = QueryParams::new();

        if let Some(skip) = self.skip {
            params = params.skip(skip);
        }
        if let Some(take) = self.take {
            params = params.take(take);
        }

        if let Some(sort) = &self.sort {
            for clause in sort.split(',').filter(|c| !c.is_empty()) {
                let (field, direction) = match clause.split_once(':') {
                    Some((field, "asc")) => (field, SortDirection::Asc),
                    Some((field, "desc")) => (field, SortDirection::Desc),
                    Some((_, other)) => {
                        return Err(AppError::BadRequest(format!(
                            "Invalid sort direction: {}",
                            other
                        )))
                    }
                    None => (clause, SortDirection::Asc),
                };
                params = params.order_by(field, direction);
            }
        }

        if let Some(name) = self.name {
            params = params.filter("name", Comparison::Contains, name);
        }
        if let Some(min_price) = self.min_price {
            params = params.filter("price", Comparison::Gte, min_price);
        }
        if let Some(max_price) = self.max_price {
            params = params.filter("price", Comparison::Lte, max_price);
        }

        Ok(params)
    }
}

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List products with pagination, ordering, and filtering
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(
        ("skip" = Option<u64>, Query, description = "Number of records to skip"),
        ("take" = Option<u64>, Query, description = "Page size"),
        ("sort" = Option<String>, Query, description = "Comma-separated field:direction pairs"),
        ("name" = Option<String>, Query, description = "Substring match on name"),
        ("minPrice" = Option<f64>, Query, description = "Lower price bound"),
        ("maxPrice" = Option<f64>, Query, description = "Upper price bound"),
    ),
    responses(
        (status = 200, description = "Product listing"),
        (status = 400, description = "Malformed query"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> AppResult<Json<Paginated<Product>>> {
    let params = query.into_params()?;
    let page = state.product_service.find_many(params).await?;

    Ok(Json(page))
}

/// Get a single product by id
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Product>> {
    let product = state.product_service.find_one(id).await?;

    Ok(Json(product))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<Created<Product>> {
    let product = state.product_service.create(payload.into()).await?;

    Ok(Created(product))
}

/// Update an existing product
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product identifier")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let product = state.product_service.update(id, payload.into()).await?;

    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product identifier")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.product_service.remove(id).await?;

    Ok(NoContent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FilterValue;

    #[test]
    fn test_into_params_maps_window_and_sort() {
        let query = ListProductsQuery {
            skip: Some(20),
            take: Some(10),
            sort: Some("price:desc,name".to_string()),
            ..Default::default()
        };

        let params = query.into_params().unwrap();

        assert_eq!(params.skip, Some(20));
        assert_eq!(params.take, Some(10));
        assert_eq!(
            params.order_by,
            vec![
                ("price".to_string(), SortDirection::Desc),
                ("name".to_string(), SortDirection::Asc),
            ]
        );
    }

    #[test]
    fn test_into_params_maps_filters() {
        let query = ListProductsQuery {
            name: Some("key".to_string()),
            min_price: Some(10.0),
            max_price: Some(100.0),
            ..Default::default()
        };

        let params = query.into_params().unwrap();

        assert_eq!(params.filters.len(), 3);
        assert_eq!(params.filters[0].field, "name");
        assert_eq!(params.filters[0].op, Comparison::Contains);
        assert_eq!(params.filters[1].value, FilterValue::Float(10.0));
        assert_eq!(params.filters[2].op, Comparison::Lte);
    }

    #[test]
    fn test_into_params_rejects_bad_direction() {
        let query = ListProductsQuery {
            sort: Some("price:sideways".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            query.into_params().unwrap_err(),
            AppError::BadRequest(_)
        ));
    }
}
