//! Product repository implementation.
//!
//! This is the only place that interprets the store-agnostic [`StoreQuery`]
//! shape against SeaORM columns.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, Value,
};

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{NewProduct, Product, ProductUpdate};
use crate::errors::{AppError, AppResult};
use crate::types::{Comparison, Condition, FilterValue, SortDirection, StoreQuery};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product store contract
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find products matching the query window, order, and conditions
    async fn find_many(&self, query: &StoreQuery) -> AppResult<Vec<Product>>;

    /// Count products matching the query conditions (ignores the window)
    async fn count(&self, query: &StoreQuery) -> AppResult<u64>;

    /// Find product by primary key
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    /// Persist a new product
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    /// Apply a partial update to an existing product
    async fn update(&self, id: i32, update: ProductUpdate) -> AppResult<Product>;

    /// Delete product by primary key
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of ProductRepository over SeaORM
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Resolve a caller-supplied field name to a product column.
///
/// Unknown names were passed through the translator untouched; they are
/// rejected here with a store-level validation error.
fn resolve_column(field: &str) -> AppResult<product::Column> {
    match field {
        "id" => Ok(product::Column::Id),
        "name" => Ok(product::Column::Name),
        "description" => Ok(product::Column::Description),
        "price" => Ok(product::Column::Price),
        "stock" => Ok(product::Column::Stock),
        "created_at" => Ok(product::Column::CreatedAt),
        "updated_at" => Ok(product::Column::UpdatedAt),
        other => Err(AppError::validation(format!(
            "Unknown product field: {}",
            other
        ))),
    }
}

fn to_db_value(value: &FilterValue) -> Value {
    match value {
        FilterValue::String(s) => s.clone().into(),
        FilterValue::Int(i) => (*i).into(),
        FilterValue::Float(f) => (*f).into(),
        FilterValue::Bool(b) => (*b).into(),
    }
}

/// Apply filter conditions to a select, AND-combined
fn apply_conditions(
    mut select: Select<ProductEntity>,
    conditions: &[Condition],
) -> AppResult<Select<ProductEntity>> {
    for cond in conditions {
        let column = resolve_column(&cond.field)?;
        let expr = match cond.op {
            Comparison::Eq => column.eq(to_db_value(&cond.value)),
            Comparison::Ne => column.ne(to_db_value(&cond.value)),
            Comparison::Gt => column.gt(to_db_value(&cond.value)),
            Comparison::Gte => column.gte(to_db_value(&cond.value)),
            Comparison::Lt => column.lt(to_db_value(&cond.value)),
            Comparison::Lte => column.lte(to_db_value(&cond.value)),
            Comparison::Contains => match &cond.value {
                FilterValue::String(s) => column.contains(s.as_str()),
                _ => {
                    return Err(AppError::validation(format!(
                        "contains requires a string value for field {}",
                        cond.field
                    )))
                }
            },
        };
        select = select.filter(expr);
    }
    Ok(select)
}

/// Apply ordering clauses to a select, preserving their sequence
fn apply_order(
    mut select: Select<ProductEntity>,
    order: &[(String, SortDirection)],
) -> AppResult<Select<ProductEntity>> {
    for (field, direction) in order {
        let column = resolve_column(field)?;
        let order = match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        select = select.order_by(column, order);
    }
    Ok(select)
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_many(&self, query: &StoreQuery) -> AppResult<Vec<Product>> {
        let select = apply_conditions(ProductEntity::find(), &query.conditions)?;
        let select = apply_order(select, &query.order)?;

        let models = select
            .offset(query.offset)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn count(&self, query: &StoreQuery) -> AppResult<u64> {
        apply_conditions(ProductEntity::find(), &query.conditions)?
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            stock: Set(product.stock),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: i32, update: ProductUpdate) -> AppResult<Product> {
        let product = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = product.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(price) = update.price {
            active.price = Set(price);
        }
        if let Some(stock) = update.stock {
            active.stock = Set(stock);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
