use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, MethodRouter},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::response::ApiResponse;
use super::validation::{decode_body, null_as_default, validate_in_order};
use super::{method_not_allowed, Resource};
use crate::domain::models::{Product, ProductInput};
use crate::error::{AppError, AppResult};
use crate::server::AppState;

const RESOURCE: Resource = Resource::Product;

pub fn routes() -> Router<Arc<AppState>> {
    let collection: MethodRouter<Arc<AppState>> = get(list_products)
        .post(create_product)
        .fallback(method_not_allowed);

    Router::new()
        .route("/products", collection.clone())
        .route("/products/", collection)
        .route(
            "/products/{id}",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .fallback(method_not_allowed),
        )
}

/// 查询参数可重复出现, 与 Go 风格一致只取第一个 `category_id`
type QueryPairs = Vec<(String, String)>;

fn category_filter(query: Result<Query<QueryPairs>, QueryRejection>) -> AppResult<Option<i64>> {
    let invalid = || AppError::BadRequest("Invalid category_id parameter".to_string());
    let Query(pairs) = query.map_err(|_| invalid())?;

    match pairs.iter().find(|(key, _)| key == "category_id") {
        None => Ok(None),
        Some((_, raw)) if raw.is_empty() => Ok(None),
        Some((_, raw)) => raw.parse::<i64>().map(Some).map_err(|_| invalid()),
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProductRequest {
    #[serde(deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[serde(deserialize_with = "null_as_default")]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    /// 0 或缺省表示不归类
    pub category_id: Option<i64>,
}

impl ProductRequest {
    fn into_input(self) -> ProductInput {
        ProductInput::new(self.name, self.price, self.stock)
            .with_category(self.category_id.unwrap_or_default())
    }
}

/// 校验顺序: 请求体 -> 名称 -> 价格 -> 库存
fn decode(body: &[u8]) -> AppResult<ProductInput> {
    let request: ProductRequest = decode_body(body)?;
    validate_in_order(&request, &["name", "price", "stock"])?;
    Ok(request.into_input())
}

async fn list_products(
    State(state): State<Arc<AppState>>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let category_id = category_filter(query)?;

    let products = match category_id {
        Some(category_id) => state.products.list_by_category(category_id).await,
        None => state.products.list().await,
    }
    .map_err(|e| RESOURCE.map_error(e, "Failed to retrieve products"))?;

    Ok(ApiResponse::success("Products retrieved successfully", products))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Product>> {
    let id = RESOURCE.parse_id(&id)?;

    let product = state
        .products
        .find_by_id(id)
        .await
        .map_err(|e| RESOURCE.map_error(e, "Failed to retrieve product"))?;

    Ok(ApiResponse::success("Product retrieved successfully", product))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<ApiResponse<Product>> {
    let input = decode(&body)?;

    let product = state
        .products
        .create(input)
        .await
        .map_err(|e| RESOURCE.map_error(e, "Failed to create product"))?;

    tracing::info!(id = product.id, name = %product.name, "Product created");
    Ok(ApiResponse::success("Product created successfully", product).with_status(StatusCode::CREATED))
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<ApiResponse<Product>> {
    let id = RESOURCE.parse_id(&id)?;
    let input = decode(&body)?;

    let product = state
        .products
        .update(id, input)
        .await
        .map_err(|e| RESOURCE.map_error(e, "Failed to update product"))?;

    Ok(ApiResponse::success("Product updated successfully", product))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = RESOURCE.parse_id(&id)?;

    state
        .products
        .delete(id)
        .await
        .map_err(|e| RESOURCE.map_error(e, "Failed to delete product"))?;

    tracing::info!(id, "Product deleted");
    Ok(ApiResponse::message("Product deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, price: f64, stock: i32) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            price,
            stock,
            category_id: None,
        }
    }

    #[test]
    fn test_first_failing_check_wins() {
        let err = validate_in_order(&request("", -1.0, -1), &["name", "price", "stock"]).unwrap_err();
        assert_eq!(err.to_string(), "Name is required");

        let err = validate_in_order(&request("Phone", -1.0, -1), &["name", "price", "stock"]).unwrap_err();
        assert_eq!(err.to_string(), "Price cannot be negative");

        let err = validate_in_order(&request("Phone", 0.0, -1), &["name", "price", "stock"]).unwrap_err();
        assert_eq!(err.to_string(), "Stock cannot be negative");

        assert!(validate_in_order(&request("Phone", 0.0, 0), &["name", "price", "stock"]).is_ok());
    }

    fn pairs(query: &[(&str, &str)]) -> Result<Query<QueryPairs>, QueryRejection> {
        Ok(Query(
            query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn test_category_filter_takes_first_value() {
        let filter = category_filter(pairs(&[("category_id", "2"), ("category_id", "x")])).unwrap();
        assert_eq!(filter, Some(2));

        assert_eq!(category_filter(pairs(&[])).unwrap(), None);
        assert_eq!(category_filter(pairs(&[("category_id", "")])).unwrap(), None);
        assert_eq!(category_filter(pairs(&[("page", "3")])).unwrap(), None);

        let err = category_filter(pairs(&[("category_id", "abc")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid category_id parameter");
    }

    #[test]
    fn test_null_name_is_reported_as_missing() {
        let err = decode(br#"{"name":null,"price":1,"stock":1}"#).unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let request: ProductRequest = serde_json::from_str(r#"{"name":"Cable"}"#).unwrap();
        let input = request.into_input();
        assert_eq!(input.price, 0.0);
        assert_eq!(input.stock, 0);
        assert_eq!(input.category_id, None);
    }
}
