use axum::{
    body::Bytes,
    extract::{Path, State},
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
use crate::domain::models::{Category, CategoryInput};
use crate::error::AppResult;
use crate::server::AppState;

const RESOURCE: Resource = Resource::Category;

pub fn routes() -> Router<Arc<AppState>> {
    let collection: MethodRouter<Arc<AppState>> = get(list_categories)
        .post(create_category)
        .fallback(method_not_allowed);

    Router::new()
        .route("/categories", collection.clone())
        .route("/categories/", collection)
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category)
                .fallback(method_not_allowed),
        )
}

/// 创建与更新共用的请求体, 缺省字段按空值处理
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CategoryRequest {
    #[serde(deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
}

impl CategoryRequest {
    fn into_input(self) -> CategoryInput {
        CategoryInput::new(self.name, self.description.unwrap_or_default())
    }
}

fn decode(body: &[u8]) -> AppResult<CategoryInput> {
    let request: CategoryRequest = decode_body(body)?;
    validate_in_order(&request, &["name"])?;
    Ok(request.into_input())
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> AppResult<ApiResponse<Vec<Category>>> {
    let categories = state
        .categories
        .list()
        .await
        .map_err(|e| RESOURCE.map_error(e, "Failed to retrieve categories"))?;

    Ok(ApiResponse::success("Categories retrieved successfully", categories))
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Category>> {
    let id = RESOURCE.parse_id(&id)?;

    let category = state
        .categories
        .find_by_id(id)
        .await
        .map_err(|e| RESOURCE.map_error(e, "Failed to retrieve category"))?;

    Ok(ApiResponse::success("Category retrieved successfully", category))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<ApiResponse<Category>> {
    let input = decode(&body)?;

    let category = state
        .categories
        .create(input)
        .await
        .map_err(|e| RESOURCE.map_error(e, "Failed to create category"))?;

    tracing::info!(id = category.id, name = %category.name, "Category created");
    Ok(ApiResponse::success("Category created successfully", category).with_status(StatusCode::CREATED))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<ApiResponse<Category>> {
    let id = RESOURCE.parse_id(&id)?;
    let input = decode(&body)?;

    let category = state
        .categories
        .update(id, input)
        .await
        .map_err(|e| RESOURCE.map_error(e, "Failed to update category"))?;

    Ok(ApiResponse::success("Category updated successfully", category))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = RESOURCE.parse_id(&id)?;

    state
        .categories
        .delete(id)
        .await
        .map_err(|e| RESOURCE.map_error(e, "Failed to delete category"))?;

    tracing::info!(id, "Category deleted");
    Ok(ApiResponse::message("Category deleted successfully"))
}
