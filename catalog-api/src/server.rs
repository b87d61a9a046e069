use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::{self, categories, products};
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::{CategoryRepository, ProductRepository};
use crate::error::StartupError;
use crate::infrastructure::database::{migrations::run_migrations, postgres::init_postgres, seed::seed_defaults};
use crate::infrastructure::repositories::{MemoryStore, PgCategoryRepository, PgProductRepository};

/// 处理器只依赖仓储接口
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self { categories, products }
    }

    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self::new(
            Arc::new(store.category_repository()),
            Arc::new(store.product_repository()),
        )
    }

    /// 按配置选择存储实现, PostgreSQL 会先执行迁移
    pub async fn from_config(config: &Config) -> Result<Self, StartupError> {
        let state = match config.storage.backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage");
                Self::in_memory()
            }
            StorageBackend::Postgres => {
                let pool = init_postgres(&config.database).await?;
                run_migrations(&pool).await?;
                Self::new(
                    Arc::new(PgCategoryRepository::new(pool.clone())),
                    Arc::new(PgProductRepository::new(pool)),
                )
            }
        };

        if config.storage.seed {
            seed_defaults(state.categories.as_ref(), state.products.as_ref()).await?;
        }

        Ok(state)
    }
}

pub fn create_app(state: AppState) -> Router {
    let app_state = Arc::new(state);

    Router::new()
        .merge(categories::routes())
        .merge(products::routes())
        .fallback(api::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// 启动日志中输出的路由表
pub const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/categories", "Get all categories"),
    ("POST", "/categories", "Create a category"),
    ("GET", "/categories/{id}", "Get a category by ID"),
    ("PUT", "/categories/{id}", "Update a category"),
    ("DELETE", "/categories/{id}", "Delete a category"),
    ("GET", "/products", "Get all products (?category_id= filters)"),
    ("POST", "/products", "Create a product"),
    ("GET", "/products/{id}", "Get a product by ID"),
    ("PUT", "/products/{id}", "Update a product"),
    ("DELETE", "/products/{id}", "Delete a product"),
];
