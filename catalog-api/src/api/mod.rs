pub mod categories;
pub mod products;
pub mod response;
pub mod validation;

use axum::http::Uri;

use crate::domain::repositories::RepositoryError;
use crate::error::AppError;

/// 资源名, 用于拼接对外提示
#[derive(Debug, Clone, Copy)]
pub enum Resource {
    Category,
    Product,
}

impl Resource {
    fn label(self) -> &'static str {
        match self {
            Resource::Category => "Category",
            Resource::Product => "Product",
        }
    }

    /// `{id}` 段必须是正整数
    pub fn parse_id(self, raw: &str) -> Result<i64, AppError> {
        raw.parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Invalid {} ID", self.label().to_lowercase()))
            })
    }

    /// 已知的仓储错误映射为对应状态码, 其余记录日志后返回 `failure`
    pub fn map_error(self, err: RepositoryError, failure: &str) -> AppError {
        match err {
            RepositoryError::NotFound => AppError::NotFound(format!("{} not found", self.label())),
            RepositoryError::NameExists => {
                AppError::Conflict(format!("{} name already exists", self.label()))
            }
            RepositoryError::CategoryNotFound => AppError::BadRequest("Category not found".into()),
            RepositoryError::Database(e) => {
                tracing::error!(error = %e, resource = self.label(), "{}", failure);
                AppError::Internal(failure.to_string())
            }
        }
    }
}

/// 路径合法但方法不支持
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// 未命中任何路由; 资源前缀下多出的路径段视为非法 id
pub async fn fallback(uri: Uri) -> AppError {
    let path = uri.path();
    if path.starts_with("/categories/") {
        AppError::BadRequest("Invalid category ID".to_string())
    } else if path.starts_with("/products/") {
        AppError::BadRequest("Invalid product ID".to_string())
    } else {
        AppError::NotFound("Not found".to_string())
    }
}
