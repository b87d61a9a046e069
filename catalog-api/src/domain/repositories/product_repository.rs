use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::models::{Product, ProductInput};

/// 商品读取结果中的 `category` 均在读取时关联得到
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> RepositoryResult<Vec<Product>>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Product>;

    async fn list_by_category(&self, category_id: i64) -> RepositoryResult<Vec<Product>>;

    /// 名称重复返回 `NameExists`, 引用的分类不存在返回 `CategoryNotFound`
    async fn create(&self, input: ProductInput) -> RepositoryResult<Product>;

    /// `category_id` 为空时清除原有分类
    async fn update(&self, id: i64, input: ProductInput) -> RepositoryResult<Product>;

    async fn delete(&self, id: i64) -> RepositoryResult<()>;

    async fn category_exists(&self, category_id: i64) -> RepositoryResult<bool>;
}
