use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::models::{Category, CategoryInput};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// 按 id 升序返回全部分类
    async fn list(&self) -> RepositoryResult<Vec<Category>>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Category>;

    /// 名称重复时返回 `NameExists`
    async fn create(&self, input: CategoryInput) -> RepositoryResult<Category>;

    /// 不存在返回 `NotFound`, 名称与其他分类重复返回 `NameExists`
    async fn update(&self, id: i64, input: CategoryInput) -> RepositoryResult<Category>;

    /// 删除后引用该分类的商品变为未分类
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}
