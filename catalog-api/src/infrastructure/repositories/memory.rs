use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::models::{Category, CategoryInput, Product, ProductInput};
use crate::domain::repositories::{
    CategoryRepository, ProductRepository, RepositoryError, RepositoryResult,
};

#[derive(Debug)]
struct MemoryState {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    next_category_id: i64,
    next_product_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            categories: BTreeMap::new(),
            products: BTreeMap::new(),
            next_category_id: 1,
            next_product_id: 1,
        }
    }
}

impl MemoryState {
    fn category_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn product_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.products
            .values()
            .any(|p| p.name == name && Some(p.id) != except)
    }

    fn check_category(&self, category_id: Option<i64>) -> RepositoryResult<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(RepositoryError::CategoryNotFound),
            _ => Ok(()),
        }
    }

    /// 读取时关联分类快照
    fn resolve(&self, product: &Product) -> Product {
        let mut product = product.clone();
        product.category = product
            .category_id
            .and_then(|id| self.categories.get(&id))
            .cloned();
        product
    }
}

/// 进程内存储, 两类仓储共享同一把锁
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category_repository(&self) -> MemoryCategoryRepository {
        MemoryCategoryRepository {
            state: self.state.clone(),
        }
    }

    pub fn product_repository(&self) -> MemoryProductRepository {
        MemoryProductRepository {
            state: self.state.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryCategoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn list(&self) -> RepositoryResult<Vec<Category>> {
        let state = self.state.lock().await;
        Ok(state.categories.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Category> {
        let state = self.state.lock().await;
        state
            .categories
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, input: CategoryInput) -> RepositoryResult<Category> {
        let mut state = self.state.lock().await;
        if state.category_name_taken(&input.name, None) {
            return Err(RepositoryError::NameExists);
        }

        let id = state.next_category_id;
        state.next_category_id += 1;

        let category = input.into_category(id);
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: i64, input: CategoryInput) -> RepositoryResult<Category> {
        let mut state = self.state.lock().await;
        if !state.categories.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if state.category_name_taken(&input.name, Some(id)) {
            return Err(RepositoryError::NameExists);
        }

        let category = input.into_category(id);
        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut state = self.state.lock().await;
        if state.categories.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }

        for product in state.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryProductRepository {
    state: Arc<Mutex<MemoryState>>,
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(&self) -> RepositoryResult<Vec<Product>> {
        let state = self.state.lock().await;
        Ok(state.products.values().map(|p| state.resolve(p)).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Product> {
        let state = self.state.lock().await;
        state
            .products
            .get(&id)
            .map(|p| state.resolve(p))
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_by_category(&self, category_id: i64) -> RepositoryResult<Vec<Product>> {
        let state = self.state.lock().await;
        Ok(state
            .products
            .values()
            .filter(|p| p.category_id == Some(category_id))
            .map(|p| state.resolve(p))
            .collect())
    }

    async fn create(&self, input: ProductInput) -> RepositoryResult<Product> {
        let mut state = self.state.lock().await;
        if state.product_name_taken(&input.name, None) {
            return Err(RepositoryError::NameExists);
        }
        state.check_category(input.category_id)?;

        let id = state.next_product_id;
        state.next_product_id += 1;

        let product = input.into_product(id);
        state.products.insert(id, product.clone());
        Ok(state.resolve(&product))
    }

    async fn update(&self, id: i64, input: ProductInput) -> RepositoryResult<Product> {
        let mut state = self.state.lock().await;
        state.check_category(input.category_id)?;
        if !state.products.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if state.product_name_taken(&input.name, Some(id)) {
            return Err(RepositoryError::NameExists);
        }

        let product = input.into_product(id);
        state.products.insert(id, product.clone());
        Ok(state.resolve(&product))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut state = self.state.lock().await;
        state
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn category_exists(&self, category_id: i64) -> RepositoryResult<bool> {
        let state = self.state.lock().await;
        Ok(state.categories.contains_key(&category_id))
    }
}
