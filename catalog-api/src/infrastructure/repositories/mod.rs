mod memory;
mod postgres_category;
mod postgres_product;

pub use memory::{MemoryCategoryRepository, MemoryProductRepository, MemoryStore};
pub use postgres_category::PgCategoryRepository;
pub use postgres_product::PgProductRepository;
