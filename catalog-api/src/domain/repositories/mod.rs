mod category_repository;
mod error;
mod product_repository;

pub use category_repository::CategoryRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use product_repository::ProductRepository;
