pub mod category;
pub mod product;

pub use category::{Category, CategoryInput};
pub use product::{Product, ProductInput};
