use crate::domain::models::{CategoryInput, ProductInput};
use crate::domain::repositories::{CategoryRepository, ProductRepository, RepositoryResult};

const SEED_CATEGORIES: &[(&str, &str)] = &[
    ("Electronics", "Electronic devices and gadgets"),
    ("Clothing", "Apparel and fashion items"),
    ("Books", "Books and reading materials"),
    ("Food & Beverages", "Food products and drinks"),
    ("Sports", "Sports equipment and accessories"),
];

const SEED_PRODUCTS: &[(&str, f64, i32)] = &[
    ("iPhone 15 Pro", 999.99, 50),
    ("MacBook Pro M3", 2499.99, 25),
    ("AirPods Pro", 249.99, 100),
    ("iPad Air", 599.99, 40),
    ("Apple Watch Series 9", 399.99, 60),
];

/// 种子商品归属的分类
const SEED_PRODUCT_CATEGORY: &str = "Electronics";

/// 集合为空时写入初始数据, 已有数据则跳过
pub async fn seed_defaults(
    categories: &dyn CategoryRepository,
    products: &dyn ProductRepository,
) -> RepositoryResult<()> {
    if categories.list().await?.is_empty() {
        for (name, description) in SEED_CATEGORIES {
            categories.create(CategoryInput::new(*name, *description)).await?;
        }
        tracing::info!(count = SEED_CATEGORIES.len(), "Categories seeded");
    } else {
        tracing::info!("Categories already present, skipping seed");
    }

    if !products.list().await?.is_empty() {
        tracing::info!("Products already present, skipping seed");
        return Ok(());
    }

    let category_id = categories
        .list()
        .await?
        .into_iter()
        .find(|category| category.name == SEED_PRODUCT_CATEGORY)
        .map(|category| category.id);

    for (name, price, stock) in SEED_PRODUCTS {
        let mut input = ProductInput::new(*name, *price, *stock);
        input.category_id = category_id;
        products.create(input).await?;
    }
    tracing::info!(count = SEED_PRODUCTS.len(), "Products seeded");

    Ok(())
}
