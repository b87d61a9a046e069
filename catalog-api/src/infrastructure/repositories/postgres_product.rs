use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::models::{Category, Product, ProductInput};
use crate::domain::repositories::{ProductRepository, RepositoryError, RepositoryResult};

/// 商品与分类左连接后的一行
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: f64,
    stock: i32,
    category_id: Option<i64>,
    category_name: Option<String>,
    category_description: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(Category {
                id,
                name,
                description: row.category_description.unwrap_or_default(),
            }),
            _ => None,
        };

        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            stock: row.stock,
            category_id: row.category_id,
            category,
        }
    }
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: i64) -> RepositoryResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)"#)
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn name_taken(&self, name: &str, except: Option<i64>) -> RepositoryResult<bool> {
        let (taken,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM products
                WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
            .bind(name)
            .bind(except)
            .fetch_one(&self.pool)
            .await?;
        Ok(taken)
    }

    async fn check_category(&self, category_id: Option<i64>) -> RepositoryResult<()> {
        if let Some(category_id) = category_id {
            if !self.category_exists(category_id).await? {
                return Err(RepositoryError::CategoryNotFound);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> RepositoryResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT p.id, p.name, p.price::FLOAT8 AS price, p.stock, p.category_id,
                   c.name AS category_name, c.description AS category_description
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            ORDER BY p.id
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Product> {
        sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT p.id, p.name, p.price::FLOAT8 AS price, p.stock, p.category_id,
                   c.name AS category_name, c.description AS category_description
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.id = $1
            "#,
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Product::from)
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_by_category(&self, category_id: i64) -> RepositoryResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT p.id, p.name, p.price::FLOAT8 AS price, p.stock, p.category_id,
                   c.name AS category_name, c.description AS category_description
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.category_id = $1
            ORDER BY p.id
            "#,
        )
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn create(&self, input: ProductInput) -> RepositoryResult<Product> {
        if self.name_taken(&input.name, None).await? {
            return Err(RepositoryError::NameExists);
        }
        self.check_category(input.category_id).await?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO products (name, price, stock, category_id)
            VALUES ($1, CAST($2 AS NUMERIC(10, 2)), $3, $4)
            RETURNING id
            "#,
        )
            .bind(&input.name)
            .bind(input.price)
            .bind(input.stock)
            .bind(input.category_id)
            .fetch_one(&self.pool)
            .await?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: i64, input: ProductInput) -> RepositoryResult<Product> {
        self.check_category(input.category_id).await?;
        if !self.exists(id).await? {
            return Err(RepositoryError::NotFound);
        }
        if self.name_taken(&input.name, Some(id)).await? {
            return Err(RepositoryError::NameExists);
        }

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $1, price = CAST($2 AS NUMERIC(10, 2)), stock = $3, category_id = $4,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $5
            "#,
        )
            .bind(&input.name)
            .bind(input.price)
            .bind(input.stock)
            .bind(input.category_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query(r#"DELETE FROM products WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn category_exists(&self, category_id: i64) -> RepositoryResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)"#)
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
