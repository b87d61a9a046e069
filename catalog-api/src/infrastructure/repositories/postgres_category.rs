use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::models::{Category, CategoryInput};
use crate::domain::repositories::{CategoryRepository, RepositoryError, RepositoryResult};

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    description: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
        }
    }
}

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: i64) -> RepositoryResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)"#)
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// `except` 为更新时排除的自身 id
    async fn name_taken(&self, name: &str, except: Option<i64>) -> RepositoryResult<bool> {
        let (taken,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM categories
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
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> RepositoryResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"SELECT id, name, description FROM categories ORDER BY id"#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Category> {
        sqlx::query_as::<_, CategoryRow>(
            r#"SELECT id, name, description FROM categories WHERE id = $1"#,
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Category::from)
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, input: CategoryInput) -> RepositoryResult<Category> {
        // 预检查用于给出明确的错误, 唯一约束兜底并发写入
        if self.name_taken(&input.name, None).await? {
            return Err(RepositoryError::NameExists);
        }

        let (id,): (i64,) = sqlx::query_as(
            r#"INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id"#,
        )
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(input.into_category(id))
    }

    async fn update(&self, id: i64, input: CategoryInput) -> RepositoryResult<Category> {
        if !self.exists(id).await? {
            return Err(RepositoryError::NotFound);
        }
        if self.name_taken(&input.name, Some(id)).await? {
            return Err(RepositoryError::NameExists);
        }

        sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET name = $1, description = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $3
            RETURNING id, name, description
            "#,
        )
            .bind(&input.name)
            .bind(&input.description)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Category::from)
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        // products.category_id 由外键 ON DELETE SET NULL 置空
        let result = sqlx::query(r#"DELETE FROM categories WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
