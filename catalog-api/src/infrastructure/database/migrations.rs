use sqlx::PgPool;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE,
        description TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE,
        price NUMERIC(10, 2) NOT NULL DEFAULT 0,
        stock INTEGER NOT NULL DEFAULT 0,
        category_id BIGINT REFERENCES categories(id) ON DELETE SET NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    // 旧表没有 category_id 列时补上
    r#"
    DO $$
    BEGIN
        IF NOT EXISTS (
            SELECT 1 FROM information_schema.columns
            WHERE table_name = 'products' AND column_name = 'category_id'
        ) THEN
            ALTER TABLE products
                ADD COLUMN category_id BIGINT REFERENCES categories(id) ON DELETE SET NULL;
        END IF;
    END $$
    "#,
];

/// 幂等建表, 可在每次启动时执行
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for migration in MIGRATIONS {
        sqlx::query(migration).execute(pool).await?;
    }

    tracing::info!("Database migrations completed");
    Ok(())
}
