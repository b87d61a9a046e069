use thiserror::Error;

/// 仓储层错误, 调用方按种类映射为响应
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("name already exists")]
    NameExists,

    #[error("category not found")]
    CategoryNotFound,

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        // 预检查之外的并发写入由表约束兜底
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepositoryError::NameExists;
            }
            if db_err.is_foreign_key_violation() {
                return RepositoryError::CategoryNotFound;
            }
        }
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            other => RepositoryError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: RepositoryError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn test_other_errors_stay_opaque() {
        let err: RepositoryError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
