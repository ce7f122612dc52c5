//! SQLite user repository implementation.

use leadgate_core::repository::UserRepository;
use leadgate_types::error::RepositoryError;
use leadgate_types::user::User;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_error, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: String,
    name: String,
    handle: String,
    email: String,
    password_hash: String,
    is_active: i64,
    is_admin: i64,
    is_key_user: i64,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            handle: row.try_get("handle")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_active: row.try_get("is_active")?,
            is_admin: row.try_get("is_admin")?,
            is_key_user: row.try_get("is_key_user")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: parse_uuid(&self.id, "user id")?,
            name: self.name,
            handle: self.handle,
            email: self.email,
            password_hash: self.password_hash,
            is_active: self.is_active != 0,
            is_admin: self.is_admin != 0,
            is_key_user: self.is_key_user != 0,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO users (id, name, handle, email, password_hash, is_active, is_admin, is_key_user, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.handle)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active as i64)
        .bind(user.is_admin as i64)
        .bind(user.is_key_user as i64)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ? OR handle = ?")
            .bind(identifier)
            .bind(identifier)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut users = Vec::with_capacity(rows.len());
        for row in &rows {
            let user_row =
                UserRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            users.push(user_row.into_user()?);
        }

        Ok(users)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM users")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }

    async fn set_active(&self, id: &Uuid, is_active: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active as i64)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_user(handle: &str, email: &str) -> User {
        User {
            id: Uuid::now_v7(),
            name: "Ana Silva".to_string(),
            handle: handle.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            is_active: true,
            is_admin: false,
            is_key_user: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let user = make_user("ana", "ana@example.com");
        repo.create(&user).await.unwrap();

        let found = repo.get(&user.id).await.unwrap().unwrap();
        assert_eq!(found.email, "ana@example.com");
        assert_eq!(found.handle, "ana");
        assert!(found.is_active);
        assert!(!found.is_key_user);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create(&make_user("ana", "ana@example.com")).await.unwrap();

        let err = repo
            .create(&make_user("outra", "ana@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_by_identifier_matches_email_and_handle() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let user = make_user("ana", "ana@example.com");
        repo.create(&user).await.unwrap();

        let by_email = repo.find_by_identifier("ana@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id, user.id);

        let by_handle = repo.find_by_identifier("ana").await.unwrap();
        assert_eq!(by_handle.unwrap().id, user.id);

        let missing = repo.find_by_identifier("ninguem").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_count_and_list() {
        let repo = SqliteUserRepository::new(test_pool().await);
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(&make_user("ana", "ana@example.com")).await.unwrap();
        repo.create(&make_user("rui", "rui@example.com")).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_set_active() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let user = make_user("ana", "ana@example.com");
        repo.create(&user).await.unwrap();

        repo.set_active(&user.id, false).await.unwrap();
        let found = repo.get(&user.id).await.unwrap().unwrap();
        assert!(!found.is_active);

        let err = repo.set_active(&Uuid::now_v7(), true).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
