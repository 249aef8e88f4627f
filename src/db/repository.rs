//! Database repository for user CRUD operations.
//!
//! Email uniqueness is checked before writing and backed by a UNIQUE index.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserRole};

const USER_COLUMNS: &str = "id, name, email, role, created_at, updated_at";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get a user by email address.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create a new user.
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, AppError> {
        if self.get_user_by_email(&request.email).await?.is_some() {
            return Err(email_in_use());
        }

        let now = timestamp();
        let role = request.role.unwrap_or_default();

        let result = sqlx::query(
            "INSERT INTO users (name, email, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(role.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(user_id = id, "Created user");

        Ok(User {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
            role,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Update a user. Fields absent from the request keep their current value.
    pub async fn update_user(&self, id: i64, request: &UpdateUserRequest) -> Result<User, AppError> {
        let existing = self
            .get_user(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        if let Some(email) = &request.email {
            if *email != existing.email && self.get_user_by_email(email).await?.is_some() {
                return Err(email_in_use());
            }
        }

        let now = timestamp();
        let name = request.name.clone().unwrap_or(existing.name);
        let email = request.email.clone().unwrap_or(existing.email);
        let role = request.role.unwrap_or(existing.role);

        let result = sqlx::query(
            "UPDATE users SET name = ?, email = ?, role = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&name)
        .bind(&email)
        .bind(role.as_str())
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Deleted between read and write
            return Err(user_not_found(id));
        }

        tracing::info!(user_id = id, "Updated user");

        Ok(User {
            id,
            name,
            email,
            role,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}

/// Current UTC time with millisecond precision, e.g. `2024-01-15T10:30:00.000Z`.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn user_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User {} not found", id))
}

fn email_in_use() -> AppError {
    AppError::Conflict("Email is already in use".to_string())
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    let role: String = row.get("role");
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: UserRole::parse(&role).unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .unwrap();
        (Repository::new(pool), temp_dir)
    }

    fn create(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_role_to_user() {
        let (repo, _dir) = repo().await;

        let user = repo.create_user(&create("Kim", "kim@example.com")).await.unwrap();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(user.created_at.len(), "2024-01-15T10:30:00.000Z".len());
        assert!(user.created_at.ends_with('Z'));

        let fetched = repo.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "kim@example.com");
        assert_eq!(fetched.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (repo, _dir) = repo().await;
        repo.create_user(&create("Kim", "kim@example.com")).await.unwrap();

        let err = repo
            .create_user(&create("Other Kim", "kim@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unique_index_violation_maps_to_conflict() {
        let (repo, _dir) = repo().await;
        repo.create_user(&create("Kim", "kim@example.com")).await.unwrap();

        // Write past the pre-check, as a concurrent insert would
        let err = sqlx::query(
            "INSERT INTO users (name, email, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind("Other Kim")
        .bind("kim@example.com")
        .bind("USER")
        .bind(timestamp())
        .bind(timestamp())
        .execute(&repo.pool)
        .await
        .unwrap_err();

        let err = AppError::from(err);
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_email_conflict_and_self_update() {
        let (repo, _dir) = repo().await;
        let kim = repo.create_user(&create("Kim", "kim@example.com")).await.unwrap();
        repo.create_user(&create("Lee", "lee@example.com")).await.unwrap();

        let err = repo
            .update_user(
                kim.id,
                &UpdateUserRequest {
                    name: None,
                    email: Some("lee@example.com".to_string()),
                    role: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let updated = repo
            .update_user(
                kim.id,
                &UpdateUserRequest {
                    name: Some("Kim Admin".to_string()),
                    email: Some("kim@example.com".to_string()),
                    role: Some(UserRole::Admin),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Kim Admin");
        assert_eq!(updated.role, UserRole::Admin);
        assert_eq!(updated.created_at, kim.created_at);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let (repo, _dir) = repo().await;

        assert!(repo.get_user(42).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_user(42).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            repo.update_user(
                42,
                &UpdateUserRequest {
                    name: Some("x".to_string()),
                    email: None,
                    role: None
                }
            )
            .await
            .unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let (repo, _dir) = repo().await;
        let a = repo.create_user(&create("Zed", "z@example.com")).await.unwrap();
        let b = repo.create_user(&create("Amy", "a@example.com")).await.unwrap();

        let ids: Vec<i64> = repo.list_users().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);

        repo.delete_user(a.id).await.unwrap();
        assert_eq!(repo.list_users().await.unwrap().len(), 1);
    }
}
