use crate::auth::hash::{hash_password, HashError};
use crate::db::models::User;
use crate::db::DbPool;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";

pub async fn create_user(
    pool: &DbPool,
    email: &str,
    password_hash: &str,
    role: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, role, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(email.trim().to_lowercase())
    .bind(password_hash)
    .bind(role)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn get_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .await
}

pub async fn update_last_login(pool: &DbPool, user_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Hash(HashError),
}

/// Seeds the admin account when no admin exists yet. Returns the created
/// user, or `None` when an admin was already present.
pub async fn ensure_admin(
    pool: &DbPool,
    email: &str,
    password: &str,
) -> Result<Option<User>, SeedError> {
    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE role = $1 LIMIT 1")
        .bind(ADMIN_ROLE)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Ok(None);
    }

    let password_hash = hash_password(password).map_err(SeedError::Hash)?;
    let admin = create_user(pool, email, &password_hash, ADMIN_ROLE).await?;
    Ok(Some(admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::db::{create_memory_pool, run_migrations};

    #[tokio::test]
    async fn admin_is_seeded_once() {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let admin = ensure_admin(&pool, "Admin@MarioService.com", "admin123")
            .await
            .unwrap()
            .expect("admin should be created");
        assert_eq!(admin.email, "admin@marioservice.com");
        assert_eq!(admin.role, ADMIN_ROLE);
        assert!(verify_password("admin123", &admin.password_hash).unwrap());

        assert!(ensure_admin(&pool, "other@marioservice.com", "x").await.unwrap().is_none());

        let found = get_user_by_email(&pool, " ADMIN@marioservice.com ").await.unwrap();
        assert!(found.is_some());
        assert!(found.unwrap().last_login.is_none());
    }

    #[tokio::test]
    async fn seeding_without_schema_reports_store_error() {
        let pool = create_memory_pool().await.unwrap();
        let err = ensure_admin(&pool, "admin@marioservice.com", "admin123").await.unwrap_err();
        assert!(matches!(err, SeedError::Db(_)));
        assert!(err.to_string().starts_with("database error"));
    }
}
