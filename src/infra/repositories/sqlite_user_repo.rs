use crate::domain::{models::user::User, ports::UserRepository};
use crate::error::AppError;
use crate::infra::repositories::rows::UserRow;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, name, email, phone, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&user.id).bind(&user.name).bind(&user.email).bind(&user.phone)
            .bind(&user.password_hash).bind(user.role.as_str()).bind(user.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        User::try_from(row)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email.trim().to_lowercase()).fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .map(User::try_from).transpose()
    }

    async fn push_created_event(&self, user_id: &str, event_id: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO user_created_events (user_id, event_id) VALUES (?, ?)")
            .bind(user_id).bind(event_id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn push_registered_event(&self, user_id: &str, event_id: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO user_registered_events (user_id, event_id) VALUES (?, ?)")
            .bind(user_id).bind(event_id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn pull_registered_event(&self, user_id: &str, event_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_registered_events WHERE user_id = ? AND event_id = ?")
            .bind(user_id).bind(event_id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn created_event_ids(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT event_id FROM user_created_events WHERE user_id = ? ORDER BY id ASC")
            .bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn registered_event_ids(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT event_id FROM user_registered_events WHERE user_id = ? ORDER BY id ASC")
            .bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
