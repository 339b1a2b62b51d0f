use super::{map_unique_violation, PgStore};
use crate::{
    db::UserRepository,
    error::{AppError, AppResult},
    models::{NewUser, User},
};

const USER_COLUMNS: &str = "id, name, email, created_at, active";

#[async_trait::async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, || {
                    AppError::Conflict(format!("User with email {} already exists", user.email))
                })
            })
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn search_by_name(&self, name: &str) -> AppResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE name ILIKE '%' || $1 || '%' ORDER BY id",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
