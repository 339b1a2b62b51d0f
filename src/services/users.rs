use std::sync::Arc;

use crate::{
    db::UserRepository,
    error::{AppError, AppResult},
    models::{NewUser, User},
};

pub struct UsersService {
    users: Arc<dyn UserRepository>,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Registers a user; e-mails are unique after trimming and lowercasing
    pub async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let user = user.normalized();
        if user.name.is_empty() {
            return Err(AppError::InvalidInput("Name cannot be empty".to_string()));
        }
        if !user.email.contains('@') {
            return Err(AppError::InvalidInput(format!(
                "Invalid email address: {}",
                user.email
            )));
        }
        if self.users.get_by_email(&user.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "User with email {} already exists",
                user.email
            )));
        }

        let user = self.users.create(user).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    pub async fn search_users(&self, name: &str) -> AppResult<Vec<User>> {
        self.users.search_by_name(name.trim()).await
    }

    pub async fn delete_user(&self, id: i64) -> AppResult<bool> {
        self.users.delete(id).await
    }
}
