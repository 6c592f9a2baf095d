use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use vidshelf_model::{UserId, UserRecord};

use super::{map_sqlx_error, violated_constraint, with_deadline, with_deadline_or};
use crate::database::ports::users::{NewUser, UsersRepository};
use crate::error::{CatalogError, Result};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

#[derive(Clone)]
pub struct PostgresUsersRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresUsersRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

impl fmt::Debug for PostgresUsersRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresUsersRepository")
            .field("pool_size", &self.pool.size())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl UsersRepository for PostgresUsersRepository {
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        with_deadline_or(
            self.timeout,
            "create user",
            sqlx::query_as::<_, UserRecord>(&sql)
                .bind(&user.username)
                .bind(&user.email)
                .bind(&user.password_hash)
                .fetch_one(&self.pool),
            |err| match violated_constraint(&err).map(str::to_owned).as_deref() {
                Some("users_username_key") => {
                    CatalogError::Conflict(format!("username {} is taken", user.username))
                }
                Some("users_email_key") => {
                    CatalogError::Conflict(format!("email {} is already registered", user.email))
                }
                _ => map_sqlx_error("create user", err),
            },
        )
        .await
    }

    async fn get_user(&self, id: UserId) -> Result<UserRecord> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        with_deadline(
            self.timeout,
            "get user",
            sqlx::query_as::<_, UserRecord>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| CatalogError::NotFound(format!("user {id}")))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        with_deadline(
            self.timeout,
            "find user by email",
            sqlx::query_as::<_, UserRecord>(&sql)
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await
    }
}
