use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::user::models::canonical_identifier;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

pub struct PostgresUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresUserRepository {
    /// Create a repository over a connection pool.
    ///
    /// # Arguments
    /// * `pool` - Postgres connection pool
    /// * `timeout` - Upper bound on every store call, including connection acquisition
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result.map_err(|e| map_sqlx_error(operation, e)),
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Credential store call timed out"
                );
                Err(UserError::StoreUnavailable(format!(
                    "{} timed out",
                    operation
                )))
            }
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            role: row.role.parse::<Role>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_sqlx_error(operation: &'static str, e: sqlx::Error) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            tracing::debug!(
                operation,
                constraint = db_err.constraint().unwrap_or("unknown"),
                "Unique constraint rejected write"
            );
            return UserError::DuplicateCredential;
        }
    }

    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_) => {
            tracing::warn!(operation, error = %e, "Credential store unavailable");
            UserError::StoreUnavailable(e.to_string())
        }
        other => {
            tracing::error!(operation, error = %other, "Credential store error");
            UserError::DatabaseError(other.to_string())
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let sql = format!(
            r#"
            INSERT INTO users (username, username_key, email, email_key, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = self
            .bounded(
                "create_user",
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(user.username.as_str())
                    .bind(user.username.canonical())
                    .bind(user.email.as_str())
                    .bind(user.email.canonical())
                    .bind(&user.password_hash)
                    .bind(user.role.as_str())
                    .fetch_one(&self.pool),
            )
            .await?;

        User::try_from(row)
    }

    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, UserError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM users
            WHERE username_key = $1 OR email_key = $1
            ORDER BY id
            LIMIT 1
            "#,
            USER_COLUMNS
        );

        let row = self
            .bounded(
                "find_by_username_or_email",
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(canonical_identifier(identifier))
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn exists(&self, username: &Username, email: &EmailAddress) -> Result<bool, UserError> {
        self.bounded(
            "exists",
            sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS (
                    SELECT 1
                    FROM users
                    WHERE username_key = $1 OR email_key = $2
                )
                "#,
            )
            .bind(username.canonical())
            .bind(email.canonical())
            .fetch_one(&self.pool),
        )
        .await
    }
}
