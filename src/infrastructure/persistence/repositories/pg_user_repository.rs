use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crate::application::ports::{DeductionOutcome, RepositoryError, UserRepository};
use crate::domain::{UserAccount, UserSummary};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    username: String,
    password: String,
    minutes_remaining: f64,
}

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    username: String,
    minutes_remaining: f64,
}

fn map_query_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_check_violation() || db.is_unique_violation() => {
            RepositoryError::ConstraintViolation(db.message().to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn get_user(&self, username: &str) -> Result<Option<UserAccount>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT username, password, minutes_remaining
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_query_error)?;

        Ok(row.map(|r| UserAccount {
            username: r.username,
            password: r.password,
            minutes_remaining: r.minutes_remaining,
        }))
    }

    #[instrument(skip(self))]
    async fn deduct_minutes(
        &self,
        username: &str,
        minutes: f64,
    ) -> Result<DeductionOutcome, RepositoryError> {
        // Check and write in one statement; concurrent updates of the same row
        // re-evaluate the WHERE clause after the first one commits.
        let deducted: Option<f64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET minutes_remaining = minutes_remaining - $2
            WHERE username = $1 AND minutes_remaining >= $2
            RETURNING minutes_remaining
            "#,
        )
        .bind(username)
        .bind(minutes)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_query_error)?;

        if let Some(remaining) = deducted {
            return Ok(DeductionOutcome::Deducted { remaining });
        }

        let current: Option<f64> =
            sqlx::query_scalar("SELECT minutes_remaining FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_query_error)?;

        Ok(match current {
            Some(remaining) => DeductionOutcome::Insufficient { remaining },
            None => DeductionOutcome::NotFound,
        })
    }

    #[instrument(skip(self))]
    async fn set_limit(&self, username: &str, minutes: f64) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET minutes_remaining = $1 WHERE username = $2")
            .bind(minutes)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(map_query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(username.to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, password))]
    async fn set_password(&self, username: &str, password: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password = $1 WHERE username = $2")
            .bind(password)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(map_query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(username.to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self, account), fields(username = %account.username))]
    async fn add_user(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (username, password, minutes_remaining)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO UPDATE
            SET password = EXCLUDED.password,
                minutes_remaining = EXCLUDED.minutes_remaining
            "#,
        )
        .bind(&account.username)
        .bind(&account.password)
        .bind(account.minutes_remaining)
        .execute(&self.pool)
        .await
        .map_err(map_query_error)?;

        Ok(())
    }

    #[instrument(skip(self, account), fields(username = %account.username))]
    async fn insert_if_absent(&self, account: &UserAccount) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, minutes_remaining)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(&account.username)
        .bind(&account.password)
        .bind(account.minutes_remaining)
        .execute(&self.pool)
        .await
        .map_err(map_query_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            "SELECT username, minutes_remaining FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_query_error)?;

        Ok(rows
            .into_iter()
            .map(|r| UserSummary {
                username: r.username,
                minutes_remaining: r.minutes_remaining,
            })
            .collect())
    }
}
