use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

use crate::domain::SubscriberEmail;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("the email address is already subscribed")]
    Duplicate,
    #[error(transparent)]
    Unexpected(#[from] sqlx::Error),
}

/// Inserts a new subscription row. The uniqueness constraint on `email`
/// arbitrates concurrent inserts: exactly one wins, the rest observe
/// [`StoreError::Duplicate`].
#[tracing::instrument(name = "Insert subscription", skip(pool, created_at))]
pub async fn insert_subscription(
    pool: &SqlitePool,
    email: &SubscriberEmail,
    created_at: DateTime<Utc>,
) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO subscriptions (email, created_at) VALUES (?1, ?2)")
        .bind(email.as_ref())
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Millis, true))
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate
            }
            other => StoreError::Unexpected(other),
        })?;
    Ok(())
}

/// Deletes the subscription matching `email` exactly. Returns the number of
/// rows removed; deleting an address that was never stored is a successful
/// zero-count outcome.
#[tracing::instrument(name = "Delete subscription", skip(pool))]
pub async fn delete_subscription(pool: &SqlitePool, email: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE email = ?1")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[tracing::instrument(name = "List subscribed emails", skip(pool))]
pub async fn list_emails(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT email FROM subscriptions")
        .fetch_all(pool)
        .await
}
