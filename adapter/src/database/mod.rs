use shared::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};
use sqlx::{postgres::PgConnectOptions, PgPool};

pub mod model;

fn make_pg_connect_options(cfg: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.username)
        .password(&cfg.password)
        .database(&cfg.database)
}

#[derive(Clone)]
pub struct ConnectionPool(PgPool);

impl ConnectionPool {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }

    pub fn inner_ref(&self) -> &PgPool {
        &self.0
    }

    pub async fn begin(&self) -> AppResult<sqlx::Transaction<'_, sqlx::Postgres>> {
        self.0.begin().await.map_err(AppError::TransactionError)
    }
}

pub fn connect_database_with(cfg: &DatabaseConfig) -> ConnectionPool {
    ConnectionPool(PgPool::connect_lazy_with(make_pg_connect_options(cfg)))
}

/// The overlap-check-then-insert writes rely on SERIALIZABLE
/// isolation instead of application-level locks; two concurrent
/// writers cannot both pass a check against a stale snapshot.
pub(crate) async fn set_transaction_serializable(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> AppResult<()> {
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;
    Ok(())
}

/// Postgres reports a lost serialization race as SQLSTATE 40001; the
/// client is expected to retry, so it surfaces as a conflict rather
/// than an internal error.
pub(crate) fn map_serialization_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("40001") {
            return AppError::ResourceConflict(
                "the slot was taken by a concurrent request, please retry".into(),
            );
        }
    }
    AppError::SpecificOperationError(e)
}
