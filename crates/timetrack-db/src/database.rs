use std::future::Future;
use std::time::Duration;

use sqlx::{
    postgres::{PgArguments, PgPoolOptions, PgRow},
    Arguments, FromRow, Pool, Postgres,
};
use timetrack_core::{BuiltQuery, QueryArg};
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

/// Pool and per-statement limits.
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// `None` lets statements run until the caller drops them.
    pub statement_timeout: Option<Duration>,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(3),
            statement_timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// Storage gateway: the only component that talks to Postgres.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Postgres>,
    statement_timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl Database {
    /// Create new database connection
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(database_url, DatabaseOptions::default()).await
    }

    pub async fn connect(database_url: &str, options: DatabaseOptions) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect(database_url)
            .await?;

        tracing::info!(
            max_connections = options.max_connections,
            "Connected to database"
        );

        Ok(Self {
            pool,
            statement_timeout: options.statement_timeout,
            cancel: None,
        })
    }

    /// Build the pool without opening a connection until first use.
    pub fn connect_lazy(database_url: &str, options: DatabaseOptions) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect_lazy(database_url)?;

        Ok(Self {
            pool,
            statement_timeout: options.statement_timeout,
            cancel: None,
        })
    }

    /// Handle sharing this pool whose statements abort once `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            pool: self.pool.clone(),
            statement_timeout: self.statement_timeout,
            cancel: Some(token),
        }
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                passport_serie BIGINT NOT NULL,
                passport_number BIGINT NOT NULL,
                surname TEXT NOT NULL DEFAULT '',
                name TEXT NOT NULL DEFAULT '',
                patronymic TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                UNIQUE (passport_serie, passport_number)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                description TEXT NOT NULL,
                start_time TIMESTAMPTZ,
                end_time TIMESTAMPTZ
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id)",
        ];

        for statement in statements {
            self.guard("init_schema", sqlx::query(statement).execute(&self.pool))
                .await?;
        }

        tracing::info!("Database schema ready");
        Ok(())
    }

    // ========================================================================
    // Statement execution
    // ========================================================================

    /// Run an `INSERT ... RETURNING id` and return the new id.
    pub async fn insert_returning_id(&self, query: BuiltQuery) -> Result<i64> {
        tracing::debug!(sql = %query.sql, args = query.args.len(), "insert");
        let BuiltQuery { sql, args } = query;

        self.guard(
            "insert_returning_id",
            sqlx::query_scalar_with::<_, i64, _>(&sql, arguments(args)).fetch_one(&self.pool),
        )
        .await
    }

    pub async fn query_many<T>(&self, query: BuiltQuery) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %query.sql, args = query.args.len(), "query");
        let BuiltQuery { sql, args } = query;

        self.guard(
            "query_many",
            sqlx::query_as_with::<_, T, _>(&sql, arguments(args)).fetch_all(&self.pool),
        )
        .await
    }

    /// Single boolean result, e.g. `SELECT EXISTS (...)`.
    pub async fn query_flag(&self, query: BuiltQuery) -> Result<bool> {
        tracing::debug!(sql = %query.sql, args = query.args.len(), "query");
        let BuiltQuery { sql, args } = query;

        self.guard(
            "query_flag",
            sqlx::query_scalar_with::<_, bool, _>(&sql, arguments(args)).fetch_one(&self.pool),
        )
        .await
    }

    /// Run an `UPDATE`/`DELETE` and return the number of affected rows.
    pub async fn execute(&self, query: BuiltQuery) -> Result<u64> {
        tracing::debug!(sql = %query.sql, args = query.args.len(), "execute");
        let BuiltQuery { sql, args } = query;

        let result = self
            .guard(
                "execute",
                sqlx::query_with(&sql, arguments(args)).execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected())
    }

    /// Await `statement`, aborting on the statement timeout or on cancellation.
    ///
    /// Aborting drops the in-flight sqlx future.
    async fn guard<T, F>(&self, operation: &'static str, statement: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        let bounded = async {
            match self.statement_timeout {
                Some(limit) => match tokio::time::timeout(limit, statement).await {
                    Ok(result) => result.map_err(Error::from),
                    Err(_) => Err(Error::Cancelled(format!(
                        "{} exceeded {:?}",
                        operation, limit
                    ))),
                },
                None => statement.await.map_err(Error::from),
            }
        };

        let result = match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        Err(Error::Cancelled(format!("{} cancelled by caller", operation)))
                    }
                    result = bounded => result,
                }
            }
            None => bounded.await,
        };

        if let Err(ref e) = result {
            tracing::warn!(operation, error = %e, "statement failed");
        }

        result
    }
}

fn arguments(args: Vec<QueryArg>) -> PgArguments {
    let mut out = PgArguments::default();
    for arg in args {
        match arg {
            QueryArg::Int(value) => out.add(value),
            QueryArg::Text(value) => out.add(value),
            QueryArg::Timestamp(value) => out.add(value),
        }
    }
    out
}
