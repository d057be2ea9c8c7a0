//! Persistence gateway: one lazily established connection pool per process.

use std::sync::Arc;
use std::time::Duration;

use flashpoll_common::{AppError, AppResult, config::DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::OnceCell;
use tracing::{info, log::LevelFilter, warn};

/// Shared handle to the database.
///
/// The first [`acquire`](Self::acquire) call connects; every later call
/// returns the same pool. Callers racing on the first call all wait on the
/// same in-flight attempt, so at most one pool is ever opened. A failed
/// attempt is not cached; the error goes back to the caller and the next
/// `acquire` tries again.
#[derive(Clone)]
pub struct DbGateway {
    inner: Arc<Inner>,
}

struct Inner {
    options: Option<ConnectOptions>,
    conn: OnceCell<Arc<DatabaseConnection>>,
}

impl DbGateway {
    /// Create a gateway that connects on first use.
    #[must_use]
    pub fn new(config: &DatabaseConfig) -> Self {
        let mut opt = ConnectOptions::new(&config.url);

        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);

        Self {
            inner: Arc::new(Inner {
                options: Some(opt),
                conn: OnceCell::new(),
            }),
        }
    }

    /// Create a gateway around an existing connection.
    #[must_use]
    pub fn with_connection(conn: DatabaseConnection) -> Self {
        Self::from_shared(Arc::new(conn))
    }

    /// Create a gateway around an existing shared connection.
    #[must_use]
    pub fn from_shared(conn: Arc<DatabaseConnection>) -> Self {
        Self {
            inner: Arc::new(Inner {
                options: None,
                conn: OnceCell::new_with(Some(conn)),
            }),
        }
    }

    /// Return the connected handle, connecting first if needed.
    pub async fn acquire(&self) -> AppResult<Arc<DatabaseConnection>> {
        self.inner
            .conn
            .get_or_try_init(|| self.connect())
            .await
            .map(Arc::clone)
    }

    /// Acquire the handle and check the database answers.
    pub async fn ping(&self) -> AppResult<()> {
        let db = self.acquire().await?;
        db.ping()
            .await
            .map_err(|e| AppError::Connection(e.to_string()))
    }

    async fn connect(&self) -> AppResult<Arc<DatabaseConnection>> {
        let opt = self
            .inner
            .options
            .clone()
            .ok_or_else(|| AppError::Connection("No connection options configured".to_string()))?;

        match Database::connect(opt).await {
            Ok(conn) => {
                info!("Connected to database");
                Ok(Arc::new(conn))
            }
            Err(e) => {
                warn!(error = %e, "Database connection failed");
                Err(AppError::Connection(e.to_string()))
            }
        }
    }
}
