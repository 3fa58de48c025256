//! Application state and the SQLite license store

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use pdfmate_license::{LicenseRecord, LicenseStore, StoreError};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

pub struct AppState {
    pub store: SqliteLicenseStore,
}

impl AppState {
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::info!("Connecting to database: {}", database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        run_migrations(&pool).await?;

        Ok(Self {
            store: SqliteLicenseStore { pool },
        })
    }
}

/// Default database location under the platform data directory
pub fn default_database_url() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pdfmate");
    std::fs::create_dir_all(&data_dir).ok();
    format!("sqlite:{}/licenses.db?mode=rwc", data_dir.display())
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS licenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'UNUSED' CHECK (status IN ('UNUSED', 'USED')),
            activated_at TEXT,
            expires_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Migrations complete");
    Ok(())
}

/// License row as stored
#[derive(Debug, Clone, FromRow)]
struct DbLicense {
    id: i64,
    code: String,
    status: String,
    activated_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<DbLicense> for LicenseRecord {
    type Error = StoreError;

    fn try_from(row: DbLicense) -> Result<Self, Self::Error> {
        Ok(LicenseRecord {
            id: row.id,
            code: row.code,
            status: row.status.parse().map_err(StoreError::Corrupt)?,
            activated_at: row.activated_at,
            expires_at: row.expires_at,
        })
    }
}

#[derive(Clone)]
pub struct SqliteLicenseStore {
    pool: SqlitePool,
}

impl SqliteLicenseStore {
    /// Insert unused codes, skipping any already present.
    /// Returns the number of new rows.
    pub async fn provision(&self, codes: &[String]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;
        let mut inserted = 0;
        for code in codes {
            let result = sqlx::query("INSERT INTO licenses (code) VALUES (?) ON CONFLICT (code) DO NOTHING")
                .bind(code)
                .execute(&mut *tx)
                .await
                .map_err(unavailable)?;
            inserted += result.rows_affected();
        }
        tx.commit().await.map_err(unavailable)?;
        Ok(inserted)
    }
}

impl LicenseStore for SqliteLicenseStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<LicenseRecord>, StoreError> {
        let row: Option<DbLicense> = sqlx::query_as(
            r#"
            SELECT id, code, status, activated_at, expires_at
            FROM licenses
            WHERE code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(LicenseRecord::try_from).transpose()
    }

    async fn mark_used_if_unused(
        &self,
        id: i64,
        activated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE licenses
            SET status = 'USED', activated_at = ?, expires_at = ?
            WHERE id = ? AND status = 'UNUSED'
            "#,
        )
        .bind(activated_at)
        .bind(expires_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(result.rows_affected() == 1)
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfmate_license::LicenseStatus;

    async fn temp_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let state = AppState::connect(&url).await.unwrap();
        (dir, state)
    }

    #[tokio::test]
    async fn test_provision_skips_existing_codes() {
        let (_dir, state) = temp_state().await;
        let codes = vec!["LP-0000-0001".to_string(), "LP-0000-0002".to_string()];

        assert_eq!(state.store.provision(&codes).await.unwrap(), 2);
        assert_eq!(state.store.provision(&codes).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_conditional_update_applies_once() {
        let (_dir, state) = temp_state().await;
        state
            .store
            .provision(&["LP-0000-0001".to_string()])
            .await
            .unwrap();

        let record = state
            .store
            .find_by_code("LP-0000-0001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, LicenseStatus::Unused);
        assert_eq!(record.activated_at, None);

        let now = Utc::now();
        let later = now + chrono::Duration::days(365);
        assert!(state
            .store
            .mark_used_if_unused(record.id, now, later)
            .await
            .unwrap());
        assert!(!state
            .store
            .mark_used_if_unused(record.id, later, later)
            .await
            .unwrap());

        let record = state
            .store
            .find_by_code("LP-0000-0001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, LicenseStatus::Used);
        assert_eq!(record.expires_at, Some(later));
    }
}
