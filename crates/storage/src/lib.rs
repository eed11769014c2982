use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::protocol::{EndReason, SessionReport};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use tokio::sync::Mutex;

const BEST_SCORE_KEY: &str = "best_score";

/// Used when no database url is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/color_match.db";

/// One finished session as it was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub session_id: i64,
    pub final_score: u32,
    pub best_score: u32,
    pub is_new_best: bool,
    pub reason: EndReason,
    pub duration_secs: u32,
    pub played_at: DateTime<Utc>,
}

/// Durable home for the best score and the session history.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn load_best_score(&self) -> Result<u32>;
    /// Stores `score` unless a higher best is already stored. Returns the stored best.
    async fn save_best_score(&self, score: u32) -> Result<u32>;
    /// Appends the session to history and raises the stored best if it was beaten.
    async fn record_session(&self, report: &SessionReport) -> Result<StoredSession>;
    /// Most recent sessions first.
    async fn recent_sessions(&self, limit: u32) -> Result<Vec<StoredSession>>;
    async fn reset(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct ScoreStorage {
    pool: Pool<Sqlite>,
}

impl ScoreStorage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open score database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run score database migrations")?;
        tracing::debug!(database_url, "score storage ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl ScoreRepository for ScoreStorage {
    async fn load_best_score(&self) -> Result<u32> {
        let row = sqlx::query("SELECT value FROM key_values WHERE key = ?")
            .bind(BEST_SCORE_KEY)
            .fetch_optional(&self.pool)
            .await
            .context("failed to load best score")?;

        match row {
            Some(row) => to_u32(row.get::<i64, _>(0), "best score"),
            None => Ok(0),
        }
    }

    async fn save_best_score(&self, score: u32) -> Result<u32> {
        let row = sqlx::query(
            "INSERT INTO key_values (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET
                value = MAX(key_values.value, excluded.value),
                updated_at = CURRENT_TIMESTAMP
             RETURNING value",
        )
        .bind(BEST_SCORE_KEY)
        .bind(i64::from(score))
        .fetch_one(&self.pool)
        .await
        .context("failed to save best score")?;

        to_u32(row.get::<i64, _>(0), "best score")
    }

    async fn record_session(&self, report: &SessionReport) -> Result<StoredSession> {
        let played_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "INSERT INTO sessions (final_score, best_score, is_new_best, reason, duration_secs, played_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(i64::from(report.final_score))
        .bind(i64::from(report.best_score))
        .bind(report.is_new_best)
        .bind(report.reason.as_str())
        .bind(i64::from(report.duration_secs))
        .bind(played_at)
        .fetch_one(&mut *tx)
        .await
        .context("failed to insert session")?;
        let session_id = row.get::<i64, _>(0);

        sqlx::query(
            "INSERT INTO key_values (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET
                value = MAX(key_values.value, excluded.value),
                updated_at = CURRENT_TIMESTAMP",
        )
        .bind(BEST_SCORE_KEY)
        .bind(i64::from(report.best_score))
        .execute(&mut *tx)
        .await
        .context("failed to raise best score")?;

        tx.commit().await?;

        Ok(StoredSession {
            session_id,
            final_score: report.final_score,
            best_score: report.best_score,
            is_new_best: report.is_new_best,
            reason: report.reason,
            duration_secs: report.duration_secs,
            played_at,
        })
    }

    async fn recent_sessions(&self, limit: u32) -> Result<Vec<StoredSession>> {
        let rows = sqlx::query(
            "SELECT id, final_score, best_score, is_new_best, reason, duration_secs, played_at
             FROM sessions
             ORDER BY played_at DESC, id DESC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .context("failed to list sessions")?;

        rows.iter().map(stored_session_from_row).collect()
    }

    async fn reset(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM sessions").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM key_values WHERE key = ?")
            .bind(BEST_SCORE_KEY)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

fn stored_session_from_row(row: &SqliteRow) -> Result<StoredSession> {
    Ok(StoredSession {
        session_id: row.try_get("id")?,
        final_score: to_u32(row.try_get("final_score")?, "final score")?,
        best_score: to_u32(row.try_get("best_score")?, "best score")?,
        is_new_best: row.try_get("is_new_best")?,
        reason: parse_end_reason(&row.try_get::<String, _>("reason")?)?,
        duration_secs: to_u32(row.try_get("duration_secs")?, "duration")?,
        played_at: row.try_get("played_at")?,
    })
}

fn parse_end_reason(raw: &str) -> Result<EndReason> {
    match raw {
        "time_up" => Ok(EndReason::TimeUp),
        "requested" => Ok(EndReason::Requested),
        other => Err(anyhow!("unknown session end reason '{other}'")),
    }
}

fn to_u32(value: i64, what: &str) -> Result<u32> {
    u32::try_from(value).with_context(|| format!("stored {what} out of range: {value}"))
}

#[derive(Default)]
struct MemoryState {
    best_score: u32,
    sessions: Vec<StoredSession>,
}

/// Process-lifetime repository, used when persistence is disabled or unavailable.
#[derive(Default)]
pub struct MemoryScoreStore {
    state: Mutex<MemoryState>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreRepository for MemoryScoreStore {
    async fn load_best_score(&self) -> Result<u32> {
        Ok(self.state.lock().await.best_score)
    }

    async fn save_best_score(&self, score: u32) -> Result<u32> {
        let mut state = self.state.lock().await;
        state.best_score = state.best_score.max(score);
        Ok(state.best_score)
    }

    async fn record_session(&self, report: &SessionReport) -> Result<StoredSession> {
        let mut state = self.state.lock().await;
        state.best_score = state.best_score.max(report.best_score);

        let session = StoredSession {
            session_id: state.sessions.len() as i64 + 1,
            final_score: report.final_score,
            best_score: report.best_score,
            is_new_best: report.is_new_best,
            reason: report.reason,
            duration_secs: report.duration_secs,
            played_at: Utc::now(),
        };
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn recent_sessions(&self, limit: u32) -> Result<Vec<StoredSession>> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn reset(&self) -> Result<()> {
        *self.state.lock().await = MemoryState::default();
        Ok(())
    }
}

/// Opens the SQLite store, falling back to [`MemoryScoreStore`] if it cannot be opened.
pub async fn open_or_memory(raw_database_url: &str) -> Arc<dyn ScoreRepository> {
    let opened = match prepare_database_url(raw_database_url) {
        Ok(database_url) => ScoreStorage::new(&database_url).await,
        Err(err) => Err(err),
    };

    match opened {
        Ok(storage) => Arc::new(storage),
        Err(err) => {
            tracing::warn!(
                database_url = raw_database_url,
                "score persistence unavailable, keeping scores in memory: {err:#}"
            );
            Arc::new(MemoryScoreStore::new())
        }
    }
}

/// Turns a plain path or partial sqlite url into a `sqlite://` url and creates its parent
/// directory.
pub fn prepare_database_url(raw_database_url: &str) -> Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_sqlite_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
