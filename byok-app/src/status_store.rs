//! Status-check bookkeeping, persisted in sqlite.
//!
//! This is unrelated to dispatch: clients ping it to record liveness checks.
//! Writes go through `spawn_blocking` so rusqlite never blocks the runtime.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: Uuid,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone)]
pub struct StatusStore {
    conn: Arc<Mutex<Connection>>,
}

impl StatusStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create data dir {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open status db {}", path.display()))?;
        Self::from_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory().context("open in-memory status db")?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
CREATE TABLE IF NOT EXISTS status_checks (
    id TEXT PRIMARY KEY,
    client_name TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_status_checks_timestamp ON status_checks(timestamp);
"#,
        )
        .context("init status schema")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub async fn create(&self, client_name: String) -> Result<StatusCheck> {
        let check = StatusCheck {
            id: Uuid::new_v4(),
            client_name,
            timestamp: Utc::now(),
        };
        let conn = self.conn.clone();
        let row = check.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| anyhow::anyhow!("status db lock poisoned"))?;
            conn.execute(
                "INSERT INTO status_checks (id, client_name, timestamp) VALUES (?1, ?2, ?3)",
                params![row.id.to_string(), row.client_name, row.timestamp.to_rfc3339()],
            )
            .context("insert status check")?;
            Ok::<_, anyhow::Error>(())
        })
        .await??;
        Ok(check)
    }

    pub async fn list_recent(&self, limit: usize) -> Result<Vec<StatusCheck>> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| anyhow::anyhow!("status db lock poisoned"))?;
            let mut stmt = conn.prepare(
                "SELECT id, client_name, timestamp FROM status_checks \
                 ORDER BY timestamp DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;

            let mut out = Vec::new();
            for row in rows {
                let (id, client_name, timestamp) = row?;
                out.push(StatusCheck {
                    id: Uuid::parse_str(&id).context("parse status check id")?,
                    client_name,
                    timestamp: DateTime::parse_from_rfc3339(&timestamp)
                        .context("parse status check timestamp")?
                        .with_timezone(&Utc),
                });
            }
            Ok(out)
        })
        .await?
    }
}
