//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every vault operation (init, add, delete, unlock,
//! reveal, ...) in a local SQLite database at `<data_dir>/audit.db`.
//! Entries name the account, the record id and the site, never a
//! plaintext or any key material.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
#[cfg(feature = "audit-log")]
use rusqlite::Connection;

use crate::errors::Result;
#[cfg(feature = "audit-log")]
use crate::errors::VaultError;

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub account: String,
    pub record_id: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
#[cfg(feature = "audit-log")]
pub struct AuditLog {
    conn: Connection,
}

#[cfg(feature = "audit-log")]
impl AuditLog {
    /// Open (or create) the audit database at `<data_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(data_dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(data_dir);
        let conn = Connection::open(&db_path).ok()?;

        // Set restrictive permissions on the audit database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                account     TEXT NOT NULL,
                record_id   TEXT,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget — errors are silently ignored.
    pub fn log(
        &self,
        operation: &str,
        account: &str,
        record_id: Option<&str>,
        details: Option<&str>,
    ) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, account, record_id, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, account, record_id, details],
        );
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        // An epoch lower bound keeps a single statement for both cases.
        let since = since
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
            .to_rfc3339();

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, account, record_id, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| VaultError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    account: row.get(3)?,
                    record_id: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| VaultError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| VaultError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }
}

/// Audit logging compiled out: every operation is a no-op.
#[cfg(not(feature = "audit-log"))]
pub struct AuditLog;

#[cfg(not(feature = "audit-log"))]
impl AuditLog {
    pub fn open(_data_dir: &Path) -> Option<Self> {
        None
    }

    pub fn log(
        &self,
        _operation: &str,
        _account: &str,
        _record_id: Option<&str>,
        _details: Option<&str>,
    ) {
    }

    pub fn query(&self, _limit: usize, _since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        Ok(Vec::new())
    }
}

impl AuditLog {
    /// Return the path to the audit database (for testing/display).
    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join("audit.db")
    }
}

/// Convenience helper: log an audit event into `data_dir`.
///
/// Creates the directory if needed, logs the event, and silently ignores
/// any errors. Safe to call from any command — it never fails the parent
/// operation.
pub fn log_audit(
    data_dir: &Path,
    account: &str,
    op: &str,
    record_id: Option<&str>,
    details: Option<&str>,
) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }

    if let Some(audit) = AuditLog::open(data_dir) {
        audit.log(op, account, record_id, details);
    }
}
