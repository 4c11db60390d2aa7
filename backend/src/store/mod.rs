//! Persistence for certificates.
//!
//! A single [`CertificateStore`] is opened in `main.rs` and shared with every
//! handler through `web::Data`; tests open an in-memory one. Uploaded images
//! live beside it in an [`UploadDir`].

mod uploads;

pub use uploads::{UploadDir, UPLOADS_ROUTE};

use common::model::certificate::Certificate;
use common::requests::CertificateForm;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Certificate number already exists")]
    Duplicate,
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("upload error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database connection lock was poisoned")]
    Poisoned,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS certificates (
    id                 TEXT PRIMARY KEY,
    certificate_number TEXT NOT NULL UNIQUE,
    stone_type         TEXT NOT NULL,
    carat              TEXT NOT NULL,
    gross_weight       TEXT,
    color              TEXT NOT NULL,
    clarity            TEXT NOT NULL,
    cut                TEXT NOT NULL,
    notes              TEXT,
    file_path          TEXT,
    issued_date        TEXT NOT NULL DEFAULT (datetime('now'))
)";

const COLUMNS: &str = "id, certificate_number, stone_type, carat, gross_weight, color, \
                       clarity, cut, notes, file_path, issued_date";

pub struct CertificateStore {
    conn: Mutex<Connection>,
}

impl CertificateStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(CertificateStore {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Inserts a certificate. Fails with [`StoreError::Duplicate`] when the
    /// number is already taken.
    pub fn create(
        &self,
        form: &CertificateForm,
        file_path: Option<String>,
    ) -> Result<Certificate, StoreError> {
        let conn = self.conn()?;
        let id = uuid::Uuid::new_v4().to_string();
        let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());

        let inserted = conn.execute(
            "INSERT INTO certificates
                (id, certificate_number, stone_type, carat, gross_weight, color, clarity, cut, notes, file_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                form.certificate_number,
                form.stone_type,
                form.carat,
                optional(&form.gross_weight),
                form.color,
                form.clarity,
                form.cut,
                optional(&form.notes),
                file_path,
            ],
        );
        match inserted {
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(StoreError::Duplicate);
            }
            other => other?,
        };

        debug!("Stored certificate {} as {}", form.certificate_number, id);
        let certificate = conn.query_row(
            &format!("SELECT {} FROM certificates WHERE id = ?1", COLUMNS),
            params![id],
            certificate_from_row,
        )?;
        Ok(certificate)
    }

    pub fn find_by_number(&self, number: &str) -> Result<Option<Certificate>, StoreError> {
        let conn = self.conn()?;
        let certificate = conn
            .query_row(
                &format!("SELECT {} FROM certificates WHERE certificate_number = ?1", COLUMNS),
                params![number],
                certificate_from_row,
            )
            .optional()?;
        Ok(certificate)
    }

    /// All certificates, newest first.
    pub fn list(&self) -> Result<Vec<Certificate>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM certificates ORDER BY issued_date DESC, rowid DESC",
            COLUMNS
        ))?;
        let certificates = stmt
            .query_map([], certificate_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(certificates)
    }

    /// Deletes one certificate. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self
            .conn()?
            .execute("DELETE FROM certificates WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    /// Deletes every certificate. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, StoreError> {
        Ok(self.conn()?.execute("DELETE FROM certificates", [])?)
    }
}

fn certificate_from_row(row: &Row<'_>) -> rusqlite::Result<Certificate> {
    Ok(Certificate {
        id: row.get(0)?,
        certificate_number: row.get(1)?,
        stone_type: row.get(2)?,
        carat: row.get(3)?,
        gross_weight: row.get(4)?,
        color: row.get(5)?,
        clarity: row.get(6)?,
        cut: row.get(7)?,
        notes: row.get(8)?,
        file_path: row.get(9)?,
        issued_date: row.get(10)?,
    })
}
