/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for clip metadata persistence,
 * abstracting away the SQL details and providing type-safe access. The
 * repository is the shipped `MetadataSink` implementation.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};

use super::connection::DatabaseConnection;
use super::models::ClipRecord;
use super::MetadataSink;

/// Repository for clip metadata operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Persist one clip record, returning its assigned id
    pub async fn create_clip(&self, record: &ClipRecord) -> Result<i64> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO clip_metadata (
                        filename, file_url, file_size, duration, format,
                        word, sentence, thumbnail, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                    params![
                        record.filename,
                        record.file_url,
                        record.file_size,
                        record.duration_secs,
                        record.format,
                        record.word,
                        record.sentence,
                        record.thumbnail,
                        record.created_at,
                    ],
                )?;

                let id = conn.last_insert_rowid();
                debug!("Persisted clip record {} as id {}", record.filename, id);
                Ok(id)
            })
            .await
    }

    /// Fetch one clip record by id
    pub async fn get_clip(&self, id: i64) -> Result<Option<ClipRecord>> {
        self.db
            .execute_async(move |conn| Self::get_clip_sync(conn, id))
            .await
    }

    fn get_clip_sync(conn: &Connection, id: i64) -> Result<Option<ClipRecord>> {
        let result = conn
            .query_row(
                r#"
                SELECT id, filename, file_url, file_size, duration, format,
                       word, sentence, thumbnail, created_at
                FROM clip_metadata WHERE id = ?1
                "#,
                [id],
                Self::row_to_record,
            )
            .optional()?;

        Ok(result)
    }

    /// All records keyed by a vocabulary word, newest first
    pub async fn find_by_word(&self, word: &str) -> Result<Vec<ClipRecord>> {
        let word = word.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, filename, file_url, file_size, duration, format,
                           word, sentence, thumbnail, created_at
                    FROM clip_metadata
                    WHERE word = ?1
                    ORDER BY id DESC
                    "#,
                )?;

                let records = stmt
                    .query_map([word], Self::row_to_record)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(records)
            })
            .await
    }

    /// Total number of persisted clip records
    pub async fn count_clips(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM clip_metadata", [], |row| row.get(0))?;
                Ok(count)
            })
            .await
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClipRecord> {
        Ok(ClipRecord {
            id: row.get(0)?,
            filename: row.get(1)?,
            file_url: row.get(2)?,
            file_size: row.get(3)?,
            duration_secs: row.get(4)?,
            format: row.get(5)?,
            word: row.get(6)?,
            sentence: row.get(7)?,
            thumbnail: row.get(8)?,
            created_at: row.get(9)?,
        })
    }
}

#[async_trait]
impl MetadataSink for Repository {
    async fn create(&self, record: &ClipRecord) -> Result<i64> {
        self.create_clip(record).await
    }
}
