/*!
 * Metadata persistence for produced clips.
 *
 * This module provides the `MetadataSink` contract the pipeline persists
 * through, plus the shipped SQLite implementation:
 * - One `clip_metadata` row per rendered clip (word mode) or per
 *   (clip, distinct word) pair (sentence mode fan-out)
 * - Records are created once and never mutated
 */

// Allow dead code - query helpers are for library consumers
#![allow(dead_code)]

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

use anyhow::Result;
use async_trait::async_trait;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::ClipRecord;
pub use repository::Repository;

/// Narrow persistence contract the pipeline depends on.
///
/// The serving side of the system owns everything else about the store;
/// this core only ever creates records, one unbatched call at a time.
#[async_trait]
pub trait MetadataSink: Send + Sync {
    /// Persist one clip record, returning its assigned id
    async fn create(&self, record: &ClipRecord) -> Result<i64>;
}
