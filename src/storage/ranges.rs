//! Persistent IP range cache.
//!
//! Rows are keyed by their own bounds; a lookup returns the narrowest stored
//! range containing the address. Entries never expire.

use std::sync::Arc;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::ipranges::IpRange;

/// SQLite-backed store of resolved ranges.
#[derive(Debug, Clone)]
pub struct RangeCache {
    pool: Arc<SqlitePool>,
}

fn bound(row: &SqliteRow, column: &str) -> Result<u32, DatabaseError> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value).map_err(|e| DatabaseError::SqlError(sqlx::Error::Decode(Box::new(e))))
}

fn row_to_range(row: &SqliteRow) -> Result<IpRange, DatabaseError> {
    Ok(IpRange {
        start_ip: bound(row, "start_ip")?,
        end_ip: bound(row, "end_ip")?,
        netname: row.try_get("netname")?,
        description: row.try_get("descr")?,
        country: row.try_get("country")?,
    })
}

impl RangeCache {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    /// Returns a stored range with `start_ip <= ip <= end_ip`, preferring the
    /// narrowest when several overlap.
    pub async fn get(&self, ip: u32) -> Result<Option<IpRange>, DatabaseError> {
        let row = sqlx::query(
            "SELECT start_ip, end_ip, netname, descr, country
             FROM ip_ranges
             WHERE start_ip <= ? AND end_ip >= ?
             ORDER BY end_ip - start_ip ASC
             LIMIT 1",
        )
        .bind(i64::from(ip))
        .bind(i64::from(ip))
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.as_ref().map(row_to_range).transpose()
    }

    /// Stores `range`, replacing any row with the same bounds.
    pub async fn put(&self, range: &IpRange) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT OR REPLACE INTO ip_ranges (start_ip, end_ip, netname, descr, country)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(i64::from(range.start_ip))
        .bind(i64::from(range.end_ip))
        .bind(&range.netname)
        .bind(&range.description)
        .bind(&range.country)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    /// All cached ranges ordered by start address.
    pub async fn list(&self) -> Result<Vec<IpRange>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT start_ip, end_ip, netname, descr, country
             FROM ip_ranges
             ORDER BY start_ip, end_ip",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.iter().map(row_to_range).collect()
    }

    /// Deletes every cached range, returning how many were removed.
    pub async fn clear(&self) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM ip_ranges")
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected())
    }
}
