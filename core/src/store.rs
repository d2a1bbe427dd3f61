//! SQLite persistence layer — the concrete emission collaborator.
//!
//! RULE: Only this module talks to the database. The engine hands over
//! finished snapshot batches through the SnapshotSink trait and knows
//! nothing about SQL.

use crate::{
    error::SimResult,
    registry::ResourceMap,
    snapshot::{RegionSnapshot, SnapshotSink},
    types::RegionId,
};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: and shared-memory ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        started_at: DateTime<Utc>,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, started_at.to_rfc3339()],
        )?;
        Ok(())
    }

    // ── Snapshots ──────────────────────────────────────────────

    /// Replace the entire snapshot dataset with this batch, atomically.
    /// Either every row of the new batch lands or the old rows survive.
    pub fn replace_snapshots(&mut self, batch: &[RegionSnapshot]) -> SimResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM region_snapshot", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO region_snapshot (
                    region_id, region_name, population, road_blocked,
                    stock_json, needs_json, severity, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for s in batch {
                stmt.execute(params![
                    s.region_id,
                    s.region_name,
                    s.population,
                    s.road_blocked,
                    serde_json::to_string(&s.stock)?,
                    serde_json::to_string(&s.needs)?,
                    s.severity,
                    s.timestamp.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn snapshot_count(&self) -> SimResult<i64> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM region_snapshot", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Read the current dataset back, ordered by region id.
    pub fn load_snapshots(&self) -> SimResult<Vec<RegionSnapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT region_id, region_name, population, road_blocked,
                    stock_json, needs_json, severity, updated_at
             FROM region_snapshot ORDER BY region_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, RegionId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, bool>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut snapshots = Vec::new();
        for row in rows {
            let (region_id, region_name, population, road_blocked, stock, needs, severity, ts) =
                row?;
            let stock: ResourceMap = serde_json::from_str(&stock)?;
            let needs: ResourceMap = serde_json::from_str(&needs)?;
            let timestamp = DateTime::parse_from_rfc3339(&ts)
                .map_err(|e| anyhow!("bad timestamp '{ts}' in region_snapshot: {e}"))?
                .with_timezone(&Utc);
            snapshots.push(RegionSnapshot {
                region_id,
                region_name,
                population,
                road_blocked,
                stock,
                needs,
                severity,
                timestamp,
            });
        }
        Ok(snapshots)
    }
}

impl SnapshotSink for SimStore {
    fn replace_all(&mut self, batch: &[RegionSnapshot]) -> SimResult<()> {
        self.replace_snapshots(batch)
    }
}
