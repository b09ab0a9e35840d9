//! Cycle log: append-only `SQLite` store of completed cycle records.
//!
//! One row per cycle, keyed by cycle number. The full record is kept as
//! JSON next to a few columns the reporting side can query directly.

use rusqlite::{Connection, OptionalExtension};

use crate::model::CycleResult;

use super::{Result, Storage, StorageError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS cycle (
    number INTEGER PRIMARY KEY,
    started_at TEXT NOT NULL,
    duration_seconds REAL NOT NULL,
    tasks_generated INTEGER NOT NULL,
    ready_tasks_found INTEGER NOT NULL,
    status TEXT NOT NULL,
    record TEXT NOT NULL
)";

impl Storage {
    /// Appends a completed cycle. A number can only be recorded once.
    pub fn append_cycle(&self, result: &CycleResult) -> Result<()> {
        let conn = self.open_cycles()?;
        let number = to_sql_number(result.cycle_number)?;
        let record = serde_json::to_string(result)?;
        let rows = conn.execute(
            "INSERT OR IGNORE INTO cycle
             (number, started_at, duration_seconds, tasks_generated, ready_tasks_found, status, record)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                number,
                result.cycle_start.to_string(),
                result.duration_seconds,
                to_sql_number(result.tasks_generated as u64)?,
                to_sql_number(result.ready_tasks_found as u64)?,
                result.status.as_str(),
                record,
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::CycleAlreadyRecorded(result.cycle_number));
        }
        Ok(())
    }

    /// Loads a single cycle record.
    pub fn load_cycle(&self, number: u64) -> Result<CycleResult> {
        let conn = self.open_cycles()?;
        let record: Option<String> = conn
            .query_row(
                "SELECT record FROM cycle WHERE number = ?1",
                [to_sql_number(number)?],
                |row| row.get(0),
            )
            .optional()?;
        let record = record.ok_or(StorageError::CycleNotFound(number))?;
        parse_record(number, &record)
    }

    /// Lists every recorded cycle in creation order.
    pub fn list_cycles(&self) -> Result<Vec<CycleResult>> {
        let conn = self.open_cycles()?;
        let mut stmt = conn.prepare("SELECT number, record FROM cycle ORDER BY number")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut cycles = Vec::new();
        for row in rows {
            let (number, record) = row?;
            let number = u64::try_from(number)
                .map_err(|e| StorageError::Corrupt(format!("invalid cycle number: {e}")))?;
            cycles.push(parse_record(number, &record)?);
        }
        Ok(cycles)
    }

    /// The highest recorded cycle number, if any cycle was recorded.
    pub fn last_cycle_number(&self) -> Result<Option<u64>> {
        let conn = self.open_cycles()?;
        let max: Option<i64> = conn.query_row("SELECT MAX(number) FROM cycle", [], |row| row.get(0))?;
        max.map(|n| {
            u64::try_from(n)
                .map_err(|e| StorageError::Corrupt(format!("invalid cycle number: {e}")))
        })
        .transpose()
    }

    /// Opens the cycle log, creating the table on first use.
    fn open_cycles(&self) -> Result<Connection> {
        let conn = Connection::open(self.cycles_db_path())?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }
}

fn parse_record(number: u64, record: &str) -> Result<CycleResult> {
    serde_json::from_str(record)
        .map_err(|e| StorageError::Corrupt(format!("invalid record for cycle {number}: {e}")))
}

fn to_sql_number(n: u64) -> Result<i64> {
    i64::try_from(n).map_err(|e| StorageError::Corrupt(format!("number out of range: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use tempfile::TempDir;

    use crate::model::{CycleStatus, LearningReport};

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("state")).unwrap();
        (dir, storage)
    }

    fn sample_cycle(number: u64) -> CycleResult {
        CycleResult {
            cycle_number: number,
            cycle_start: Timestamp::new(1_700_000_000 + i64::try_from(number).unwrap(), 0)
                .unwrap(),
            duration_seconds: 1.5,
            learning_report: LearningReport {
                generated_at: Timestamp::new(1_700_000_000, 0).unwrap(),
                new_items: 3,
                queued: 2,
                patterns_detected: 1,
                top_themes: vec!["ai".into()],
                recommendations: vec![],
            },
            tasks_generated: 2,
            tasks_published: 2,
            ready_tasks_found: 0,
            selected: None,
            claimed: false,
            status: CycleStatus::Completed,
        }
    }

    #[test]
    fn append_and_load_cycle() {
        let (_dir, storage) = test_storage();
        let cycle = sample_cycle(1);

        storage.append_cycle(&cycle).unwrap();
        let loaded = storage.load_cycle(1).unwrap();

        assert_eq!(loaded, cycle);
    }

    #[test]
    fn append_duplicate_cycle_fails() {
        let (_dir, storage) = test_storage();
        storage.append_cycle(&sample_cycle(4)).unwrap();

        let err = storage.append_cycle(&sample_cycle(4)).unwrap_err();
        assert!(matches!(err, StorageError::CycleAlreadyRecorded(4)));
    }

    #[test]
    fn load_nonexistent_cycle_fails() {
        let (_dir, storage) = test_storage();
        let err = storage.load_cycle(9).unwrap_err();
        assert!(matches!(err, StorageError::CycleNotFound(9)));
    }

    #[test]
    fn list_cycles_in_number_order() {
        let (_dir, storage) = test_storage();

        // Append out of order to verify ordering.
        storage.append_cycle(&sample_cycle(2)).unwrap();
        storage.append_cycle(&sample_cycle(1)).unwrap();
        storage.append_cycle(&sample_cycle(3)).unwrap();

        let numbers: Vec<u64> = storage
            .list_cycles()
            .unwrap()
            .iter()
            .map(|c| c.cycle_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn last_cycle_number_empty_and_filled() {
        let (_dir, storage) = test_storage();
        assert_eq!(storage.last_cycle_number().unwrap(), None);

        storage.append_cycle(&sample_cycle(7)).unwrap();
        storage.append_cycle(&sample_cycle(3)).unwrap();
        assert_eq!(storage.last_cycle_number().unwrap(), Some(7));
    }
}
