use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::domain::{CaptureRecord, Watermark};

use super::schema::SCHEMA;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single SQLite-backed connection serving as watermark store, L1 dedup
/// index, and capture stager. Not `Sync`; callers share it behind a mutex
/// or open one per task — SQLite serializes writers anyway, so there is no
/// benefit to a connection pool here.
pub struct Ledger {
    conn: Connection,
}

impl Ledger {
    /// Open (creating if absent) the ledger at `path` and apply its schema.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// An in-memory ledger, used by tests that don't need a file on disk.
    pub fn open_in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // -- WatermarkStore ---------------------------------------------------

    pub fn get_watermark(&self, key: &str) -> Result<Option<Watermark>, LedgerError> {
        self.conn
            .query_row(
                "SELECT key, value, updated_at FROM sync_state WHERE key = ?1",
                params![key],
                |row| {
                    let key: String = row.get(0)?;
                    let value: String = row.get(1)?;
                    let updated_at: String = row.get(2)?;
                    Ok((key, value, updated_at))
                },
            )
            .optional()?
            .map(|(key, value, updated_at)| {
                let updated_at = updated_at
                    .parse::<DateTime<Utc>>()
                    .map_err(|e| rusqlite::Error::InvalidColumnType(
                        2,
                        format!("updated_at not rfc3339: {e}"),
                        rusqlite::types::Type::Text,
                    ))?;
                Ok(Watermark {
                    key,
                    value,
                    updated_at,
                })
            })
            .transpose()
    }

    /// Upsert the named cursor. `now` is the ledger's own clock rather than
    /// the caller's, so the cursor and the rows it gates stay on one
    /// authoritative timeline.
    pub fn set_watermark(&self, key: &str, value: DateTime<Utc>, now: DateTime<Utc>) -> Result<Watermark, LedgerError> {
        let watermark = Watermark::new(key, value, now);
        self.conn.execute(
            "INSERT INTO sync_state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![watermark.key, watermark.value, now.to_rfc3339()],
        )?;
        Ok(watermark)
    }

    // -- DedupGate L1 -------------------------------------------------------

    /// True iff a capture already exists for this `channel`/`channel_native_id`
    /// pair — the cheap, path-based dedup check, tried before the more
    /// expensive content fingerprint.
    pub fn exists_by_channel_native_id(
        &self,
        channel: &str,
        channel_native_id: &str,
    ) -> Result<bool, LedgerError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM captures
             WHERE json_extract(meta_json, '$.channel') = ?1
               AND json_extract(meta_json, '$.channel_native_id') = ?2",
            params![channel, channel_native_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // -- DedupGate L2 (content fingerprint) --------------------------------

    /// True iff a capture with this content fingerprint already exists,
    /// regardless of path — the expensive, content-based dedup check.
    pub fn exists_by_fingerprint(&self, audio_fp: &str) -> Result<bool, LedgerError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM captures WHERE json_extract(meta_json, '$.audio_fp') = ?1",
            params![audio_fp],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // -- CaptureStager ------------------------------------------------------

    /// Insert `record`, ignoring the write if its `id` is already present.
    /// Returns `true` if a new row was inserted.
    pub fn stage_capture(&self, record: &CaptureRecord) -> Result<bool, LedgerError> {
        let meta_json = serde_json::to_string(&record.meta)?;
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO captures
                (id, source, status, meta_json, raw_content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.source,
                record.status,
                meta_json,
                record.raw_content,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(changed > 0)
    }

    /// The ledger's own clock, used to stamp watermark advances so the
    /// cursor and the rows it gates stay on one authoritative timeline.
    pub fn now(&self) -> Result<DateTime<Utc>, LedgerError> {
        let text: String = self.conn.query_row(
            "SELECT strftime('%Y-%m-%dT%H:%M:%SZ', 'now')",
            (),
            |row| row.get(0),
        )?;
        text.parse::<DateTime<Utc>>()
            .map_err(|_| rusqlite::Error::InvalidColumnType(0, "now()".into(), rusqlite::types::Type::Text).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CaptureRecord;
    use chrono::TimeZone;

    fn sample_record(id: &str, channel_native_id: &str, audio_fp: &str) -> CaptureRecord {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        CaptureRecord::stage(id.to_string(), channel_native_id.to_string(), audio_fp.to_string(), now)
    }

    #[test]
    fn staging_is_idempotent_on_id() {
        let ledger = Ledger::open_in_memory().unwrap();
        let record = sample_record("01J-A", "/voice/A.m4a", "fp-a");

        assert!(ledger.stage_capture(&record).unwrap());
        assert!(!ledger.stage_capture(&record).unwrap());
    }

    #[test]
    fn l1_dedup_matches_on_channel_and_native_id() {
        let ledger = Ledger::open_in_memory().unwrap();
        let record = sample_record("01J-A", "/voice/A.m4a", "fp-a");
        ledger.stage_capture(&record).unwrap();

        assert!(ledger
            .exists_by_channel_native_id("voice", "/voice/A.m4a")
            .unwrap());
        assert!(!ledger
            .exists_by_channel_native_id("voice", "/voice/B.m4a")
            .unwrap());
    }

    #[test]
    fn l2_dedup_matches_on_fingerprint_regardless_of_path() {
        let ledger = Ledger::open_in_memory().unwrap();
        let record = sample_record("01J-A", "/voice/A.m4a", "fp-shared");
        ledger.stage_capture(&record).unwrap();

        assert!(ledger.exists_by_fingerprint("fp-shared").unwrap());
        assert!(!ledger.exists_by_fingerprint("fp-other").unwrap());
    }

    #[test]
    fn watermark_upsert_overwrites_prior_value() {
        let ledger = Ledger::open_in_memory().unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();

        ledger.set_watermark("voice_last_poll", t1, t1).unwrap();
        ledger.set_watermark("voice_last_poll", t2, t2).unwrap();

        let watermark = ledger.get_watermark("voice_last_poll").unwrap().unwrap();
        assert_eq!(watermark.as_instant(), Some(t2));
    }

    #[test]
    fn missing_watermark_is_none() {
        let ledger = Ledger::open_in_memory().unwrap();
        assert!(ledger.get_watermark("voice_last_poll").unwrap().is_none());
    }
}
