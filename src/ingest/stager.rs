//! Inserts one ledger row per accepted file, idempotently.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{CaptureRecord, Fingerprint};
use crate::ledger::Ledger;

use super::dedup::DedupGate;
use super::errors::StageError;

pub enum StageOutcome {
    Staged(CaptureRecord),
    /// A capture for this path already existed — the `(channel,
    /// channel_native_id)` pre-check caught it. Defensive against races
    /// under a future concurrent driver; under today's sequential cycle
    /// this should already have been filtered by `DedupGate` upstream.
    DuplicateByPath,
}

pub struct CaptureStager<'a> {
    ledger: &'a Ledger,
}

impl<'a> CaptureStager<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    pub fn stage(
        &self,
        channel_native_id: &str,
        fp: &Fingerprint,
        now: DateTime<Utc>,
    ) -> Result<StageOutcome, StageError> {
        if DedupGate::new(self.ledger).is_duplicate_by_path(channel_native_id)? {
            return Ok(StageOutcome::DuplicateByPath);
        }

        let id = Uuid::now_v7().to_string();
        let record = CaptureRecord::stage(id, channel_native_id.to_string(), fp.as_str().to_string(), now);

        if self.ledger.stage_capture(&record)? {
            Ok(StageOutcome::Staged(record))
        } else {
            Ok(StageOutcome::DuplicateByPath)
        }
    }
}
