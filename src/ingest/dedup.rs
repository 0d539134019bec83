//! Two-layer gate preventing double-staging.
//!
//! L1 (path) always runs first and is cheap; L2 (content) only runs for
//! materialized files with a computed fingerprint. If both would flag,
//! L1 wins — callers never reach L2 for an L1 hit.

use crate::domain::{Fingerprint, VOICE_CHANNEL};
use crate::ledger::Ledger;

use super::errors::DedupError;

pub struct DedupGate<'a> {
    ledger: &'a Ledger,
}

impl<'a> DedupGate<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// L1: has this exact path already been staged under the voice channel?
    pub fn is_duplicate_by_path(&self, channel_native_id: &str) -> Result<bool, DedupError> {
        Ok(self
            .ledger
            .exists_by_channel_native_id(VOICE_CHANNEL, channel_native_id)?)
    }

    /// L2: does a capture with this content fingerprint already exist,
    /// under any path?
    pub fn is_duplicate_by_content(&self, fp: &Fingerprint) -> Result<bool, DedupError> {
        Ok(self.ledger.exists_by_fingerprint(fp.as_str())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CaptureRecord;
    use chrono::Utc;

    #[test]
    fn l1_flags_a_previously_staged_path() {
        let ledger = Ledger::open_in_memory().unwrap();
        let record = CaptureRecord::stage(
            "01J-A".to_string(),
            "/voice/A.m4a".to_string(),
            "fp-a".to_string(),
            Utc::now(),
        );
        ledger.stage_capture(&record).unwrap();

        let gate = DedupGate::new(&ledger);
        assert!(gate.is_duplicate_by_path("/voice/A.m4a").unwrap());
        assert!(!gate.is_duplicate_by_path("/voice/B.m4a").unwrap());
    }

    #[test]
    fn l2_flags_a_previously_seen_fingerprint_under_a_new_path() {
        let ledger = Ledger::open_in_memory().unwrap();
        let record = CaptureRecord::stage(
            "01J-A".to_string(),
            "/voice/A.m4a".to_string(),
            "fp-shared".to_string(),
            Utc::now(),
        );
        ledger.stage_capture(&record).unwrap();

        let gate = DedupGate::new(&ledger);
        assert!(!gate.is_duplicate_by_path("/voice/B.m4a").unwrap());
        assert!(gate
            .is_duplicate_by_content(&Fingerprint::new("fp-shared"))
            .unwrap());
    }
}
