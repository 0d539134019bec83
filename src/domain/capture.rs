//! One staged capture in the ledger's `captures` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CAPTURE_SOURCE, STAGED_STATUS, VOICE_CHANNEL};

/// Structured `meta_json` for a voice capture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceMeta {
    pub channel: String,
    pub channel_native_id: String,
    pub audio_fp: String,
}

impl VoiceMeta {
    pub fn new(channel_native_id: impl Into<String>, audio_fp: impl Into<String>) -> Self {
        Self {
            channel: VOICE_CHANNEL.to_string(),
            channel_native_id: channel_native_id.into(),
            audio_fp: audio_fp.into(),
        }
    }
}

/// One row staged into `captures` by [`crate::ingest::stager::CaptureStager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    pub id: String,
    pub source: String,
    pub status: String,
    pub raw_content: String,
    pub meta: VoiceMeta,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CaptureRecord {
    /// Build a fresh record for `path`/`fingerprint`, stamped with `now`.
    pub fn stage(id: String, channel_native_id: String, audio_fp: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            source: CAPTURE_SOURCE.to_string(),
            status: STAGED_STATUS.to_string(),
            raw_content: String::new(),
            meta: VoiceMeta::new(channel_native_id, audio_fp),
            created_at: now,
            updated_at: now,
        }
    }
}
