//! Domain types for the voice poller.
//!
//! These are plain data shapes shared by `cloud`, `ledger`, and `ingest` —
//! no behavior lives here beyond small constructors and invariant helpers.

pub mod capture;
pub mod cloud_status;
pub mod fingerprint;
pub mod poll_result;
pub mod voice_file;
pub mod watermark;

pub use capture::CaptureRecord;
pub use cloud_status::CloudStatus;
pub use fingerprint::Fingerprint;
pub use poll_result::PollResult;
pub use voice_file::VoiceFile;
pub use watermark::Watermark;

/// The `meta_json.channel` value the poller writes and dedups against.
pub const VOICE_CHANNEL: &str = "voice";

/// The `sync_state.key` this poller owns exclusively.
pub const WATERMARK_KEY: &str = "voice_last_poll";

/// `captures.source` for every row this poller stages.
pub const CAPTURE_SOURCE: &str = "voice";

/// `captures.status` at stage time; later transitions belong to downstream
/// collaborators (the exporter, the transcription engine).
pub const STAGED_STATUS: &str = "staged";
