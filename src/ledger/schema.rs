//! DDL applied once per connection open.

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS captures (
    id          TEXT PRIMARY KEY,
    source      TEXT NOT NULL,
    status      TEXT NOT NULL,
    meta_json   TEXT NOT NULL,
    raw_content TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_captures_channel_native_id
    ON captures (json_extract(meta_json, '$.channel_native_id'));

CREATE TABLE IF NOT EXISTS sync_state (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
