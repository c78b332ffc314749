//! SQL schema definitions

pub const SCHEMA: &str = r#"
-- Key-value table backing the store collections
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
