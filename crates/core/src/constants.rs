/// Constants used throughout the cellar codebase
// Envelope markers
pub const COMPRESSION_MARKER: &str = "__CZ__";
pub const TIER_MARKER: &str = "__CELLAR_OVERFLOW__";
pub const CIRCULAR_MARKER: &str = "[Circular]";

// Type stamp fields
pub const TYPE_STAMP_FIELD: &str = "__type";
pub const TYPE_STAMP_DATE: &str = "Date";
pub const TYPE_STAMP_ISO_FIELD: &str = "iso";

// Defaults
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 200;
pub const DEFAULT_PRIMARY_QUOTA_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 200;

// Deepest container nesting accepted by the encoder. A date stamp adds one
// level and the result must stay within serde_json's parse limit of 127.
pub const MAX_NESTING_DEPTH: usize = 100;

// Stored key names
pub const TASKS_KEY: &str = "cellar_tasks_v3";
pub const LOGS_KEY: &str = "cellar_logs_v3";
pub const TAGS_KEY: &str = "cellar_tags_v3";
pub const PRESETS_KEY: &str = "cellar_presets_v3";
pub const CACHE_KEY: &str = "cellar_cache_v3";

// Environment variable names
pub const CELLAR_LOG_VAR: &str = "CELLAR_LOG";
pub const CELLAR_DATA_DIR_VAR: &str = "CELLAR_DATA_DIR";
pub const CELLAR_PRIMARY_QUOTA_VAR: &str = "CELLAR_PRIMARY_QUOTA";
pub const CELLAR_COMPRESSION_THRESHOLD_VAR: &str = "CELLAR_COMPRESSION_THRESHOLD";
pub const CELLAR_MAX_LOG_ENTRIES_VAR: &str = "CELLAR_MAX_LOG_ENTRIES";
