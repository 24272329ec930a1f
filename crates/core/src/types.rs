/// Ledger primary keys are PostgreSQL SERIAL.
pub type DbId = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
