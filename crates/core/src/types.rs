/// Entity identifiers are opaque strings assigned by the remote service.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
