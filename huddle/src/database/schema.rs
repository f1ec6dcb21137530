//! Database schema definitions and SQL constants.
//!
//! All table definitions, indices and schema-version statements live here.
//! Timestamps are stored as ISO-8601 text (chrono's `ToSql`), which keeps
//! lexicographic and chronological order identical for range queries.

/// Current schema version for the database.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the rooms table.
///
/// Policy columns are embedded rather than split off: a room's policy is
/// read on every validation, and the table stays small.
pub const CREATE_ROOMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS rooms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        location TEXT,
        capacity INTEGER NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        slot_minutes INTEGER NOT NULL,
        buffer_minutes INTEGER NOT NULL,
        min_minutes INTEGER NOT NULL,
        max_minutes INTEGER NOT NULL,
        open_from TEXT,
        open_until TEXT,
        open_days_ahead INTEGER NOT NULL
    )";

/// SQL statement to create the weekly operating-hours table.
///
/// One row per (room, dow 1..7); `open_min`/`close_min` are minutes since
/// midnight and are NULL exactly when `closed` is set. The `open < close`
/// invariant is enforced by the type layer before rows get here, the CHECK
/// is the storage-side backstop.
pub const CREATE_OPERATING_HOURS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS operating_hours (
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        dow INTEGER NOT NULL CHECK (dow BETWEEN 1 AND 7),
        closed INTEGER NOT NULL,
        open_min INTEGER,
        close_min INTEGER,
        PRIMARY KEY (room_id, dow),
        CHECK (closed = 1 OR open_min < close_min)
    )";

/// SQL statement to create the per-date override table.
pub const CREATE_OPERATING_OVERRIDES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS operating_overrides (
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        date TEXT NOT NULL,
        closed INTEGER NOT NULL,
        open_min INTEGER,
        close_min INTEGER,
        reason TEXT,
        PRIMARY KEY (room_id, date),
        CHECK (closed = 1 OR open_min < close_min)
    )";

/// SQL statement to create the reservations table.
///
/// Rows are never deleted; cancellation flips `status`. `end_at` is stored
/// alongside `start_at` so the conflict check and the range queries are
/// single comparisons instead of date arithmetic.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        user_id INTEGER NOT NULL,
        title TEXT,
        status TEXT NOT NULL CHECK (status IN ('BOOKED', 'CANCELLED')),
        start_at TEXT NOT NULL,
        end_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        CHECK (start_at < end_at)
    )";

/// SQL statement to create the append-only audit table.
pub const CREATE_AUDIT_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservation_audit (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        reservation_id INTEGER NOT NULL,
        previous_status TEXT,
        new_status TEXT NOT NULL,
        actor TEXT NOT NULL,
        at TEXT NOT NULL
    )";

/// Index speeding up the per-day and per-month range queries.
pub const CREATE_ROOM_START_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_room_start
    ON reservations(room_id, start_at)";

/// Index speeding up a user's reservation listing.
pub const CREATE_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_user ON reservations(user_id)";

/// Index speeding up audit lookups per reservation.
pub const CREATE_AUDIT_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_audit_reservation
    ON reservation_audit(reservation_id)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
