//! `SQLite` persistence for rooms, operating hours and reservations.
//!
//! [`Database`] implements the repository contracts the engine consumes:
//! room configuration and hours resolution on the read side, and
//! conflict-checked reservation writes on the write side. Writes run
//! inside IMMEDIATE transactions so the overlap re-check and the mutation
//! commit under one writer lock; availability reads never block them (WAL
//! journal).
//!
//! # Examples
//!
//! ```no_run
//! use huddle::database::{Database, DatabaseConfig};
//! use huddle::{BookingPolicy, Room, RoomId};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/huddle.db")).unwrap();
//!
//! let room = Room::builder(RoomId::new(0), "Boardroom")
//!     .capacity(10)
//!     .policy(BookingPolicy::new(30, 0, 30, 240).unwrap())
//!     .build()
//!     .unwrap();
//! let room = db.create_room(&room).unwrap();
//! println!("room {} stored", room.id());
//! ```

mod config;
pub mod migrations;
mod reservations;
mod rooms;
mod schema;

pub use config::{default_data_dir, DatabaseConfig};
pub use reservations::AuditRecord;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};

use rusqlite::{Connection, OpenFlags};

use crate::error::Result;

/// The reservation store: rooms, weekly hours, per-date overrides,
/// reservations and their audit trail, behind one `SQLite` connection.
///
/// The room and reservation methods live in this module's submodules;
/// every caller goes through them, the raw connection is never handed out.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens the database at the configured path.
    ///
    /// A missing file (and its parent directory) is created unless
    /// [`DatabaseConfig::no_auto_create`] was set. The connection comes up
    /// in WAL mode with the configured busy timeout, and the stored schema
    /// version is verified (a fresh file is initialized) before any
    /// repository method can run.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created, a PRAGMA
    /// fails, or the stored schema version is incompatible with this
    /// build.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        let mut flags = OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if config.read_only {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if config.auto_create {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
                if let Some(parent) = config.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // journal_mode answers with the mode it settled on, so it cannot
        // go through execute_batch.
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch(&format!(
            "PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = {};",
            config.busy_timeout.as_millis()
        ))?;

        migrations::check_schema_compatibility(&conn)?;

        Ok(Self { conn })
    }
}
