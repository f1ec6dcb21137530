//! Schema initialization and version gating.
//!
//! A fresh database is stamped with the current schema version when it is
//! first opened; every later open re-reads the stamp and refuses to run
//! against a schema this build does not understand.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_AUDIT_INDEX, CREATE_AUDIT_TABLE, CREATE_METADATA_TABLE,
    CREATE_OPERATING_HOURS_TABLE, CREATE_OPERATING_OVERRIDES_TABLE, CREATE_RESERVATIONS_TABLE,
    CREATE_ROOMS_TABLE, CREATE_ROOM_START_INDEX, CREATE_USER_INDEX, CURRENT_SCHEMA_VERSION,
    INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Creates every table and index of a fresh database and stamps the
/// schema version.
///
/// # Errors
///
/// Returns an error if any statement fails.
///
/// # Examples
///
/// ```no_run
/// use rusqlite::Connection;
/// use huddle::database::migrations::initialize_schema;
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in [
        CREATE_METADATA_TABLE,
        CREATE_ROOMS_TABLE,
        CREATE_OPERATING_HOURS_TABLE,
        CREATE_OPERATING_OVERRIDES_TABLE,
        CREATE_RESERVATIONS_TABLE,
        CREATE_AUDIT_TABLE,
        CREATE_ROOM_START_INDEX,
        CREATE_USER_INDEX,
        CREATE_AUDIT_INDEX,
    ] {
        conn.execute(statement, [])?;
    }
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;
    Ok(())
}

/// Reads the stored schema version.
///
/// A database without a metadata table (or without a stamp) reports
/// version 0, meaning "never initialized".
///
/// # Errors
///
/// Returns an error if the stamp exists but cannot be read or parsed.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let stamp = conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        row.get::<_, String>(0)?
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    });

    match stamp {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        // No metadata table at all: a database that predates first use.
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::Unknown =>
        {
            Ok(0)
        }
        Err(e) => Err(e.into()),
    }
}

/// Gates an open against the stored schema version.
///
/// Version 0 means a fresh file and triggers [`initialize_schema`]; any
/// other mismatch with [`CURRENT_SCHEMA_VERSION`] is rejected rather than
/// silently operated on.
///
/// # Errors
///
/// Returns an error for an incompatible schema version, or if reading the
/// stamp or initializing fails.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        return initialize_schema(conn);
    }
    if version < CURRENT_SCHEMA_VERSION {
        return Err(Error::Validation {
            field: "schema_version".into(),
            message: format!(
                "database schema version {version} is older than this build ({CURRENT_SCHEMA_VERSION}); no migration path exists yet"
            ),
        });
    }
    if version > CURRENT_SCHEMA_VERSION {
        return Err(Error::Validation {
            field: "schema_version".into(),
            message: format!(
                "database schema version {version} is newer than this build ({CURRENT_SCHEMA_VERSION}); upgrade huddle"
            ),
        });
    }
    Ok(())
}
