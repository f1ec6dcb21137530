//! Room and operating-hours persistence.
//!
//! Rooms carry their booking policy inline; weekly hours and per-date
//! overrides live in their own tables keyed by `(room_id, dow)` and
//! `(room_id, date)`. Hours resolution is override first, weekly second,
//! closed when neither row exists.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

use crate::error::{Error, Result};
use crate::room::{BookingPolicy, Room, RoomId};
use crate::schedule::{DayHours, HoursOverride, ResolvedHours, WeekSchedule};
use crate::time::{weekday_index, TimeOfDay};

use super::Database;

const INSERT_ROOM: &str = r"
    INSERT INTO rooms
    (name, location, capacity, active, slot_minutes, buffer_minutes,
     min_minutes, max_minutes, open_from, open_until, open_days_ahead)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_ROOM: &str = r"
    SELECT id, name, location, capacity, active, slot_minutes, buffer_minutes,
           min_minutes, max_minutes, open_from, open_until, open_days_ahead
    FROM rooms WHERE id = ?
";

const LIST_ROOMS: &str = r"
    SELECT id, name, location, capacity, active, slot_minutes, buffer_minutes,
           min_minutes, max_minutes, open_from, open_until, open_days_ahead
    FROM rooms ORDER BY id
";

const UPDATE_ROOM_ACTIVE: &str = "UPDATE rooms SET active = ? WHERE id = ?";

const DELETE_WEEK: &str = "DELETE FROM operating_hours WHERE room_id = ?";

const INSERT_DAY_HOURS: &str = r"
    INSERT INTO operating_hours (room_id, dow, closed, open_min, close_min)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_WEEK: &str = r"
    SELECT dow, closed, open_min, close_min
    FROM operating_hours WHERE room_id = ? ORDER BY dow
";

const SELECT_DAY: &str = r"
    SELECT closed, open_min, close_min
    FROM operating_hours WHERE room_id = ? AND dow = ?
";

const UPSERT_OVERRIDE: &str = r"
    INSERT OR REPLACE INTO operating_overrides
    (room_id, date, closed, open_min, close_min, reason)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_OVERRIDE: &str = r"
    SELECT closed, open_min, close_min, reason
    FROM operating_overrides WHERE room_id = ? AND date = ?
";

const LIST_OVERRIDES: &str = r"
    SELECT date, closed, open_min, close_min, reason
    FROM operating_overrides WHERE room_id = ? ORDER BY date
";

fn row_to_room(row: &Row<'_>) -> rusqlite::Result<Room> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let location: Option<String> = row.get(2)?;
    let capacity: u32 = row.get(3)?;
    let active: bool = row.get(4)?;
    let policy = BookingPolicy {
        slot_minutes: row.get(5)?,
        buffer_minutes: row.get(6)?,
        min_minutes: row.get(7)?,
        max_minutes: row.get(8)?,
        open_from: row.get::<_, Option<NaiveDate>>(9)?,
        open_until: row.get::<_, Option<NaiveDate>>(10)?,
        open_days_ahead: row.get(11)?,
    };

    Room::builder(RoomId::new(id), name)
        .location(location)
        .capacity(capacity)
        .active(active)
        .policy(policy)
        .build()
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn day_hours_from_columns(
    closed: bool,
    open_min: Option<u16>,
    close_min: Option<u16>,
) -> rusqlite::Result<DayHours> {
    if closed {
        return Ok(DayHours::Closed);
    }
    let to_time = |m: Option<u16>| {
        m.ok_or(rusqlite::Error::InvalidQuery).and_then(|m| {
            TimeOfDay::try_from(m).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        })
    };
    let open = to_time(open_min)?;
    let close = to_time(close_min)?;
    DayHours::open(open, close).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn day_hours_columns(hours: DayHours) -> (bool, Option<u16>, Option<u16>) {
    match hours.window() {
        None => (true, None, None),
        Some((open, close)) => (false, Some(open.minutes()), Some(close.minutes())),
    }
}

impl Database {
    /// Stores a room, assigning it a fresh id.
    ///
    /// The id on the passed room is ignored; the returned room carries the
    /// id the database assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_room(&mut self, room: &Room) -> Result<Room> {
        let policy = room.policy();
        self.conn.execute(
            INSERT_ROOM,
            params![
                room.name(),
                room.location(),
                room.capacity(),
                room.active(),
                policy.slot_minutes,
                policy.buffer_minutes,
                policy.min_minutes,
                policy.max_minutes,
                policy.open_from,
                policy.open_until,
                policy.open_days_ahead,
            ],
        )?;
        let id = self.conn.last_insert_rowid();

        Room::builder(RoomId::new(id), room.name())
            .location(room.location().map(String::from))
            .capacity(room.capacity())
            .active(room.active())
            .policy(policy.clone())
            .build()
            .map_err(Error::from)
    }

    /// Retrieves a room by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(room))` if the room exists
    /// - `Ok(None)` if it doesn't
    pub fn get_room(&self, id: RoomId) -> Result<Option<Room>> {
        self.conn
            .query_row(SELECT_ROOM, [id.value()], row_to_room)
            .optional()
            .map_err(Error::from)
    }

    /// Lists all rooms in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_rooms(&self) -> Result<Vec<Room>> {
        let mut stmt = self.conn.prepare(LIST_ROOMS)?;
        let rooms = stmt
            .query_map([], row_to_room)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rooms)
    }

    /// Flips a room's active flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the room does not exist.
    pub fn set_room_active(&mut self, id: RoomId, active: bool) -> Result<()> {
        let changed = self.conn.execute(UPDATE_ROOM_ACTIVE, params![active, id.value()])?;
        if changed == 0 {
            return Err(Error::NotFound {
                resource: format!("room {id}"),
            });
        }
        Ok(())
    }

    /// Replaces a room's weekly operating schedule.
    ///
    /// All seven rows are rewritten in one transaction so readers never see
    /// a half-updated week.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the room does not exist, or a
    /// database error if a statement fails.
    pub fn set_week_schedule(&mut self, id: RoomId, schedule: &WeekSchedule) -> Result<()> {
        if self.get_room(id)?.is_none() {
            return Err(Error::NotFound {
                resource: format!("room {id}"),
            });
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(DELETE_WEEK, [id.value()])?;
        {
            let mut stmt = tx.prepare(INSERT_DAY_HOURS)?;
            for (dow, hours) in schedule.iter() {
                let (closed, open_min, close_min) = day_hours_columns(hours);
                stmt.execute(params![id.value(), dow, closed, open_min, close_min])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Loads a room's weekly operating schedule.
    ///
    /// Days without a stored row read as closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is malformed.
    pub fn get_week_schedule(&self, id: RoomId) -> Result<WeekSchedule> {
        let mut stmt = self.conn.prepare(SELECT_WEEK)?;
        let rows = stmt.query_map([id.value()], |row| {
            let dow: u8 = row.get(0)?;
            let hours = day_hours_from_columns(row.get(1)?, row.get(2)?, row.get(3)?)?;
            Ok((dow, hours))
        })?;

        let mut schedule = WeekSchedule::closed();
        for row in rows {
            let (dow, hours) = row?;
            schedule.set(dow, hours)?;
        }
        Ok(schedule)
    }

    /// Stores (or replaces) a per-date hours override.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the room does not exist.
    pub fn set_hours_override(&mut self, id: RoomId, ov: &HoursOverride) -> Result<()> {
        if self.get_room(id)?.is_none() {
            return Err(Error::NotFound {
                resource: format!("room {id}"),
            });
        }
        let (closed, open_min, close_min) = day_hours_columns(ov.hours);
        self.conn.execute(
            UPSERT_OVERRIDE,
            params![id.value(), ov.date, closed, open_min, close_min, ov.reason],
        )?;
        Ok(())
    }

    /// Lists a room's hour overrides in date order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_hours_overrides(&self, id: RoomId) -> Result<Vec<HoursOverride>> {
        let mut stmt = self.conn.prepare(LIST_OVERRIDES)?;
        let overrides = stmt
            .query_map([id.value()], |row| {
                let date: NaiveDate = row.get(0)?;
                let hours = day_hours_from_columns(row.get(1)?, row.get(2)?, row.get(3)?)?;
                let reason: Option<String> = row.get(4)?;
                Ok(HoursOverride { date, hours, reason })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(overrides)
    }

    /// Resolves the operating hours for a room on a date: the override for
    /// that exact date when present, otherwise the weekly entry for the
    /// date's day of week, otherwise closed.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row is malformed.
    pub fn hours_for_date(&self, id: RoomId, date: NaiveDate) -> Result<ResolvedHours> {
        let override_row = self
            .conn
            .query_row(SELECT_OVERRIDE, params![id.value(), date], |row| {
                let hours = day_hours_from_columns(row.get(0)?, row.get(1)?, row.get(2)?)?;
                let reason: Option<String> = row.get(3)?;
                Ok(ResolvedHours { hours, reason })
            })
            .optional()?;
        if let Some(resolved) = override_row {
            return Ok(resolved);
        }

        let weekly = self
            .conn
            .query_row(
                SELECT_DAY,
                params![id.value(), weekday_index(date)],
                |row| day_hours_from_columns(row.get(0)?, row.get(1)?, row.get(2)?),
            )
            .optional()?;

        Ok(ResolvedHours {
            hours: weekly.unwrap_or(DayHours::Closed),
            reason: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;
    use tempfile::tempdir;

    fn open_db() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::open(DatabaseConfig::new(dir.path().join("test.db"))).unwrap();
        (dir, db)
    }

    fn sample_room() -> Room {
        Room::builder(RoomId::new(0), "Boardroom")
            .location(Some("3F".to_string()))
            .capacity(10)
            .policy(BookingPolicy::new(30, 0, 30, 240).unwrap())
            .build()
            .unwrap()
    }

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    #[test]
    fn test_create_and_get_room() {
        let (_dir, mut db) = open_db();
        let stored = db.create_room(&sample_room()).unwrap();
        assert!(stored.id().value() > 0);

        let loaded = db.get_room(stored.id()).unwrap().unwrap();
        assert_eq!(loaded, stored);
    }

    #[test]
    fn test_get_missing_room() {
        let (_dir, db) = open_db();
        assert!(db.get_room(RoomId::new(99)).unwrap().is_none());
    }

    #[test]
    fn test_list_rooms_in_id_order() {
        let (_dir, mut db) = open_db();
        let a = db.create_room(&sample_room()).unwrap();
        let b = db.create_room(&sample_room()).unwrap();

        let rooms = db.list_rooms().unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id(), a.id());
        assert_eq!(rooms[1].id(), b.id());
    }

    #[test]
    fn test_set_room_active() {
        let (_dir, mut db) = open_db();
        let room = db.create_room(&sample_room()).unwrap();

        db.set_room_active(room.id(), false).unwrap();
        assert!(!db.get_room(room.id()).unwrap().unwrap().active());

        let err = db.set_room_active(RoomId::new(99), false).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_week_schedule_roundtrip() {
        let (_dir, mut db) = open_db();
        let room = db.create_room(&sample_room()).unwrap();

        let mut schedule = WeekSchedule::closed();
        for dow in 1..=5 {
            schedule
                .set(dow, DayHours::open(t("09:00"), t("18:00")).unwrap())
                .unwrap();
        }
        db.set_week_schedule(room.id(), &schedule).unwrap();

        let loaded = db.get_week_schedule(room.id()).unwrap();
        assert_eq!(loaded, schedule);
    }

    #[test]
    fn test_week_schedule_replaces_previous() {
        let (_dir, mut db) = open_db();
        let room = db.create_room(&sample_room()).unwrap();

        let mut first = WeekSchedule::closed();
        first
            .set(1, DayHours::open(t("09:00"), t("18:00")).unwrap())
            .unwrap();
        db.set_week_schedule(room.id(), &first).unwrap();

        let second = WeekSchedule::closed();
        db.set_week_schedule(room.id(), &second).unwrap();

        let loaded = db.get_week_schedule(room.id()).unwrap();
        assert!(loaded.hours_on(1).is_closed());
    }

    #[test]
    fn test_missing_schedule_reads_closed() {
        let (_dir, mut db) = open_db();
        let room = db.create_room(&sample_room()).unwrap();
        let schedule = db.get_week_schedule(room.id()).unwrap();
        for dow in 1..=7 {
            assert!(schedule.hours_on(dow).is_closed());
        }
    }

    #[test]
    fn test_hours_for_date_weekly_fallback() {
        let (_dir, mut db) = open_db();
        let room = db.create_room(&sample_room()).unwrap();

        let mut schedule = WeekSchedule::closed();
        schedule
            .set(1, DayHours::open(t("09:00"), t("18:00")).unwrap())
            .unwrap();
        db.set_week_schedule(room.id(), &schedule).unwrap();

        let monday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let resolved = db.hours_for_date(room.id(), monday).unwrap();
        assert_eq!(resolved.hours.window(), Some((t("09:00"), t("18:00"))));
        assert_eq!(resolved.reason, None);

        let tuesday = NaiveDate::from_ymd_opt(2026, 8, 4).unwrap();
        assert!(db.hours_for_date(room.id(), tuesday).unwrap().hours.is_closed());
    }

    #[test]
    fn test_hours_override_wins() {
        let (_dir, mut db) = open_db();
        let room = db.create_room(&sample_room()).unwrap();

        let mut schedule = WeekSchedule::closed();
        schedule
            .set(1, DayHours::open(t("09:00"), t("18:00")).unwrap())
            .unwrap();
        db.set_week_schedule(room.id(), &schedule).unwrap();

        let monday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        db.set_hours_override(
            room.id(),
            &HoursOverride::closed(monday, Some("Maintenance".to_string())),
        )
        .unwrap();

        let resolved = db.hours_for_date(room.id(), monday).unwrap();
        assert!(resolved.hours.is_closed());
        assert_eq!(resolved.reason.as_deref(), Some("Maintenance"));
    }

    #[test]
    fn test_special_hours_override() {
        let (_dir, mut db) = open_db();
        let room = db.create_room(&sample_room()).unwrap();

        let sunday = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();
        db.set_hours_override(
            room.id(),
            &HoursOverride::special(sunday, t("13:00"), t("17:00")).unwrap(),
        )
        .unwrap();

        let resolved = db.hours_for_date(room.id(), sunday).unwrap();
        assert_eq!(resolved.hours.window(), Some((t("13:00"), t("17:00"))));

        let overrides = db.list_hours_overrides(room.id()).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].date, sunday);
    }

    #[test]
    fn test_schedule_for_unknown_room_rejected() {
        let (_dir, mut db) = open_db();
        let err = db
            .set_week_schedule(RoomId::new(42), &WeekSchedule::closed())
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
