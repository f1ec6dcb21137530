//! Reservation persistence: range queries and conflict-checked writes.
//!
//! The overlap re-check and the mutation always commit under one
//! IMMEDIATE transaction, so two racing bookings for the same slot
//! serialize on the writer lock and the loser is rejected with
//! [`Error::Conflict`]. The storage layer is the final arbiter behind the
//! advisory fast-path check in [`crate::conflict`].

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::{params, OptionalExtension, Row, Transaction, TransactionBehavior};

use crate::calendar::Month;
use crate::error::{Error, Result};
use crate::reservation::{Reservation, ReservationId, ReservationStatus, UserId};
use crate::room::RoomId;

use super::Database;

const RESERVATION_COLUMNS: &str =
    "id, room_id, user_id, title, status, start_at, end_at, created_at";

const SELECT_RESERVATION: &str = r"
    SELECT id, room_id, user_id, title, status, start_at, end_at, created_at
    FROM reservations WHERE id = ?
";

const SELECT_CONFLICT: &str = r"
    SELECT id FROM reservations
    WHERE room_id = ?
      AND status = 'BOOKED'
      AND id != ?
      AND start_at < ?
      AND end_at > ?
    ORDER BY start_at ASC
    LIMIT 1
";

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (room_id, user_id, title, status, start_at, end_at, created_at)
    VALUES (?, ?, ?, 'BOOKED', ?, ?, ?)
";

const UPDATE_INTERVAL: &str = r"
    UPDATE reservations
    SET title = ?, start_at = ?, end_at = ?
    WHERE id = ? AND status = 'BOOKED'
";

const CANCEL_RESERVATION: &str = r"
    UPDATE reservations
    SET status = 'CANCELLED'
    WHERE id = ? AND status = 'BOOKED'
";

const INSERT_AUDIT: &str = r"
    INSERT INTO reservation_audit
    (reservation_id, previous_status, new_status, actor, at)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_AUDIT: &str = r"
    SELECT reservation_id, previous_status, new_status, actor, at
    FROM reservation_audit WHERE reservation_id = ? ORDER BY id
";

fn row_to_reservation(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    let id: i64 = row.get(0)?;
    let room: i64 = row.get(1)?;
    let user: i64 = row.get(2)?;
    let title: Option<String> = row.get(3)?;
    let status: String = row.get(4)?;
    let start_at: NaiveDateTime = row.get(5)?;
    let end_at: NaiveDateTime = row.get(6)?;
    let created_at: NaiveDateTime = row.get(7)?;

    let status = ReservationStatus::parse(&status).map_err(|bad| {
        rusqlite::Error::ToSqlConversionFailure(format!("unknown status {bad:?}").into())
    })?;

    let duration = (end_at - start_at).num_minutes();
    let duration = u32::try_from(duration)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    Reservation::builder(
        ReservationId::new(id),
        RoomId::new(room),
        UserId::new(user),
        start_at,
        duration,
    )
    .title(title)
    .status(status)
    .created_at(created_at)
    .build()
    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// One append-only audit row: a reservation's status transition, who made
/// it and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// The reservation the transition belongs to.
    pub reservation: ReservationId,
    /// The status before the transition; `None` for creation.
    pub previous: Option<ReservationStatus>,
    /// The status after the transition.
    pub new: ReservationStatus,
    /// Who performed the transition (rendered by the operations layer).
    pub actor: String,
    /// When the transition was recorded.
    pub at: NaiveDateTime,
}

/// Finds the first booked reservation whose buffered interval overlaps the
/// buffered candidate, excluding `exclude`. Runs inside the caller's
/// transaction. Widening the candidate by `2 * buffer` against the raw
/// stored intervals is equivalent to widening both sides by `buffer`.
fn find_conflict(
    tx: &Transaction<'_>,
    room: RoomId,
    start_at: NaiveDateTime,
    end_at: NaiveDateTime,
    buffer_minutes: u32,
    exclude: Option<ReservationId>,
) -> Result<Option<ReservationId>> {
    let widen = Duration::minutes(2 * i64::from(buffer_minutes));
    let blocked_until = end_at + widen;
    let blocked_from = start_at - widen;

    let hit = tx
        .query_row(
            SELECT_CONFLICT,
            params![
                room.value(),
                exclude.map_or(-1, ReservationId::value),
                blocked_until,
                blocked_from,
            ],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(hit.map(ReservationId::new))
}

fn record_audit(
    tx: &Transaction<'_>,
    reservation: ReservationId,
    previous: Option<ReservationStatus>,
    new: ReservationStatus,
    actor: &str,
    at: NaiveDateTime,
) -> Result<()> {
    tx.execute(
        INSERT_AUDIT,
        params![
            reservation.value(),
            previous.map(ReservationStatus::as_str),
            new.as_str(),
            actor,
            at,
        ],
    )?;
    Ok(())
}

impl Database {
    /// Retrieves a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(reservation))` if the reservation exists
    /// - `Ok(None)` if it doesn't
    pub fn get_reservation(&self, id: ReservationId) -> Result<Option<Reservation>> {
        self.conn
            .query_row(SELECT_RESERVATION, [id.value()], row_to_reservation)
            .optional()
            .map_err(Error::from)
    }

    /// Loads the booked reservations whose interval intersects a calendar
    /// day, in start order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_by_room_and_date(&self, room: RoomId, date: NaiveDate) -> Result<Vec<Reservation>> {
        let day_start = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        let day_end = day_start + Duration::days(1);
        self.find_in_range(room, day_start, day_end)
    }

    /// Loads the booked reservations whose interval intersects a month, in
    /// start order. One query per month view; bucketing happens in
    /// [`crate::calendar::month_counts`].
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_by_room_and_month(&self, room: RoomId, month: Month) -> Result<Vec<Reservation>> {
        let start = month
            .first_day()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid");
        let end = month
            .next()
            .first_day()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid");
        self.find_in_range(room, start, end)
    }

    fn find_in_range(
        &self,
        room: RoomId,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE room_id = ? AND status = 'BOOKED'
               AND start_at < ? AND end_at > ?
             ORDER BY start_at ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let reservations = stmt
            .query_map(params![room.value(), to, from], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }

    /// Lists a user's reservations, newest start first.
    ///
    /// Includes cancelled rows; history views want them and callers can
    /// filter on status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_by_user(&self, user: UserId) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE user_id = ? ORDER BY start_at DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let reservations = stmt
            .query_map([user.value()], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }

    /// Inserts a booking after re-checking for conflicts inside the same
    /// IMMEDIATE transaction.
    ///
    /// The caller has already validated policy and operating hours; this
    /// method owns the race between concurrent writers. The creation audit
    /// row commits atomically with the insert.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] naming the blocking reservation if the
    /// interval is taken, or a database error.
    #[allow(clippy::too_many_arguments)]
    pub fn create_reservation(
        &mut self,
        room: RoomId,
        user: UserId,
        title: Option<&str>,
        start_at: NaiveDateTime,
        duration_minutes: u32,
        buffer_minutes: u32,
        actor: &str,
        now: NaiveDateTime,
    ) -> Result<Reservation> {
        let end_at = start_at + Duration::minutes(i64::from(duration_minutes));

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(with) = find_conflict(&tx, room, start_at, end_at, buffer_minutes, None)? {
            log::debug!("booking re-check found conflict with reservation {with}");
            return Err(Error::Conflict { with });
        }

        tx.execute(
            INSERT_RESERVATION,
            params![room.value(), user.value(), title, start_at, end_at, now],
        )?;
        let id = ReservationId::new(tx.last_insert_rowid());
        record_audit(&tx, id, None, ReservationStatus::Booked, actor, now)?;
        tx.commit()?;

        Reservation::builder(id, room, user, start_at, duration_minutes)
            .title(title.map(String::from))
            .created_at(now)
            .build()
            .map_err(Error::from)
    }

    /// Moves a booked reservation to a new interval (and title), with the
    /// conflict re-check excluding the reservation itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no booked reservation has this id
    /// (cancelled reservations are immutable), [`Error::Conflict`] if the
    /// new interval is taken, or a database error.
    #[allow(clippy::too_many_arguments)]
    pub fn update_interval(
        &mut self,
        id: ReservationId,
        title: Option<&str>,
        start_at: NaiveDateTime,
        duration_minutes: u32,
        buffer_minutes: u32,
        actor: &str,
        now: NaiveDateTime,
    ) -> Result<Reservation> {
        let end_at = start_at + Duration::minutes(i64::from(duration_minutes));

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(with) = find_conflict(&tx, room_of(&tx, id)?, start_at, end_at, buffer_minutes, Some(id))? {
            log::debug!("amend re-check found conflict with reservation {with}");
            return Err(Error::Conflict { with });
        }

        let changed = tx.execute(
            UPDATE_INTERVAL,
            params![title, start_at, end_at, id.value()],
        )?;
        if changed == 0 {
            return Err(Error::NotFound {
                resource: format!("booked reservation {id}"),
            });
        }
        record_audit(
            &tx,
            id,
            Some(ReservationStatus::Booked),
            ReservationStatus::Booked,
            actor,
            now,
        )?;
        tx.commit()?;

        self.get_reservation(id)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {id}"),
        })
    }

    /// Cancels a booked reservation.
    ///
    /// Cancellation is the only transition out of `Booked` and is
    /// terminal: a second cancel reports that no booked reservation
    /// exists. The row itself is never deleted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no booked reservation has this id,
    /// or a database error.
    pub fn cancel_reservation(
        &mut self,
        id: ReservationId,
        actor: &str,
        now: NaiveDateTime,
    ) -> Result<Reservation> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(CANCEL_RESERVATION, [id.value()])?;
        if changed == 0 {
            return Err(Error::NotFound {
                resource: format!("booked reservation {id}"),
            });
        }
        record_audit(
            &tx,
            id,
            Some(ReservationStatus::Booked),
            ReservationStatus::Cancelled,
            actor,
            now,
        )?;
        tx.commit()?;

        self.get_reservation(id)?.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {id}"),
        })
    }

    /// Loads the audit trail for a reservation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn audit_for(&self, id: ReservationId) -> Result<Vec<AuditRecord>> {
        let mut stmt = self.conn.prepare(SELECT_AUDIT)?;
        let records = stmt
            .query_map([id.value()], |row| {
                let reservation: i64 = row.get(0)?;
                let previous: Option<String> = row.get(1)?;
                let new: String = row.get(2)?;
                let actor: String = row.get(3)?;
                let at: NaiveDateTime = row.get(4)?;

                let parse = |s: &str| {
                    ReservationStatus::parse(s).map_err(|bad| {
                        rusqlite::Error::ToSqlConversionFailure(
                            format!("unknown status {bad:?}").into(),
                        )
                    })
                };
                Ok(AuditRecord {
                    reservation: ReservationId::new(reservation),
                    previous: previous.as_deref().map(parse).transpose()?,
                    new: parse(&new)?,
                    actor,
                    at,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

/// Looks up the room a reservation belongs to, inside the transaction.
fn room_of(tx: &Transaction<'_>, id: ReservationId) -> Result<RoomId> {
    let room: i64 = tx
        .query_row(
            "SELECT room_id FROM reservations WHERE id = ?",
            [id.value()],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| Error::NotFound {
            resource: format!("reservation {id}"),
        })?;
    Ok(RoomId::new(room))
}
