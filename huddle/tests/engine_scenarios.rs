//! End-to-end scenarios for the pure availability/conflict engine.
//!
//! These tests exercise the documented behavior of the engine on concrete
//! timetables: slot grids, start-time options, buffer handling and the
//! month calendar, without touching storage.

use chrono::NaiveDate;
use huddle::availability::{day_status, start_time_options, DayStatus, SlotState};
use huddle::calendar::{month_counts, Month};
use huddle::conflict::{validate, Decision, RejectReason};
use huddle::schedule::{DayHours, ResolvedHours};
use huddle::{
    BookingPolicy, Reservation, ReservationId, ReservationStatus, RoomId, TimeOfDay, UserId,
};

fn t(s: &str) -> TimeOfDay {
    TimeOfDay::parse(s).unwrap()
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 3).unwrap()
}

fn nine_to_six() -> ResolvedHours {
    ResolvedHours {
        hours: DayHours::open(t("09:00"), t("18:00")).unwrap(),
        reason: None,
    }
}

fn policy(slot: u32, buffer: u32) -> BookingPolicy {
    BookingPolicy::new(slot, buffer, 30, 240).unwrap()
}

fn booked(id: i64, start: &str, duration: u32) -> Reservation {
    Reservation::builder(
        ReservationId::new(id),
        RoomId::new(1),
        UserId::new(1),
        monday().and_time(chrono::NaiveTime::parse_from_str(start, "%H:%M").unwrap()),
        duration,
    )
    .build()
    .unwrap()
}

#[test]
fn empty_day_nine_to_six_hourly() {
    // Room open 09:00-18:00, slot 60, no reservations: 9 free slots and
    // 9 start options from 09:00 through 17:00.
    let p = policy(60, 0);
    let status = day_status(&p, &nine_to_six(), monday(), &[]);
    let DayStatus::Open { slots, .. } = status else {
        panic!("expected open day");
    };
    assert_eq!(slots.len(), 9);
    assert!(slots.iter().all(|s| s.state == SlotState::Free));

    let options = start_time_options(&p, &nine_to_six(), monday(), 60, &[], None);
    let rendered: Vec<String> = options.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00"
        ]
    );
}

#[test]
fn mid_slot_overlap_rejected_and_adjacent_accepted() {
    // One reservation 10:00-11:00 exists.
    let p = policy(30, 0);
    let existing = [booked(11, "10:00", 60)];

    // 10:30 for 30 minutes sits inside it.
    let d = validate(&p, &nine_to_six(), monday(), t("10:30"), 30, &existing, None);
    assert_eq!(
        d,
        Decision::Reject(RejectReason::Conflict {
            with: ReservationId::new(11)
        })
    );

    // 11:00 for 60 minutes is back-to-back and fine without a buffer.
    let d = validate(&p, &nine_to_six(), monday(), t("11:00"), 60, &existing, None);
    assert!(d.is_accept());
}

#[test]
fn buffer_turns_adjacency_into_conflict() {
    let p = policy(30, 10);
    let existing = [booked(11, "10:00", 60)];

    let d = validate(&p, &nine_to_six(), monday(), t("11:00"), 60, &existing, None);
    assert_eq!(
        d,
        Decision::Reject(RejectReason::Conflict {
            with: ReservationId::new(11)
        })
    );
}

#[test]
fn ninety_minute_meetings_stop_at_1630() {
    let p = policy(30, 0);
    let options = start_time_options(&p, &nine_to_six(), monday(), 90, &[], None);

    assert_eq!(options.last().copied(), Some(t("16:30")));
    assert!(!options.contains(&t("17:00")));

    // And validate agrees about the boundary.
    assert!(validate(&p, &nine_to_six(), monday(), t("16:30"), 90, &[], None).is_accept());
    assert!(!validate(&p, &nine_to_six(), monday(), t("17:00"), 90, &[], None).is_accept());
}

#[test]
fn cancellation_frees_the_interval() {
    let p = policy(30, 0);
    let mut r = booked(11, "10:00", 60);

    let d = validate(
        &p,
        &nine_to_six(),
        monday(),
        t("10:00"),
        60,
        std::slice::from_ref(&r),
        None,
    );
    assert!(!d.is_accept());

    r = Reservation::builder(r.id(), r.room(), r.user(), r.start_at(), 60)
        .status(ReservationStatus::Cancelled)
        .build()
        .unwrap();

    let d = validate(&p, &nine_to_six(), monday(), t("10:00"), 60, &[r], None);
    assert!(d.is_accept());
}

#[test]
fn options_match_validate_across_a_crowded_day() {
    let p = policy(30, 10);
    let existing = [
        booked(1, "09:00", 60),
        booked(2, "11:30", 90),
        booked(3, "15:00", 30),
    ];
    let duration = 60;

    let options =
        start_time_options(&p, &nine_to_six(), monday(), duration, &existing, None);

    let mut m = u32::from(t("09:00").minutes());
    while m + duration <= u32::from(t("18:00").minutes()) {
        let start = TimeOfDay::try_from(u16::try_from(m).unwrap()).unwrap();
        let accepted =
            validate(&p, &nine_to_six(), monday(), start, duration, &existing, None)
                .is_accept();
        assert_eq!(
            options.contains(&start),
            accepted,
            "offered and accepted disagree at {start}"
        );
        m += p.slot_minutes;
    }
}

#[test]
fn slot_grid_tracks_uneven_close() {
    // 09:00-17:45 with 30-minute slots: 18 slots, last one 15 minutes.
    let hours = ResolvedHours {
        hours: DayHours::open(t("09:00"), t("17:45")).unwrap(),
        reason: None,
    };
    let status = day_status(&policy(30, 0), &hours, monday(), &[]);
    let DayStatus::Open { slots, .. } = status else {
        panic!("expected open day");
    };
    assert_eq!(slots.len(), 18);
    assert_eq!(slots.last().unwrap().start, t("17:30"));
    assert_eq!(slots.last().unwrap().end, t("17:45"));
}

#[test]
fn month_counts_sum_to_reservation_total() {
    let reservations: Vec<Reservation> = (1..=12)
        .map(|i| {
            Reservation::builder(
                ReservationId::new(i),
                RoomId::new(1),
                UserId::new(1),
                NaiveDate::from_ymd_opt(2026, 8, u32::try_from(i * 2).unwrap())
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap(),
                60,
            )
            .build()
            .unwrap()
        })
        .collect();

    let counts = month_counts(Month::new(2026, 8).unwrap(), &reservations);
    assert_eq!(counts.len(), 31);
    let total: u32 = counts.iter().map(|d| d.count).sum();
    assert_eq!(total, 12);
}
