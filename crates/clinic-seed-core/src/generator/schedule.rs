//! Appointment time assignment.
//!
//! Same-day slots sit at fixed offsets from opening time so they never
//! collide; other appointments land on a random slot of a random day inside
//! the past or future window.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::Rng;

use crate::config::SeedConfig;
use crate::models::AppointmentStatus;

/// Latest same-window slot offered for non-today appointments (8 hours of clinic).
const CLINIC_DAY_MINUTES: u32 = 8 * 60;

/// The seed run's notion of "now", fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedClock {
    now: DateTime<FixedOffset>,
}

impl SeedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Current local time with the machine's UTC offset.
    pub fn system() -> Self {
        Self::new(Local::now().fixed_offset())
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Local midnight of `date` plus `minutes`, in the clock's offset.
    pub fn at(&self, date: NaiveDate, minutes: u32) -> DateTime<FixedOffset> {
        let offset = *self.now.offset();
        let local = date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minutes));
        let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
        Utc.from_utc_datetime(&utc).with_timezone(&offset)
    }

    pub fn start_of_today(&self) -> DateTime<FixedOffset> {
        self.at(self.today(), 0)
    }

    pub fn start_of_tomorrow(&self) -> DateTime<FixedOffset> {
        self.start_of_today() + Duration::days(1)
    }

    /// RFC 3339 stamp of "now", used for `createdAt`.
    pub fn timestamp(&self) -> String {
        self.now.to_rfc3339()
    }
}

/// Where a slot falls relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Same day, already started
    Today,
    /// Same day, after the clock's now
    LaterToday,
    Past,
    Future,
}

/// An assigned appointment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub at: DateTime<FixedOffset>,
    pub kind: SlotKind,
    /// Queue token for same-day slots
    pub token: Option<u32>,
}

impl Slot {
    pub fn date_string(&self) -> String {
        self.at.format("%Y-%m-%d").to_string()
    }

    pub fn time_string(&self) -> String {
        self.at.format("%H:%M").to_string()
    }

    /// Status implied by the slot: past visits happened, future ones are booked.
    pub fn status<R: Rng + ?Sized>(&self, rng: &mut R) -> AppointmentStatus {
        const TODAY_STATUSES: [AppointmentStatus; 4] = [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Waiting,
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
        ];
        const UPCOMING_STATUSES: [AppointmentStatus; 2] =
            [AppointmentStatus::Scheduled, AppointmentStatus::Waiting];
        match self.kind {
            SlotKind::Today => TODAY_STATUSES[rng.gen_range(0..TODAY_STATUSES.len())],
            SlotKind::LaterToday => UPCOMING_STATUSES[rng.gen_range(0..UPCOMING_STATUSES.len())],
            SlotKind::Past => AppointmentStatus::Completed,
            SlotKind::Future => AppointmentStatus::Scheduled,
        }
    }
}

/// `count` same-day slots, `slot_minutes` apart from opening time, tokens from 1.
/// Slots after `clock.now()` are [`SlotKind::LaterToday`].
///
/// Assumes the config passed [`SeedConfig::validate`], so every slot is before midnight.
pub fn today_slots(clock: &SeedClock, config: &SeedConfig, count: usize) -> Vec<Slot> {
    let open = config.open_hour * 60;
    (0..count)
        .map(|i| {
            let at = clock.at(clock.today(), open + i as u32 * config.slot_minutes);
            let kind = if at <= clock.now() {
                SlotKind::Today
            } else {
                SlotKind::LaterToday
            };
            Slot {
                at,
                kind,
                token: Some(i as u32 + 1),
            }
        })
        .collect()
}

/// One slot on a random past or future day, chosen by a fair coin.
pub fn other_slot<R: Rng + ?Sized>(rng: &mut R, clock: &SeedClock, config: &SeedConfig) -> Slot {
    let (kind, day) = if rng.gen_bool(0.5) {
        let back = rng.gen_range(1..=config.past_window_days);
        (SlotKind::Past, clock.today() - Duration::days(i64::from(back)))
    } else {
        let ahead = rng.gen_range(1..=config.future_window_days);
        (SlotKind::Future, clock.today() + Duration::days(i64::from(ahead)))
    };

    let open = config.open_hour * 60;
    let room = (24 * 60 - open).min(CLINIC_DAY_MINUTES);
    let slots = (room / config.slot_minutes).max(1);
    let minutes = open + rng.gen_range(0..slots) * config.slot_minutes;

    Slot {
        at: clock.at(day, minutes),
        kind,
        token: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn clock() -> SeedClock {
        let now = DateTime::parse_from_rfc3339("2026-02-06T14:25:00+05:30").unwrap();
        SeedClock::new(now)
    }

    #[test]
    fn test_day_bounds() {
        let clock = clock();
        assert_eq!(
            clock.start_of_today().to_rfc3339(),
            "2026-02-06T00:00:00+05:30"
        );
        assert_eq!(
            clock.start_of_tomorrow().to_rfc3339(),
            "2026-02-07T00:00:00+05:30"
        );
    }

    #[test]
    fn test_today_slots_are_distinct_and_within_day() {
        let clock = clock();
        let config = SeedConfig::default();
        let slots = today_slots(&clock, &config, 10);

        assert_eq!(slots.len(), 10);
        assert_eq!(slots[0].time_string(), "09:00");
        assert_eq!(slots[1].time_string(), "09:30");
        assert_eq!(slots[9].time_string(), "13:30");
        for (i, slot) in slots.iter().enumerate() {
            assert!(slot.at >= clock.start_of_today());
            assert!(slot.at < clock.start_of_tomorrow());
            assert_eq!(slot.token, Some(i as u32 + 1));
            assert_eq!(slot.date_string(), "2026-02-06");
        }
    }

    #[test]
    fn test_other_slots_stay_in_windows() {
        let clock = clock();
        let config = SeedConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        let mut saw_past = false;
        let mut saw_future = false;
        for _ in 0..200 {
            let slot = other_slot(&mut rng, &clock, &config);
            let days = (slot.at.date_naive() - clock.today()).num_days();
            match slot.kind {
                SlotKind::Past => {
                    saw_past = true;
                    assert!((-(config.past_window_days as i64)..=-1).contains(&days));
                    assert_eq!(slot.status(&mut rng), AppointmentStatus::Completed);
                }
                SlotKind::Future => {
                    saw_future = true;
                    assert!((1..=config.future_window_days as i64).contains(&days));
                    assert_eq!(slot.status(&mut rng), AppointmentStatus::Scheduled);
                }
                SlotKind::Today | SlotKind::LaterToday => panic!("other slot landed today"),
            }
            assert!(slot.token.is_none());
        }
        assert!(saw_past && saw_future);
    }

    #[test]
    fn test_slots_after_now_are_not_visited() {
        let now = DateTime::parse_from_rfc3339("2026-02-06T10:15:00+05:30").unwrap();
        let clock = SeedClock::new(now);
        let config = SeedConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        let slots = today_slots(&clock, &config, 10);
        let kinds: Vec<_> = slots.iter().map(|slot| slot.kind).collect();
        assert_eq!(&kinds[..3], &[SlotKind::Today; 3]);
        assert!(kinds[3..].iter().all(|&kind| kind == SlotKind::LaterToday));

        for slot in &slots[3..] {
            for _ in 0..20 {
                assert!(!slot.status(&mut rng).implies_visit());
            }
        }
    }

    #[test]
    fn test_today_status_never_cancelled() {
        let clock = clock();
        let config = SeedConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        for slot in today_slots(&clock, &config, 10) {
            assert_ne!(slot.status(&mut rng), AppointmentStatus::Cancelled);
        }
    }
}
