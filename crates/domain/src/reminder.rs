use crate::{
    event::FestivalEvent,
    shared::entity::{Entity, ID},
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

const MILLIS_PER_MINUTE: i64 = 60 * 1000;

/// A `Reminder` represents one `User`s wish to be notified a fixed number
/// of minutes before a `FestivalEvent` starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The `User` that should be notified at `remind_at`
    pub user_id: ID,
    /// The `FestivalEvent` this `Reminder` is associated with
    pub event_id: ID,
    pub delay: ReminderDelay,
    /// The timestamp in millis at which the `User` should be notified.
    /// Always `event.start_ts - delay` at the time the `Reminder` was
    /// (re)activated or the event rescheduled.
    pub remind_at: i64,
    /// Inactive reminders are never delivered. A delivered or cancelled
    /// `Reminder` is deactivated and only comes back when the `User`
    /// activates reminders for the event again.
    pub active: bool,
}

impl Entity for Reminder {
    fn id(&self) -> ID {
        self.id
    }
}

/// How long before the start of an event a `Reminder` fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ReminderDelay {
    SixtyMinutes,
    ThirtyMinutes,
    FifteenMinutes,
}

#[derive(Error, Debug, PartialEq)]
#[error("{0} minutes is not a supported reminder delay, expected one of 60, 30 or 15")]
pub struct InvalidReminderDelay(pub i64);

impl ReminderDelay {
    /// Every delay a reminder activation tries to schedule, longest first
    pub const ALL: [ReminderDelay; 3] = [
        ReminderDelay::SixtyMinutes,
        ReminderDelay::ThirtyMinutes,
        ReminderDelay::FifteenMinutes,
    ];

    pub fn minutes(&self) -> i64 {
        match self {
            Self::SixtyMinutes => 60,
            Self::ThirtyMinutes => 30,
            Self::FifteenMinutes => 15,
        }
    }

    pub fn millis(&self) -> i64 {
        self.minutes() * MILLIS_PER_MINUTE
    }

    pub fn remind_at(&self, event_start_ts: i64) -> i64 {
        event_start_ts - self.millis()
    }

    /// Human readable list of delays, longest first: `60 / 30 / 15`
    pub fn describe(delays: &[ReminderDelay]) -> String {
        delays
            .iter()
            .sorted()
            .dedup()
            .map(|d| d.minutes())
            .join(" / ")
    }
}

impl TryFrom<i64> for ReminderDelay {
    type Error = InvalidReminderDelay;

    fn try_from(minutes: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .find(|d| d.minutes() == minutes)
            .copied()
            .ok_or(InvalidReminderDelay(minutes))
    }
}

impl From<ReminderDelay> for i64 {
    fn from(delay: ReminderDelay) -> Self {
        delay.minutes()
    }
}

impl Display for ReminderDelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.minutes())
    }
}

/// A not yet passed point in time at which a `Reminder` can be scheduled
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderSlot {
    pub delay: ReminderDelay,
    pub remind_at: i64,
}

#[derive(Error, Debug, PartialEq)]
pub enum ReminderPlanError {
    #[error("The event is already over")]
    EventOver,
    #[error("All reminder slots (60/30/15) have already passed for this event")]
    AllSlotsPassed,
}

/// Computes the `ReminderSlot`s that can still be scheduled for the event.
///
/// A slot is kept only when it fires strictly after `now + safety_margin_millis`,
/// so that nothing is scheduled to fire immediately or in the past.
pub fn plan_reminder_slots(
    event: &FestivalEvent,
    now: i64,
    safety_margin_millis: i64,
) -> Result<Vec<ReminderSlot>, ReminderPlanError> {
    if event.is_over(now) {
        return Err(ReminderPlanError::EventOver);
    }

    let threshold = now + safety_margin_millis;
    let slots = ReminderDelay::ALL
        .iter()
        .map(|delay| ReminderSlot {
            delay: *delay,
            remind_at: delay.remind_at(event.start_ts),
        })
        .filter(|slot| slot.remind_at > threshold)
        .collect::<Vec<_>>();

    if slots.is_empty() {
        return Err(ReminderPlanError::AllSlotsPassed);
    }
    Ok(slots)
}

/// Why a cancellation did not disable anything
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CancellationNote {
    /// The `User` never activated reminders for the event
    NoReminderFound,
    /// Reminders exist but were already delivered or cancelled
    NoActiveReminder,
}

impl CancellationNote {
    pub fn from_counts(disabled_count: u64, existing_count: u64) -> Option<Self> {
        if disabled_count > 0 {
            None
        } else if existing_count > 0 {
            Some(Self::NoActiveReminder)
        } else {
            Some(Self::NoReminderFound)
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::NoReminderFound => "No reminder found for this event",
            Self::NoActiveReminder => "No active reminder to disable",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MINUTE: i64 = MILLIS_PER_MINUTE;
    const NOW: i64 = 1_700_000_000_000;
    const MARGIN: i64 = 15 * 1000;

    fn event_starting_in(minutes: i64) -> FestivalEvent {
        FestivalEvent {
            id: ID::from(10),
            title: "Sunset set".into(),
            start_ts: NOW + minutes * MINUTE,
            end_ts: Some(NOW + (minutes + 90) * MINUTE),
        }
    }

    fn delays(slots: &[ReminderSlot]) -> Vec<i64> {
        slots.iter().map(|s| s.delay.minutes()).collect()
    }

    #[test]
    fn plans_all_slots_for_far_away_event() {
        let event = event_starting_in(90);
        let slots = plan_reminder_slots(&event, NOW, MARGIN).unwrap();
        assert_eq!(delays(&slots), vec![60, 30, 15]);
        assert_eq!(slots[0].remind_at, event.start_ts - 60 * MINUTE);
        assert_eq!(slots[2].remind_at, event.start_ts - 15 * MINUTE);
    }

    #[test]
    fn skips_passed_slots() {
        let slots = plan_reminder_slots(&event_starting_in(45), NOW, MARGIN).unwrap();
        assert_eq!(delays(&slots), vec![30, 15]);

        let slots = plan_reminder_slots(&event_starting_in(20), NOW, MARGIN).unwrap();
        assert_eq!(delays(&slots), vec![15]);
    }

    #[test]
    fn fails_when_every_slot_has_passed() {
        for minutes in [5, 10, 15] {
            assert_eq!(
                plan_reminder_slots(&event_starting_in(minutes), NOW, MARGIN),
                Err(ReminderPlanError::AllSlotsPassed)
            );
        }
    }

    #[test]
    fn respects_the_safety_margin() {
        // The 15 minute slot fires exactly at the margin
        let mut event = event_starting_in(15);
        event.start_ts += MARGIN;
        assert_eq!(
            plan_reminder_slots(&event, NOW, MARGIN),
            Err(ReminderPlanError::AllSlotsPassed)
        );

        event.start_ts += 1;
        let slots = plan_reminder_slots(&event, NOW, MARGIN).unwrap();
        assert_eq!(delays(&slots), vec![15]);
    }

    #[test]
    fn fails_when_event_is_over() {
        let mut event = event_starting_in(-120);
        event.end_ts = Some(NOW);
        assert_eq!(
            plan_reminder_slots(&event, NOW, MARGIN),
            Err(ReminderPlanError::EventOver)
        );
    }

    #[test]
    fn ongoing_event_has_no_slots_left() {
        let mut event = event_starting_in(-10);
        event.end_ts = None;
        assert_eq!(
            plan_reminder_slots(&event, NOW, MARGIN),
            Err(ReminderPlanError::AllSlotsPassed)
        );
    }

    #[test]
    fn converts_delays() {
        assert_eq!(ReminderDelay::try_from(30), Ok(ReminderDelay::ThirtyMinutes));
        assert_eq!(ReminderDelay::try_from(45), Err(InvalidReminderDelay(45)));
        assert_eq!(i64::from(ReminderDelay::SixtyMinutes), 60);
        assert_eq!(serde_json::to_string(&ReminderDelay::FifteenMinutes).unwrap(), "15");
        assert!(serde_json::from_str::<ReminderDelay>("20").is_err());
    }

    #[test]
    fn describes_delays_longest_first() {
        let described = ReminderDelay::describe(&[
            ReminderDelay::FifteenMinutes,
            ReminderDelay::SixtyMinutes,
            ReminderDelay::ThirtyMinutes,
            ReminderDelay::FifteenMinutes,
        ]);
        assert_eq!(described, "60 / 30 / 15");
    }

    #[test]
    fn cancellation_notes() {
        assert_eq!(CancellationNote::from_counts(2, 3), None);
        assert_eq!(
            CancellationNote::from_counts(0, 3),
            Some(CancellationNote::NoActiveReminder)
        );
        assert_eq!(
            CancellationNote::from_counts(0, 0),
            Some(CancellationNote::NoReminderFound)
        );
    }
}
