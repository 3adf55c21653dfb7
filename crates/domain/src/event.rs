use crate::shared::entity::{Entity, ID};
use thiserror::Error;

/// A `FestivalEvent` is a concert, talk or any other happening on the
/// festival programme that `User`s can ask to be reminded about.
#[derive(Debug, Clone, PartialEq)]
pub struct FestivalEvent {
    pub id: ID,
    pub title: String,
    /// Start of the event in millis
    pub start_ts: i64,
    /// End of the event in millis. Events without an end are open ended
    /// and are never considered to be over.
    pub end_ts: Option<i64>,
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidEventScheduleError {
    #[error("The end of the event: {end_ts} is before its start: {start_ts}")]
    EndsBeforeStart { start_ts: i64, end_ts: i64 },
}

impl FestivalEvent {
    pub fn is_over(&self, now: i64) -> bool {
        matches!(self.end_ts, Some(end_ts) if end_ts <= now)
    }

    /// Moves the event to a new start and end.
    pub fn reschedule(
        &mut self,
        start_ts: i64,
        end_ts: Option<i64>,
    ) -> Result<(), InvalidEventScheduleError> {
        if let Some(end_ts) = end_ts {
            if end_ts < start_ts {
                return Err(InvalidEventScheduleError::EndsBeforeStart { start_ts, end_ts });
            }
        }
        self.start_ts = start_ts;
        self.end_ts = end_ts;
        Ok(())
    }
}

impl Entity for FestivalEvent {
    fn id(&self) -> ID {
        self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn event(end_ts: Option<i64>) -> FestivalEvent {
        FestivalEvent {
            id: ID::from(1),
            title: "Closing night".into(),
            start_ts: 1000,
            end_ts,
        }
    }

    #[test]
    fn open_ended_events_are_never_over() {
        assert!(!event(None).is_over(i64::MAX));
    }

    #[test]
    fn events_are_over_from_their_end() {
        let e = event(Some(2000));
        assert!(!e.is_over(1999));
        assert!(e.is_over(2000));
        assert!(e.is_over(2001));
    }

    #[test]
    fn rejects_schedule_ending_before_start() {
        let mut e = event(Some(2000));
        assert!(e.reschedule(5000, Some(4000)).is_err());
        assert_eq!(e.start_ts, 1000);

        assert!(e.reschedule(5000, Some(5000)).is_ok());
        assert_eq!(e.start_ts, 5000);
        assert_eq!(e.end_ts, Some(5000));

        assert!(e.reschedule(6000, None).is_ok());
        assert_eq!(e.end_ts, None);
    }
}
