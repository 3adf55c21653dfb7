use crate::error::FestError;
use aurora_fest_domain::ReminderDelay;

pub struct Guard {}

impl Guard {
    pub fn against_invalid_delay(minutes: i64) -> Result<ReminderDelay, FestError> {
        ReminderDelay::try_from(minutes).map_err(|e| FestError::BadClientData(e.to_string()))
    }
}
