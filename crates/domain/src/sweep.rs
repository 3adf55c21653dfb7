/// The span of fire times a single reminder sweep delivers.
///
/// Reminders firing in `(from, to]` are due. The backward tolerance catches
/// reminders missed by a delayed or skipped sweep, the lookahead lets a sweep
/// deliver reminders shortly before they are due. A forced sweep ignores the
/// lower bound and delivers everything up to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepWindow {
    pub from: i64,
    pub to: i64,
    pub force: bool,
}

impl SweepWindow {
    pub fn new(now: i64, drift_back_millis: i64, lookahead_millis: i64, force: bool) -> Self {
        Self {
            from: now - drift_back_millis,
            to: now + lookahead_millis,
            force,
        }
    }

    /// Lower exclusive bound of the selection, `None` for a forced sweep
    pub fn lower_bound(&self) -> Option<i64> {
        if self.force {
            None
        } else {
            Some(self.from)
        }
    }

    pub fn contains(&self, remind_at: i64) -> bool {
        remind_at <= self.to && self.lower_bound().map_or(true, |from| remind_at > from)
    }
}
