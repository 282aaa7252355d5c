//! Task scheduling fields and recurrence arithmetic.

use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// How a repeating task computes its next occurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// Shift every date by the repeat interval.
    #[default]
    Interval,
    /// Shift every date by one calendar month.
    Monthly,
    /// Restart the schedule from the completion time.
    FromCurrentDate,
}

/// Recurrence rule of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recurrence {
    /// Interval in seconds; zero means none.
    pub interval_seconds: u64,
    /// Interpretation of the interval.
    pub mode: RepeatMode,
}

impl Recurrence {
    /// A task that does not repeat.
    pub const NONE: Self = Self {
        interval_seconds: 0,
        mode: RepeatMode::Interval,
    };

    /// Repeats every `seconds`.
    #[must_use]
    pub const fn every(seconds: u64) -> Self {
        Self {
            interval_seconds: seconds,
            mode: RepeatMode::Interval,
        }
    }

    /// Repeats on the same day of every month.
    #[must_use]
    pub const fn monthly() -> Self {
        Self {
            interval_seconds: 0,
            mode: RepeatMode::Monthly,
        }
    }

    /// Repeats `seconds` after each completion.
    #[must_use]
    pub const fn from_current_date(seconds: u64) -> Self {
        Self {
            interval_seconds: seconds,
            mode: RepeatMode::FromCurrentDate,
        }
    }

    /// Returns `true` when completing the task schedules another occurrence.
    #[must_use]
    pub const fn is_repeating(self) -> bool {
        self.interval_seconds > 0 || matches!(self.mode, RepeatMode::Monthly)
    }

    fn step(self) -> Option<TimeDelta> {
        i64::try_from(self.interval_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .filter(|step| *step > TimeDelta::zero())
    }
}

/// Date fields that a recurrence shifts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskSchedule {
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Start date.
    pub start_date: Option<DateTime<Utc>>,
    /// End date.
    pub end_date: Option<DateTime<Utc>>,
}

impl TaskSchedule {
    /// Creates a schedule with only a due date.
    #[must_use]
    pub const fn due(due_date: DateTime<Utc>) -> Self {
        Self {
            due_date: Some(due_date),
            start_date: None,
            end_date: None,
        }
    }

    /// Sets the start and end dates.
    #[must_use]
    pub const fn with_span(mut self, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self
    }

    /// Computes the schedule of the next occurrence.
    ///
    /// Only dates that are set move. When both start and end are set, the
    /// end keeps its distance to the start. With `catch_up`, interval
    /// recurrences keep stepping until each date lies after `now`; otherwise
    /// they advance exactly once.
    #[must_use]
    pub fn next_occurrence(
        &self,
        recurrence: Recurrence,
        now: DateTime<Utc>,
        catch_up: bool,
    ) -> Self {
        match recurrence.mode {
            RepeatMode::Interval => recurrence.step().map_or(*self, |step| {
                self.shift_with(|date| advance_by(date, step, now, catch_up))
            }),
            RepeatMode::Monthly => self.shift_with(|date| {
                date.checked_add_months(Months::new(1)).unwrap_or(date)
            }),
            RepeatMode::FromCurrentDate => recurrence.step().map_or(*self, |step| {
                let restart = now.checked_add_signed(step).unwrap_or(now);
                self.shift_with(|_| restart)
            }),
        }
    }

    fn shift_with(&self, shift: impl Fn(DateTime<Utc>) -> DateTime<Utc>) -> Self {
        let (start_date, end_date) = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                let span = end.signed_duration_since(start);
                let next_start = shift(start);
                let next_end = next_start.checked_add_signed(span).unwrap_or(next_start);
                (Some(next_start), Some(next_end))
            }
            (start, end) => (start.map(&shift), end.map(&shift)),
        };
        Self {
            due_date: self.due_date.map(&shift),
            start_date,
            end_date,
        }
    }
}

fn advance_by(
    date: DateTime<Utc>,
    step: TimeDelta,
    now: DateTime<Utc>,
    catch_up: bool,
) -> DateTime<Utc> {
    let next = date.checked_add_signed(step).unwrap_or(date);
    if catch_up {
        roll_past(next, step, now)
    } else {
        next
    }
}

/// Adds whole steps to `date` until it lies strictly after `now`.
#[expect(
    clippy::integer_division,
    reason = "counting whole missed intervals; the remainder is intentionally dropped"
)]
fn roll_past(date: DateTime<Utc>, step: TimeDelta, now: DateTime<Utc>) -> DateTime<Utc> {
    if date > now {
        return date;
    }
    let step_seconds = step.num_seconds().max(1);
    let behind = now.signed_duration_since(date).num_seconds();
    (behind / step_seconds)
        .checked_add(1)
        .and_then(|missed| missed.checked_mul(step_seconds))
        .and_then(TimeDelta::try_seconds)
        .and_then(|offset| date.checked_add_signed(offset))
        .unwrap_or(date)
}
