mod date;
mod reminder;
mod shared;

pub use date::{InvalidSweepScheduleError, SweepSchedule};
pub use reminder::{DueDatePolicy, FailedAttempt, NewReminder, Reminder, RetryPolicy};
pub use shared::entity::{Entity, ID};
