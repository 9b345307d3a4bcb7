use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A `Reminder` is a message a user sent to the bot which should be
/// delivered back to that user once it becomes due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ID,
    /// Timestamp in millis at which the `Reminder` was received
    pub created: i64,
    /// The user who asked to be reminded and who will receive the `Reminder`
    pub user_number: String,
    /// The business account (phone number id) the message was received on.
    /// The `Reminder` is delivered back through the same account.
    pub business_number: String,
    /// Display name of the user at the time of intake, possibly empty
    pub user_name: String,
    /// The text that will be sent back to the user
    pub text: String,
    /// Timestamp in millis after which the `Reminder` can be delivered
    pub due_at: i64,
    /// Set once the messaging provider has accepted the `Reminder`.
    /// Never goes back to false.
    pub delivered: bool,
    /// Number of failed delivery attempts
    pub delivery_attempts: i64,
    /// After a failed attempt the `Reminder` will not be retried before this timestamp
    pub next_attempt_at: Option<i64>,
    /// The `Reminder` has used up all of its delivery attempts and will not be retried
    pub dead_lettered: bool,
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Reminder {
    /// Whether this `Reminder` should be sent by a sweep running at `now`
    pub fn is_eligible(&self, now: i64) -> bool {
        if self.delivered || self.dead_lettered {
            return false;
        }
        if now < self.due_at {
            return false;
        }
        match self.next_attempt_at {
            Some(next_attempt_at) => now >= next_attempt_at,
            None => true,
        }
    }

    /// Returns false if the `Reminder` was already delivered or dead lettered
    pub fn mark_delivered(&mut self) -> bool {
        if self.delivered || self.dead_lettered {
            return false;
        }
        self.delivered = true;
        self.next_attempt_at = None;
        true
    }

    pub fn record_failed_attempt(&mut self, attempt: &FailedAttempt) {
        if self.delivered {
            return;
        }
        self.delivery_attempts += 1;
        self.next_attempt_at = Some(attempt.next_attempt_at);
        self.dead_lettered = self.dead_lettered || attempt.dead_letter;
    }
}

/// A `Reminder` which has not been persisted yet and therefore has no `ID`
#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    pub created: i64,
    pub user_number: String,
    pub business_number: String,
    pub user_name: String,
    pub text: String,
    pub due_at: i64,
}

impl NewReminder {
    pub fn into_reminder(self, id: ID) -> Reminder {
        Reminder {
            id,
            created: self.created,
            user_number: self.user_number,
            business_number: self.business_number,
            user_name: self.user_name,
            text: self.text,
            due_at: self.due_at,
            delivered: false,
            delivery_attempts: 0,
            next_attempt_at: None,
            dead_lettered: false,
        }
    }
}

/// Decides when a newly received `Reminder` becomes due.
///
/// Reminder texts are not parsed for a time, so this is a fixed offset from
/// the moment the message was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDatePolicy {
    /// Due as soon as it is received, picked up by the next sweep
    Immediate,
    /// Due the given amount of millis after it was received
    Delay(i64),
}

impl DueDatePolicy {
    pub fn from_delay_millis(delay: i64) -> Self {
        if delay <= 0 {
            Self::Immediate
        } else {
            Self::Delay(delay)
        }
    }

    pub fn due_at(&self, received: i64) -> i64 {
        match self {
            Self::Immediate => received,
            Self::Delay(delay) => received.saturating_add(*delay),
        }
    }
}

impl Default for DueDatePolicy {
    fn default() -> Self {
        Self::Immediate
    }
}

/// Outcome of a failed delivery as decided by the `RetryPolicy`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedAttempt {
    /// Total number of failed attempts including this one
    pub attempts: i64,
    pub next_attempt_at: i64,
    pub dead_letter: bool,
}

/// Exponential backoff between failed deliveries, with an optional
/// limit on the number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 0 means the `Reminder` is retried forever
    pub max_attempts: i64,
    /// Delay in millis after the first failure, doubled for every following failure
    pub backoff_base: i64,
    /// Upper bound in millis for the delay between two attempts
    pub backoff_max: i64,
}

impl RetryPolicy {
    pub fn on_failure(&self, previous_attempts: i64, now: i64) -> FailedAttempt {
        let attempts = previous_attempts.max(0) + 1;
        let exp = (attempts - 1).clamp(0, 32) as u32;
        let delay = self
            .backoff_base
            .max(0)
            .saturating_mul(2i64.saturating_pow(exp))
            .min(self.backoff_max.max(0));

        FailedAttempt {
            attempts,
            next_attempt_at: now.saturating_add(delay),
            dead_letter: self.max_attempts > 0 && attempts >= self.max_attempts,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff_base: 1000 * 60 * 60,        // 1 hour
            backoff_max: 1000 * 60 * 60 * 24 * 2, // 2 days
        }
    }
}
