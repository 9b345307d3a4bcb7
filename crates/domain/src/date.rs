use chrono::{NaiveTime, Timelike};
use std::str::FromStr;
use thiserror::Error;

const MILLIS_IN_DAY: i64 = 1000 * 60 * 60 * 24;

/// Times of day (UTC) at which pending reminders are swept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepSchedule {
    times: Vec<NaiveTime>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidSweepScheduleError {
    #[error("Sweep time: `{0}` is malformed, expected HH:MM")]
    Malformed(String),
    #[error("At least one sweep time has to be provided")]
    Empty,
}

impl SweepSchedule {
    pub fn new(mut times: Vec<NaiveTime>) -> Result<Self, InvalidSweepScheduleError> {
        if times.is_empty() {
            return Err(InvalidSweepScheduleError::Empty);
        }
        times.sort();
        times.dedup();
        Ok(Self { times })
    }

    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    /// Millis from `now_ts` until the next sweep. A sweep scheduled
    /// exactly at `now_ts` counts as already fired.
    pub fn millis_until_next_run(&self, now_ts: i64) -> i64 {
        let time_of_day = now_ts.rem_euclid(MILLIS_IN_DAY);
        let offsets = self
            .times
            .iter()
            .map(|t| t.num_seconds_from_midnight() as i64 * 1000);

        let mut first = None;
        for offset in offsets {
            if first.is_none() {
                first = Some(offset);
            }
            if offset > time_of_day {
                return offset - time_of_day;
            }
        }
        // Next run is the first one tomorrow
        first.unwrap_or(0) + MILLIS_IN_DAY - time_of_day
    }
}

impl FromStr for SweepSchedule {
    type Err = InvalidSweepScheduleError;

    /// Parses times separated by `;` or `,`, e.g. "08:00;12:00;18:00"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let times = s
            .split(|c| c == ';' || c == ',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                NaiveTime::parse_from_str(t, "%H:%M")
                    .map_err(|_| InvalidSweepScheduleError::Malformed(t.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(times)
    }
}

impl Default for SweepSchedule {
    fn default() -> Self {
        Self {
            times: vec![
                NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default(),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            ],
        }
    }
}
