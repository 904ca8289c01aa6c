//! Next occurrence of a countdown event and the time left until it.
//!
//! All comparisons are at minute granularity and inclusive: an event due in
//! the current minute is still ahead, with nothing remaining.

use log::debug;

use crate::{
    DECEMBER, Error, JANUARY, MINUTES_PER_DAY, SECONDS_PER_MINUTE,
    countdown::{CountdownEvent, EventTarget, Recurrence},
    datetime::{SolarDate, SolarDateTime},
    prelude::*,
};

const DAYS_PER_WEEK: i32 = 7;

/// Unsigned time left, split for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[display(fmt = "{days}天{hours}时{minutes}分")]
pub struct Remaining {
    pub days:    u32,
    pub hours:   u8,
    pub minutes: u8,
    /// `60 - now.second`, or 0 on a whole minute. Independent of the other
    /// fields since targets carry no seconds.
    pub seconds: u8,
}

impl Remaining {
    #[allow(clippy::cast_possible_truncation)]
    fn from_minutes(minutes: u64, now_second: u8) -> Self {
        let minutes_per_day = MINUTES_PER_DAY.unsigned_abs();
        let minute_of_day = minutes % minutes_per_day;
        Self {
            days:    u32::try_from(minutes / minutes_per_day).unwrap_or(u32::MAX),
            hours:   (minute_of_day / 60) as u8,
            minutes: (minute_of_day % 60) as u8,
            seconds: match now_second {
                0 => 0,
                second => SECONDS_PER_MINUTE - second,
            },
        }
    }

    /// Days, hours and minutes folded back into minutes
    pub fn total_minutes(&self) -> i64 {
        i64::from(self.days) * MINUTES_PER_DAY + i64::from(self.hours) * 60 + i64::from(self.minutes)
    }

    /// Largest non-zero unit alone, as the big countdown layout shows it
    pub fn headline(&self) -> String {
        if self.days > 0 {
            format!("{}天", self.days)
        } else if self.hours > 0 {
            format!("{}小时", self.hours)
        } else {
            format!("{}分钟", self.minutes)
        }
    }
}

/// Where an event lands next, relative to a given "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownOccurrence {
    /// Always on a whole minute
    pub next:      SolarDateTime,
    pub remaining: Remaining,
    /// Only ever set for `Once` events whose target has gone by
    pub is_past:   bool,
}

impl CountdownOccurrence {
    /// Minutes until the occurrence, negative once it has passed
    pub fn signed_minutes(&self) -> i64 {
        let total = self.remaining.total_minutes();
        if self.is_past { -total } else { total }
    }
}

fn at(date: SolarDate, target: &EventTarget) -> Result<SolarDateTime, Error> {
    SolarDateTime::new(date, target.hour, target.minute, 0)
}

/// `candidate` unless it is already behind `now`, else whatever `later`
/// builds
fn not_before(
    candidate: SolarDateTime,
    now: &SolarDateTime,
    later: impl FnOnce() -> Result<SolarDateTime, Error>,
) -> Result<SolarDateTime, Error> {
    if candidate.total_minutes() >= now.total_minutes() {
        Ok(candidate)
    } else {
        later()
    }
}

fn resolve_next(recurrence: Recurrence, target: &EventTarget, now: &SolarDateTime) -> Result<SolarDateTime, Error> {
    let today = now.date();
    match recurrence {
        Recurrence::Once => {
            let year = target
                .year
                .ok_or_else(|| Error::InvalidRecurrence("one-off event needs a year".to_string()))?;
            at(SolarDate::new(year, target.month, target.day)?, target)
        },
        Recurrence::Yearly => {
            let this_year = at(SolarDate::clamped(today.year(), target.month, target.day)?, target)?;
            not_before(this_year, now, || {
                at(SolarDate::clamped(today.year() + 1, target.month, target.day)?, target)
            })
        },
        Recurrence::Monthly => {
            let this_month = at(SolarDate::clamped(today.year(), today.month(), target.day)?, target)?;
            not_before(this_month, now, || {
                let (year, month) = if today.month() == DECEMBER {
                    (today.year() + 1, JANUARY)
                } else {
                    (today.year(), today.month() + 1)
                };
                at(SolarDate::clamped(year, month, target.day)?, target)
            })
        },
        // Counted from now, so the weekday of the stored target plays no part
        Recurrence::Weekly => at(today.add_days(DAYS_PER_WEEK)?, target),
        Recurrence::Daily => {
            let later_today = at(today, target)?;
            not_before(later_today, now, || at(today.add_days(1)?, target))
        },
    }
}

/// Resolves the next time `event` fires at or after `now` and how far away
/// that is.
///
/// `Once` events resolve to their stored target even when it has passed;
/// the result is then flagged `is_past` with the elapsed time as remaining.
///
/// # Errors
/// `InvalidRecurrence` (or a date error for `Once`) when the target does not
/// fit the recurrence, and `YearOutOfRange` when the occurrence would fall
/// after 2100.
pub fn next_occurrence(event: &CountdownEvent, now: &SolarDateTime) -> Result<CountdownOccurrence, Error> {
    event.target.validate(event.recurrence)?;

    let next = resolve_next(event.recurrence, &event.target, now)?;
    let diff = next.total_minutes() - now.total_minutes();
    let occurrence = CountdownOccurrence {
        next,
        remaining: Remaining::from_minutes(diff.unsigned_abs(), now.second()),
        is_past: diff < 0,
    };

    debug!(
        "recurrence: {} \"{}\" next at {} ({}{})",
        event.recurrence,
        event.name,
        occurrence.next,
        occurrence.remaining,
        if occurrence.is_past { " ago" } else { "" }
    );
    Ok(occurrence)
}
