use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    Error, HOURS_PER_DAY, MAX_COUNTDOWN_EVENTS, MAX_EVENT_DESC_LEN, MAX_EVENT_NAME_LEN, MAX_MONTH, MAX_PRIORITY,
    MINUTES_PER_HOUR, MIN_DAY, MIN_PRIORITY, datetime::SolarDate, prelude::*, types::days_in_month,
};

/// Priority given to events built with [`CountdownEvent::new`]
const DEFAULT_PRIORITY: u8 = 5;

/// Any leap year; yearly targets may name Feb 29
const LEAP_REFERENCE_YEAR: u16 = 2000;

const MAX_MONTH_DAYS: u8 = 31;

/// How a countdown event repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// Exactly the stored date and time; may lie in the past
    #[display(fmt = "once")]
    Once,
    #[display(fmt = "yearly")]
    Yearly,
    /// Day of month, clamped to short months
    #[display(fmt = "monthly")]
    Monthly,
    /// Seven days from now at the stored time
    #[display(fmt = "weekly")]
    Weekly,
    #[display(fmt = "daily")]
    Daily,
}

/// Minute-granular target of a countdown.
///
/// Which fields matter depends on the recurrence: `Once` uses all of them,
/// `Yearly` ignores the year, `Monthly` only reads the day, and `Weekly`
/// and `Daily` only read the time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year:   Option<u16>,
    pub month:  u8,
    pub day:    u8,
    pub hour:   u8,
    pub minute: u8,
}

impl EventTarget {
    pub const fn once(year: u16, month: u8, day: u8, hour: u8, minute: u8) -> Self {
        Self {
            year: Some(year),
            month,
            day,
            hour,
            minute,
        }
    }

    pub const fn yearly(month: u8, day: u8, hour: u8, minute: u8) -> Self {
        Self {
            year: None,
            month,
            day,
            hour,
            minute,
        }
    }

    pub const fn monthly(day: u8, hour: u8, minute: u8) -> Self {
        Self::yearly(1, day, hour, minute)
    }

    /// Time of day only, for weekly and daily events
    pub const fn time(hour: u8, minute: u8) -> Self {
        Self::yearly(1, 1, hour, minute)
    }

    /// Checks the fields `recurrence` reads
    ///
    /// # Errors
    /// `InvalidRecurrence` for an impossible time, month or day, or a `Once`
    /// target without a year. A `Once` target on a date that does not exist
    /// fails the way [`SolarDate::new`] does.
    pub fn validate(&self, recurrence: Recurrence) -> Result<(), Error> {
        if self.hour >= HOURS_PER_DAY || self.minute >= MINUTES_PER_HOUR {
            return Err(Error::InvalidRecurrence(format!(
                "time {:02}:{:02} does not exist",
                self.hour, self.minute
            )));
        }

        match recurrence {
            Recurrence::Once => {
                let year = self
                    .year
                    .ok_or_else(|| Error::InvalidRecurrence("one-off event needs a year".to_string()))?;
                self.check_month()?;
                SolarDate::new(year, self.month, self.day).map(|_| ())
            },
            Recurrence::Yearly => {
                self.check_month()?;
                let max = days_in_month(LEAP_REFERENCE_YEAR, self.month);
                self.check_day(max)
            },
            Recurrence::Monthly => self.check_day(MAX_MONTH_DAYS),
            Recurrence::Weekly | Recurrence::Daily => Ok(()),
        }
    }

    fn check_month(&self) -> Result<(), Error> {
        if self.month == 0 || self.month > MAX_MONTH {
            return Err(Error::InvalidRecurrence(format!("month {} does not exist", self.month)));
        }
        Ok(())
    }

    fn check_day(&self, max: u8) -> Result<(), Error> {
        if self.day < MIN_DAY || self.day > max {
            return Err(Error::InvalidRecurrence(format!(
                "day {} outside 1-{max} for month {}",
                self.day, self.month
            )));
        }
        Ok(())
    }
}

/// A user countdown event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountdownEvent {
    pub enabled:      bool,
    pub recurrence:   Recurrence,
    pub target:       EventTarget,
    pub name:         String,
    #[serde(default)]
    pub description:  String,
    pub priority:     u8,
    #[serde(default)]
    pub show_on_main: bool,
}

impl CountdownEvent {
    /// Enabled event shown on the main screen with a middle priority
    pub fn new(name: impl Into<String>, recurrence: Recurrence, target: EventTarget) -> Self {
        Self {
            enabled: true,
            recurrence,
            target,
            name: name.into(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
            show_on_main: true,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Checks the target against the recurrence and the text and priority
    /// limits.
    ///
    /// # Errors
    /// See [`EventTarget::validate`]; `TextTooLong` for the name or
    /// description; `InvalidPriority` outside 1-10.
    pub fn validate(&self) -> Result<(), Error> {
        self.target.validate(self.recurrence)?;
        check_len("name", &self.name, MAX_EVENT_NAME_LEN)?;
        check_len("description", &self.description, MAX_EVENT_DESC_LEN)?;
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(Error::InvalidPriority(self.priority));
        }
        Ok(())
    }
}

fn check_len(field: &'static str, text: &str, max: usize) -> Result<(), Error> {
    if text.len() > max {
        return Err(Error::TextTooLong {
            field,
            len: text.len(),
            max,
        });
    }
    Ok(())
}

/// Fixed-capacity, densely packed list of countdown events.
///
/// Indices are positions: removing an event shifts every later event down
/// by one, so `0..count()` is always occupied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountdownStore {
    slots: [Option<CountdownEvent>; MAX_COUNTDOWN_EVENTS],
    len:   usize,
}

impl CountdownStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validated event and returns its index. Stored events start
    /// enabled.
    ///
    /// # Errors
    /// Validation errors from [`CountdownEvent::validate`], or
    /// `CapacityExceeded` when all slots are taken.
    pub fn add(&mut self, mut event: CountdownEvent) -> Result<usize, Error> {
        event.validate()?;
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                capacity: MAX_COUNTDOWN_EVENTS,
            });
        }

        event.enabled = true;
        let index = self.len;
        info!("countdown: added \"{}\" ({}) at {index}", event.name, event.recurrence);
        self.slots[index] = Some(event);
        self.len += 1;
        Ok(index)
    }

    /// Removes the event at `index` and returns it
    ///
    /// # Errors
    /// `IndexOutOfRange` when `index >= count()`.
    pub fn remove(&mut self, index: usize) -> Result<CountdownEvent, Error> {
        let count = self.len;
        let removed = self
            .slots
            .get_mut(..count)
            .and_then(|live| live.get_mut(index))
            .and_then(Option::take)
            .ok_or(Error::IndexOutOfRange { index, count })?;

        // Moves the emptied slot to the tail
        self.slots[index..count].rotate_left(1);
        self.len -= 1;
        info!("countdown: removed \"{}\" from {index}", removed.name);
        Ok(removed)
    }

    /// Replaces the event at `index`
    ///
    /// # Errors
    /// Validation errors from [`CountdownEvent::validate`], or
    /// `IndexOutOfRange` when `index >= count()`.
    pub fn update(&mut self, index: usize, event: CountdownEvent) -> Result<(), Error> {
        event.validate()?;
        let count = self.len;
        let slot = self
            .slots
            .get_mut(..count)
            .and_then(|live| live.get_mut(index))
            .ok_or(Error::IndexOutOfRange { index, count })?;

        info!("countdown: updated {index} to \"{}\"", event.name);
        *slot = Some(event);
        Ok(())
    }

    /// Turns the event at `index` on or off without touching anything else
    ///
    /// # Errors
    /// `IndexOutOfRange` when `index >= count()`.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<(), Error> {
        let count = self.len;
        let event = self
            .slots
            .get_mut(..count)
            .and_then(|live| live.get_mut(index))
            .and_then(Option::as_mut)
            .ok_or(Error::IndexOutOfRange { index, count })?;

        event.enabled = enabled;
        info!("countdown: {} \"{}\"", if enabled { "enabled" } else { "disabled" }, event.name);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&CountdownEvent> {
        self.slots.get(..self.len)?.get(index)?.as_ref()
    }

    pub const fn count(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        MAX_COUNTDOWN_EVENTS
    }

    pub const fn is_full(&self) -> bool {
        self.len >= MAX_COUNTDOWN_EVENTS
    }

    /// Events in index order
    pub fn iter(&self) -> impl Iterator<Item = &CountdownEvent> {
        self.slots.iter().take(self.len).flatten()
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
        self.len = 0;
    }

    /// Copy of every event, in index order, for persistence
    pub fn to_vec(&self) -> Vec<CountdownEvent> {
        self.iter().cloned().collect()
    }
}
