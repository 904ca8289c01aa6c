//! Calendar core for a battery-powered e-paper clock.
//!
//! Converts Gregorian dates to the Chinese lunar calendar (1900-2100),
//! resolves festivals and the 24 solar terms, keeps a bounded list of
//! countdown events with recurrence rules and picks the next one to show.
//! Everything is integer arithmetic over a fixed table and is exactly
//! reproducible.
//!
//! "Now" is an explicit [`ClockState`] owned by the caller; the [`Engine`]
//! owns the countdown store and display configuration and turns both into
//! a [`DisplaySnapshot`] for the renderer.

mod clock;
mod consts;
mod countdown;
mod datetime;
mod display;
mod engine;
mod festival;
mod lunar;
mod lunar_table;
mod prelude;
mod recurrence;
mod selector;
mod template;
mod types;

#[cfg(test)]
mod test_utils;

pub use clock::{ClockState, TickChange};
pub use consts::*;
pub use countdown::{CountdownEvent, CountdownStore, EventTarget, Recurrence};
pub use datetime::{SolarDate, SolarDateTime, is_valid_date};
pub use display::{CalendarStyle, DisplayConfig, DisplayMode, DisplaySnapshot, MonthGrid, TimeStyle, month_grid};
pub use engine::{Command, Engine, EventPersistence, NullPersistence, Outcome};
pub use festival::{
    FestivalEntry, FestivalTrigger, Observances, SOLAR_TERMS, SolarTermEntry, festival, festivals_on, resolve,
    solar_term, solar_term_index,
};
pub use lunar::{LunarDate, Zodiac, solar_to_lunar};
pub use lunar_table::{LunarMonthSpan, LunarTable, LunarYearInfo};
pub use recurrence::{CountdownOccurrence, Remaining, next_occurrence};
pub use selector::{NextEvent, next_event};
pub use template::expand_template;
pub use types::{Day, Month, Weekday, Year, is_leap_year};

/// Every failure the calendar core reports.
///
/// All conditions are local and recoverable; nothing here is fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Year outside the lunar table.
    #[error("Year {0} out of range (must be {min}-{max})", min = MIN_YEAR, max = MAX_YEAR)]
    YearOutOfRange(u16),

    #[error("Invalid month: {0} (must be 1-{max})", max = MAX_MONTH)]
    InvalidMonth(u8),

    /// Day past the end of its month, or zero.
    #[error("Invalid day {day} for month {year}-{month:02}")]
    DayOutOfRange { year: u16, month: u8, day: u8 },

    /// Solar date earlier than the first lunar new year the table covers.
    #[error("Date {0} is before the lunar epoch")]
    BeforeEpoch(SolarDate),

    #[error("Invalid time {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u8, minute: u8, second: u8 },

    #[error("Index {index} out of range (store holds {count} events)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Countdown store is full ({capacity} events)")]
    CapacityExceeded { capacity: usize },

    /// Malformed recurrence target.
    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("{field} is {len} bytes long (max {max})")]
    TextTooLong { field: &'static str, len: usize, max: usize },

    #[error("Invalid priority: {0} (must be {min}-{max})", min = MIN_PRIORITY, max = MAX_PRIORITY)]
    InvalidPriority(u8),

    #[error("Invalid display configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid date format: {0}")]
    InvalidFormat(String),

    #[error("Empty date string")]
    EmptyInput,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
