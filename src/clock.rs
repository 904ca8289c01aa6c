use log::{info, trace};

use crate::{
    Error, SECONDS_PER_MINUTE,
    datetime::SolarDateTime,
    lunar::{LunarDate, solar_to_lunar},
    prelude::*,
    types::Weekday,
};

const MINUTES_PER_REFRESH_BLOCK: i64 = 10;

/// Largest boundary a tick crossed; drives how much of the screen to redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum TickChange {
    #[display(fmt = "none")]
    None,
    #[display(fmt = "minute")]
    Minute,
    #[display(fmt = "ten minutes")]
    TenMinutes,
    #[display(fmt = "hour")]
    Hour,
    #[display(fmt = "day")]
    Day,
}

impl TickChange {
    fn between(before: &SolarDateTime, after: &SolarDateTime) -> Self {
        let (old, new) = (before.total_minutes(), after.total_minutes());
        if before.date() != after.date() {
            Self::Day
        } else if before.hour() != after.hour() {
            Self::Hour
        } else if old / MINUTES_PER_REFRESH_BLOCK != new / MINUTES_PER_REFRESH_BLOCK {
            Self::TenMinutes
        } else if old != new {
            Self::Minute
        } else {
            Self::None
        }
    }
}

/// The clock's idea of "now" and the lunar date that goes with it.
///
/// Owned by the caller and changed only by [`set`](Self::set) (a time sync)
/// and [`tick`](Self::tick). The lunar date is recomputed only when the
/// calendar date changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    now:   SolarDateTime,
    lunar: LunarDate,
}

impl ClockState {
    /// # Errors
    /// Returns `Error::BeforeEpoch` for a date the lunar table does not
    /// cover.
    pub fn new(now: SolarDateTime) -> Result<Self, Error> {
        let lunar = solar_to_lunar(now.date())?;
        Ok(Self { now, lunar })
    }

    /// Re-syncs to an absolute time. The state is unchanged on error.
    ///
    /// # Errors
    /// See [`ClockState::new`].
    pub fn set(&mut self, now: SolarDateTime) -> Result<(), Error> {
        *self = Self::new(now)?;
        info!("clock: set to {now} (lunar {})", self.lunar);
        Ok(())
    }

    /// Advances by `seconds`, rolling over minutes, hours, days, months and
    /// years. The state is unchanged on error.
    ///
    /// # Errors
    /// Returns `Error::YearOutOfRange` when the clock would run past 2100.
    pub fn tick(&mut self, seconds: u32) -> Result<TickChange, Error> {
        let carried = u64::from(self.now.second()) + u64::from(seconds);
        let per_minute = u64::from(SECONDS_PER_MINUTE);
        let minutes = i64::try_from(carried / per_minute).map_err(|_| Error::YearOutOfRange(u16::MAX))?;
        #[allow(clippy::cast_possible_truncation)]
        let second = (carried % per_minute) as u8;

        let moved = self.now.add_minutes(minutes)?;
        let next = SolarDateTime::new(moved.date(), moved.hour(), moved.minute(), second)?;
        let lunar = if next.date() == self.now.date() {
            self.lunar
        } else {
            solar_to_lunar(next.date())?
        };

        let change = TickChange::between(&self.now, &next);
        trace!("clock: tick {seconds}s to {next} ({change})");
        self.now = next;
        self.lunar = lunar;
        Ok(change)
    }

    pub const fn now(&self) -> SolarDateTime {
        self.now
    }

    pub const fn lunar(&self) -> LunarDate {
        self.lunar
    }

    pub const fn weekday(&self) -> Weekday {
        self.now.weekday()
    }
}
