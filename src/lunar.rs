//! Gregorian to Chinese lunar date conversion.

use std::fmt;

use log::debug;

use crate::{
    Error, LUNAR_EPOCH, LUNAR_SHORT_MONTH,
    datetime::SolarDate,
    lunar_table::{LunarTable, LunarYearInfo},
    prelude::*,
    types::day_number,
};

const MONTH_NAMES: [&str; 12] = [
    "正月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "冬月", "腊月",
];

const DAY_NAMES: [&str; 30] = [
    "初一", "初二", "初三", "初四", "初五", "初六", "初七", "初八", "初九", "初十",
    "十一", "十二", "十三", "十四", "十五", "十六", "十七", "十八", "十九", "二十",
    "廿一", "廿二", "廿三", "廿四", "廿五", "廿六", "廿七", "廿八", "廿九", "三十",
];

const LEAP_PREFIX: &str = "闰";

/// The 12 animals of the zodiac cycle, 1900 being a year of the rat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Zodiac {
    #[display(fmt = "鼠")]
    Rat,
    #[display(fmt = "牛")]
    Ox,
    #[display(fmt = "虎")]
    Tiger,
    #[display(fmt = "兔")]
    Rabbit,
    #[display(fmt = "龙")]
    Dragon,
    #[display(fmt = "蛇")]
    Snake,
    #[display(fmt = "马")]
    Horse,
    #[display(fmt = "羊")]
    Goat,
    #[display(fmt = "猴")]
    Monkey,
    #[display(fmt = "鸡")]
    Rooster,
    #[display(fmt = "狗")]
    Dog,
    #[display(fmt = "猪")]
    Pig,
}

impl Zodiac {
    const CYCLE: [Self; 12] = [
        Self::Rat,
        Self::Ox,
        Self::Tiger,
        Self::Rabbit,
        Self::Dragon,
        Self::Snake,
        Self::Horse,
        Self::Goat,
        Self::Monkey,
        Self::Rooster,
        Self::Dog,
        Self::Pig,
    ];

    /// Animal of a lunar year
    pub const fn of_lunar_year(year: u16) -> Self {
        let offset = (year as i32 - LunarTable::FIRST_YEAR as i32).rem_euclid(12);
        Self::CYCLE[offset as usize]
    }
}

/// A date in the Chinese lunar calendar.
///
/// Only produced by [`solar_to_lunar`] or [`LunarDate::new`], so the day always
/// fits its month and `is_leap` is only set on the year's leap month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LunarDate {
    year:    u16,
    month:   u8,
    day:     u8,
    is_leap: bool,
}

impl LunarDate {
    /// Validates a lunar date against the table
    ///
    /// # Errors
    /// `Error::YearOutOfRange` outside the table, `Error::InvalidMonth` for a
    /// month outside 1-12 or a leap month the year does not have, and
    /// `Error::DayOutOfRange` when the day exceeds the month length.
    pub fn new(year: u16, month: u8, day: u8, is_leap: bool) -> Result<Self, Error> {
        let info = LunarTable::year_info(year)?;
        if month == 0 || month > 12 {
            return Err(Error::InvalidMonth(month));
        }
        let length = info.days_of(month, is_leap).ok_or(Error::InvalidMonth(month))?;
        if day == 0 || day > length {
            return Err(Error::DayOutOfRange { year, month, day });
        }
        Ok(Self {
            year,
            month,
            day,
            is_leap,
        })
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    pub const fn is_leap(&self) -> bool {
        self.is_leap
    }

    pub const fn zodiac(&self) -> Zodiac {
        Zodiac::of_lunar_year(self.year)
    }

    /// e.g. `五月`, `闰六月`, `腊月`
    pub fn month_name(&self) -> String {
        let name = MONTH_NAMES[usize::from(self.month - 1)];
        if self.is_leap {
            format!("{LEAP_PREFIX}{name}")
        } else {
            name.to_owned()
        }
    }

    /// e.g. `初三`, `廿九`, `三十`
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[usize::from(self.day - 1)]
    }

    fn year_info(&self) -> Option<LunarYearInfo> {
        LunarTable::year_info(self.year).ok()
    }

    /// Number of days in this date's own month (29 or 30)
    pub fn month_length(&self) -> u8 {
        // Constructed dates always resolve against the table
        self.year_info()
            .and_then(|info| info.days_of(self.month, self.is_leap))
            .unwrap_or(LUNAR_SHORT_MONTH)
    }

    pub fn is_last_day_of_month(&self) -> bool {
        self.day == self.month_length()
    }

    /// 1-based position of the day within its lunar year
    pub fn ordinal(&self) -> u16 {
        let Some(info) = self.year_info() else {
            return u16::from(self.day);
        };
        let before: u16 = info
            .months()
            .take_while(|span| !(span.month == self.month && span.is_leap == self.is_leap))
            .map(|span| u16::from(span.days))
            .sum();
        before + u16::from(self.day)
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.month_name(), self.day_name())
    }
}

/// Converts a Gregorian date to its lunar date.
///
/// Counts days from the table epoch (1900-01-31, lunar 1900-01-01), then
/// consumes whole lunar years and months. When the remaining offset lands
/// exactly on the first day after a leap month's anchor month, the result is
/// day 1 of the leap month, since that is the day the leap month begins.
///
/// # Errors
/// `Error::BeforeEpoch` for dates before 1900-01-31 and
/// `Error::YearOutOfRange` if the date runs past the end of the table.
pub fn solar_to_lunar(date: SolarDate) -> Result<LunarDate, Error> {
    let (epoch_year, epoch_month, epoch_day) = LUNAR_EPOCH;
    let mut offset = date.day_number() - day_number(epoch_year, epoch_month, epoch_day);
    if offset < 0 {
        return Err(Error::BeforeEpoch(date));
    }

    let mut year = LunarTable::FIRST_YEAR;
    let info = loop {
        let info = LunarTable::year_info(year)?;
        let length = i32::from(info.year_days());
        if offset < length {
            break info;
        }
        offset -= length;
        year += 1;
    };

    for span in info.months() {
        let length = i32::from(span.days);
        if offset < length {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let lunar = LunarDate {
                year,
                month: span.month,
                day: offset as u8 + 1,
                is_leap: span.is_leap,
            };
            debug!("{date} -> lunar {year} {lunar}");
            return Ok(lunar);
        }
        offset -= length;
    }

    // offset < year_days, so the month walk always lands
    Err(Error::YearOutOfRange(year))
}

impl TryFrom<SolarDate> for LunarDate {
    type Error = Error;

    fn try_from(date: SolarDate) -> Result<Self, Self::Error> {
        solar_to_lunar(date)
    }
}
