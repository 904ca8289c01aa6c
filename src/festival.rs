//! Festivals and the 24 solar terms.
//!
//! Solar terms use fixed nominal days with a ±2 day window. Real terms drift
//! by a day or so from year to year, so a term is reported on every day of
//! its window rather than only on the exact day.

use crate::{
    SOLAR_TERM_TOLERANCE,
    datetime::SolarDate,
    lunar::LunarDate,
    types::Weekday,
};

/// What makes a festival fall on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FestivalTrigger {
    /// Fixed Gregorian month and day
    Solar { month: u8, day: u8 },
    /// Fixed lunar month and day, never in a leap month
    Lunar { month: u8, day: u8 },
    /// Last day of a regular lunar month, whatever its length
    LunarMonthEnd { month: u8 },
    /// The `nth` given weekday of a Gregorian month
    NthWeekday { month: u8, nth: u8, weekday: Weekday },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FestivalEntry {
    pub trigger: FestivalTrigger,
    pub name:    &'static str,
}

/// One of the 24 solar terms with its nominal Gregorian day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolarTermEntry {
    pub month: u8,
    pub day:   u8,
    pub name:  &'static str,
}

const fn solar(month: u8, day: u8, name: &'static str) -> FestivalEntry {
    FestivalEntry {
        trigger: FestivalTrigger::Solar { month, day },
        name,
    }
}

const fn lunar(month: u8, day: u8, name: &'static str) -> FestivalEntry {
    FestivalEntry {
        trigger: FestivalTrigger::Lunar { month, day },
        name,
    }
}

const fn term(month: u8, day: u8, name: &'static str) -> SolarTermEntry {
    SolarTermEntry { month, day, name }
}

pub static SOLAR_FESTIVALS: [FestivalEntry; 17] = [
    solar(1, 1, "元旦"),
    solar(2, 14, "情人节"),
    solar(3, 8, "妇女节"),
    solar(3, 12, "植树节"),
    solar(4, 1, "愚人节"),
    solar(5, 1, "劳动节"),
    solar(5, 4, "青年节"),
    solar(6, 1, "儿童节"),
    solar(7, 1, "建党节"),
    solar(8, 1, "建军节"),
    solar(9, 10, "教师节"),
    solar(10, 1, "国庆节"),
    solar(10, 24, "程序员节"),
    solar(11, 1, "万圣节"),
    solar(11, 11, "光棍节"),
    solar(12, 24, "平安夜"),
    solar(12, 25, "圣诞节"),
];

pub static LUNAR_FESTIVALS: [FestivalEntry; 10] = [
    lunar(1, 1, "春节"),
    lunar(1, 15, "元宵节"),
    lunar(2, 2, "龙抬头"),
    lunar(5, 5, "端午节"),
    lunar(7, 7, "七夕节"),
    lunar(7, 15, "中元节"),
    lunar(8, 15, "中秋节"),
    lunar(9, 9, "重阳节"),
    lunar(12, 8, "腊八节"),
    lunar(12, 23, "小年"),
];

/// Festivals without a fixed day, checked after both fixed lists
pub static RULE_FESTIVALS: [FestivalEntry; 3] = [
    FestivalEntry {
        trigger: FestivalTrigger::LunarMonthEnd { month: 12 },
        name:    "除夕",
    },
    FestivalEntry {
        trigger: FestivalTrigger::NthWeekday {
            month:   5,
            nth:     2,
            weekday: Weekday::Sunday,
        },
        name:    "母亲节",
    },
    FestivalEntry {
        trigger: FestivalTrigger::NthWeekday {
            month:   6,
            nth:     3,
            weekday: Weekday::Sunday,
        },
        name:    "父亲节",
    },
];

/// Starting from Minor Cold, roughly every 15.2 days
pub static SOLAR_TERMS: [SolarTermEntry; 24] = [
    term(1, 6, "小寒"),
    term(1, 20, "大寒"),
    term(2, 4, "立春"),
    term(2, 19, "雨水"),
    term(3, 6, "惊蛰"),
    term(3, 21, "春分"),
    term(4, 5, "清明"),
    term(4, 20, "谷雨"),
    term(5, 6, "立夏"),
    term(5, 21, "小满"),
    term(6, 6, "芒种"),
    term(6, 22, "夏至"),
    term(7, 7, "小暑"),
    term(7, 23, "大暑"),
    term(8, 8, "立秋"),
    term(8, 23, "处暑"),
    term(9, 8, "白露"),
    term(9, 23, "秋分"),
    term(10, 8, "寒露"),
    term(10, 24, "霜降"),
    term(11, 8, "立冬"),
    term(11, 22, "小雪"),
    term(12, 7, "大雪"),
    term(12, 22, "冬至"),
];

/// Festival and solar term names for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Observances {
    pub festival:   Option<&'static str>,
    pub solar_term: Option<&'static str>,
}

impl FestivalTrigger {
    /// Whether the trigger fires on this solar/lunar date pair
    pub fn matches(&self, solar: &SolarDate, lunar: &LunarDate) -> bool {
        match *self {
            Self::Solar { month, day } => solar.month() == month && solar.day() == day,
            Self::Lunar { month, day } => {
                !lunar.is_leap() && lunar.month() == month && lunar.day() == day
            },
            Self::LunarMonthEnd { month } => {
                !lunar.is_leap() && lunar.month() == month && lunar.is_last_day_of_month()
            },
            Self::NthWeekday {
                month,
                nth,
                weekday,
            } => {
                solar.month() == month
                    && solar.weekday() == weekday
                    && (solar.day() - 1) / 7 + 1 == nth
            },
        }
    }
}

/// Every festival on the day, in tie-break order: solar list, lunar list, rules
pub fn festivals_on<'a>(
    solar: &'a SolarDate,
    lunar: &'a LunarDate,
) -> impl Iterator<Item = &'static FestivalEntry> + 'a {
    SOLAR_FESTIVALS
        .iter()
        .chain(LUNAR_FESTIVALS.iter())
        .chain(RULE_FESTIVALS.iter())
        .filter(move |entry| entry.trigger.matches(solar, lunar))
}

/// First festival on the day
pub fn festival(solar: &SolarDate, lunar: &LunarDate) -> Option<&'static str> {
    festivals_on(solar, lunar).next().map(|entry| entry.name)
}

/// Position (0-23) of the solar term whose window contains the date
pub fn solar_term_index(date: &SolarDate) -> Option<usize> {
    SOLAR_TERMS.iter().position(|entry| {
        entry.month == date.month() && entry.day.abs_diff(date.day()) <= SOLAR_TERM_TOLERANCE
    })
}

/// Solar term whose window contains the date
pub fn solar_term(date: &SolarDate) -> Option<&'static SolarTermEntry> {
    solar_term_index(date).map(|index| &SOLAR_TERMS[index])
}

/// Festival and solar term for a day
pub fn resolve(solar: &SolarDate, lunar: &LunarDate) -> Observances {
    Observances {
        festival:   festival(solar, lunar),
        solar_term: solar_term(solar).map(|entry| entry.name),
    }
}
