//! Per-year lunar calendar metadata for 1900-2100.
//!
//! Each year is packed into 17 bits:
//!
//! | bits   | meaning                                              |
//! |--------|------------------------------------------------------|
//! | 0-3    | leap month number, 0 when the year has none          |
//! | 4-15   | month 12 (bit 4) .. month 1 (bit 15): set = 30 days  |
//! | 16     | leap month length: set = 30 days                     |

use crate::{Error, LUNAR_LONG_MONTH, LUNAR_SHORT_MONTH, MAX_MONTH, MAX_YEAR, MIN_YEAR};

const LEAP_MONTH_MASK: u32 = 0xf;
const LONG_LEAP_MONTH_BIT: u32 = 0x1_0000;
const LONG_MONTH_MASK: u32 = 0xfff0;

#[rustfmt::skip]
static LUNAR_INFO: [u32; (MAX_YEAR - MIN_YEAR + 1) as usize] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900-1909
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910-1919
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920-1929
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930-1939
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940-1949
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950-1959
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960-1969
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6, // 1970-1979
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980-1989
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0, // 1990-1999
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000-2009
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010-2019
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020-2029
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030-2039
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040-2049
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0, // 2050-2059
    0x092e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4, // 2060-2069
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0, // 2070-2079
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160, // 2080-2089
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252, // 2090-2099
    0x0d520,                                                                                  // 2100
];

/// Decoded view of one year's packed record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LunarYearInfo(u32);

/// One month of a lunar year in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LunarMonthSpan {
    pub month:   u8,
    pub is_leap: bool,
    pub days:    u8,
}

impl LunarYearInfo {
    /// The month this year repeats, if any
    #[allow(clippy::cast_possible_truncation)]
    pub const fn leap_month(self) -> Option<u8> {
        match (self.0 & LEAP_MONTH_MASK) as u8 {
            0 => None,
            month => Some(month),
        }
    }

    /// Length of the leap month, if the year has one
    pub const fn leap_month_days(self) -> Option<u8> {
        if self.leap_month().is_none() {
            return None;
        }
        Some(if self.0 & LONG_LEAP_MONTH_BIT == 0 {
            LUNAR_SHORT_MONTH
        } else {
            LUNAR_LONG_MONTH
        })
    }

    /// Length of regular month `month` (1-12)
    pub const fn month_days(self, month: u8) -> u8 {
        debug_assert!(month != 0 && month <= MAX_MONTH);

        if self.0 & (LONG_LEAP_MONTH_BIT >> month) == 0 {
            LUNAR_SHORT_MONTH
        } else {
            LUNAR_LONG_MONTH
        }
    }

    /// Length of `month`, or of its leap repetition when `is_leap` is set.
    /// `None` when the year has no such leap month.
    pub const fn days_of(self, month: u8, is_leap: bool) -> Option<u8> {
        if !is_leap {
            return Some(self.month_days(month));
        }
        match self.leap_month() {
            Some(leap) if leap == month => self.leap_month_days(),
            _ => None,
        }
    }

    /// 12 or 13
    pub const fn month_count(self) -> u8 {
        if self.leap_month().is_some() { 13 } else { 12 }
    }

    /// Total days in the lunar year
    #[allow(clippy::cast_possible_truncation)]
    pub const fn year_days(self) -> u16 {
        let long_months = (self.0 & LONG_MONTH_MASK).count_ones() as u16;
        let leap = match self.leap_month_days() {
            Some(days) => days as u16,
            None => 0,
        };
        MAX_MONTH as u16 * LUNAR_SHORT_MONTH as u16 + long_months + leap
    }

    /// Months in calendar order; a leap month follows its anchor month.
    pub fn months(self) -> impl Iterator<Item = LunarMonthSpan> {
        let leap = self.leap_month();
        (1..=MAX_MONTH).flat_map(move |month| {
            let regular = LunarMonthSpan {
                month,
                is_leap: false,
                days: self.month_days(month),
            };
            let repeated = match (leap, self.leap_month_days()) {
                (Some(leap), Some(days)) if leap == month => Some(LunarMonthSpan {
                    month,
                    is_leap: true,
                    days,
                }),
                _ => None,
            };
            std::iter::once(regular).chain(repeated)
        })
    }
}

/// Read-only access to the 1900-2100 table
pub struct LunarTable;

impl LunarTable {
    pub const FIRST_YEAR: u16 = MIN_YEAR;
    pub const LAST_YEAR: u16 = MAX_YEAR;

    /// Record for `year`
    ///
    /// # Errors
    /// Returns `Error::YearOutOfRange` outside 1900-2100.
    pub fn year_info(year: u16) -> Result<LunarYearInfo, Error> {
        if !(Self::FIRST_YEAR..=Self::LAST_YEAR).contains(&year) {
            return Err(Error::YearOutOfRange(year));
        }
        Ok(LunarYearInfo(LUNAR_INFO[usize::from(year - Self::FIRST_YEAR)]))
    }

    /// Every year in the table with its record
    pub fn iter() -> impl Iterator<Item = (u16, LunarYearInfo)> {
        (Self::FIRST_YEAR..).zip(LUNAR_INFO.iter().copied().map(LunarYearInfo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::day_number;

    #[test]
    fn test_table_bounds() {
        assert!(LunarTable::year_info(1900).is_ok());
        assert!(LunarTable::year_info(2100).is_ok());
        assert!(matches!(LunarTable::year_info(1899), Err(Error::YearOutOfRange(1899))));
        assert!(matches!(LunarTable::year_info(2101), Err(Error::YearOutOfRange(2101))));
        assert_eq!(LunarTable::iter().count(), 201);
    }

    #[test]
    fn test_decode_2025() {
        // Leap sixth month of 29 days
        let info = LunarTable::year_info(2025).unwrap();
        assert_eq!(info.leap_month(), Some(6));
        assert_eq!(info.leap_month_days(), Some(29));
        assert_eq!(info.month_count(), 13);
        let lengths: Vec<u8> = (1..=12).map(|m| info.month_days(m)).collect();
        assert_eq!(lengths, [30, 29, 30, 29, 29, 30, 30, 29, 30, 30, 30, 29]);
        assert_eq!(info.year_days(), 384);
    }

    #[test]
    fn test_decode_year_without_leap() {
        let info = LunarTable::year_info(2024).unwrap();
        assert_eq!(info.leap_month(), None);
        assert_eq!(info.leap_month_days(), None);
        assert_eq!(info.months().count(), 12);
        assert_eq!(info.year_days(), 354);
        assert_eq!(info.days_of(6, true), None);
    }

    #[test]
    fn test_leap_month_follows_anchor() {
        let info = LunarTable::year_info(2020).unwrap();
        let order: Vec<(u8, bool)> = info.months().map(|s| (s.month, s.is_leap)).collect();
        assert_eq!(order[3], (4, false));
        assert_eq!(order[4], (4, true));
        assert_eq!(order[5], (5, false));
        assert_eq!(info.days_of(4, true), Some(29));
        assert_eq!(info.days_of(5, true), None);
    }

    #[test]
    fn test_every_year_is_well_formed() {
        for (year, info) in LunarTable::iter() {
            let months: Vec<LunarMonthSpan> = info.months().collect();
            let regular = months.iter().filter(|s| !s.is_leap).count();
            let leap = months.iter().filter(|s| s.is_leap).count();
            assert_eq!(regular, 12, "year {year}");
            assert!(leap <= 1, "year {year}");
            assert_eq!(leap == 1, info.leap_month().is_some(), "year {year}");
            assert!(info.leap_month().is_none_or(|m| (1..=12).contains(&m)), "year {year}");
            assert!((353..=385).contains(&info.year_days()), "year {year}: {}", info.year_days());
        }
    }

    #[test]
    fn test_table_covers_last_solar_day() {
        let span = day_number(2100, 12, 31) - day_number(1900, 1, 31);
        let total: i32 = LunarTable::iter().map(|(_, info)| i32::from(info.year_days())).sum();
        assert!(total > span);
    }
}
