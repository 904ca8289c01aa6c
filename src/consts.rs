/// First year covered by the lunar table (inclusive)
pub const MIN_YEAR: u16 = 1900;

/// Last year covered by the lunar table (inclusive)
pub const MAX_YEAR: u16 = 2100;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Solar date of lunar 1900-01-01, the first day the lunar table covers
pub const LUNAR_EPOCH: (u16, u8, u8) = (1900, 1, 31);

/// Shortest lunar month
pub const LUNAR_SHORT_MONTH: u8 = 29;
/// Longest lunar month
pub const LUNAR_LONG_MONTH: u8 = 30;

pub const HOURS_PER_DAY: u8 = 24;
pub const MINUTES_PER_HOUR: u8 = 60;
pub const SECONDS_PER_MINUTE: u8 = 60;
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Number of countdown slots the store holds
pub const MAX_COUNTDOWN_EVENTS: usize = 10;
/// Longest event name, in bytes of UTF-8
pub const MAX_EVENT_NAME_LEN: usize = 32;
/// Longest event description, in bytes of UTF-8
pub const MAX_EVENT_DESC_LEN: usize = 64;
/// Lowest event priority
pub const MIN_PRIORITY: u8 = 1;
/// Highest event priority
pub const MAX_PRIORITY: u8 = 10;

/// Solar terms match a date this many days either side of the nominal day
pub const SOLAR_TERM_TOLERANCE: u8 = 2;

/// UTC offset (hours) the clock keeps its own time in
pub const REFERENCE_UTC_OFFSET: i8 = 8;
pub const MIN_UTC_OFFSET: i8 = -12;
pub const MAX_UTC_OFFSET: i8 = 14;

/// Longest custom text shown in the custom layout, in bytes
pub const MAX_CUSTOM_TEXT_LEN: usize = 1024;
pub const MIN_BRIGHTNESS: u8 = 1;
pub const MAX_BRIGHTNESS: u8 = 10;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Separator between the date and the time of day
pub const DATE_TIME_SEPARATOR: char = ' ';
/// Time component separator
pub const TIME_SEPARATOR: char = ':';
