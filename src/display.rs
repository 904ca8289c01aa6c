use serde::{Deserialize, Serialize};

use crate::{
    Error, MAX_BRIGHTNESS, MAX_CUSTOM_TEXT_LEN, MAX_UTC_OFFSET, MIN_BRIGHTNESS, MIN_UTC_OFFSET,
    REFERENCE_UTC_OFFSET,
    clock::ClockState,
    countdown::{CountdownEvent, CountdownStore},
    datetime::{SolarDate, SolarDateTime},
    festival,
    lunar::{LunarDate, Zodiac, solar_to_lunar},
    prelude::*,
    recurrence::CountdownOccurrence,
    selector::next_event,
    template::expand_template,
    types::Weekday,
};

const GRID_ROWS: usize = 6;
const GRID_COLUMNS: usize = 7;

/// Weeks of a month, Sunday first; `None` pads the edges
pub type MonthGrid = [[Option<u8>; GRID_COLUMNS]; GRID_ROWS];

/// Top-level screen layout, cycled by the mode button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    #[display(fmt = "time")]
    Time,
    #[display(fmt = "calendar")]
    Calendar,
    #[display(fmt = "image")]
    Image,
    #[display(fmt = "countdown")]
    Countdown,
    #[display(fmt = "custom")]
    Custom,
}

impl DisplayMode {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Time => Self::Calendar,
            Self::Calendar => Self::Image,
            Self::Image => Self::Countdown,
            Self::Countdown => Self::Custom,
            Self::Custom => Self::Time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStyle {
    #[default]
    #[display(fmt = "digital")]
    Digital,
    #[display(fmt = "analog")]
    Analog,
    #[display(fmt = "minimal")]
    Minimal,
    #[display(fmt = "retro")]
    Retro,
    #[display(fmt = "neon")]
    Neon,
}

impl TimeStyle {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Digital => Self::Analog,
            Self::Analog => Self::Minimal,
            Self::Minimal => Self::Retro,
            Self::Retro => Self::Neon,
            Self::Neon => Self::Digital,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarStyle {
    #[default]
    #[display(fmt = "grid")]
    Grid,
    #[display(fmt = "list")]
    List,
    #[display(fmt = "minimal")]
    Minimal,
    #[display(fmt = "chinese")]
    Chinese,
    #[display(fmt = "modern")]
    Modern,
}

impl CalendarStyle {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Minimal,
            Self::Minimal => Self::Chinese,
            Self::Chinese => Self::Modern,
            Self::Modern => Self::Grid,
        }
    }
}

/// User-adjustable display settings.
///
/// Missing fields take their defaults when deserialized, so a partial
/// update from the phone app is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DisplayConfig {
    pub mode:             DisplayMode,
    pub time_style:       TimeStyle,
    pub calendar_style:   CalendarStyle,
    pub show_seconds:     bool,
    pub show_date:        bool,
    pub show_lunar:       bool,
    pub show_festival:    bool,
    pub show_weather:     bool,
    pub show_countdown:   bool,
    pub auto_brightness:  bool,
    /// 1-10
    pub brightness:       u8,
    /// Seconds between full refreshes
    pub refresh_interval: u16,
    pub image_index:      u8,
    /// Hours east of UTC the screen shows; the clock itself runs at +8
    pub utc_offset:       i8,
    /// Shown in custom mode after template expansion
    pub custom_text:      String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode:             DisplayMode::default(),
            time_style:       TimeStyle::default(),
            calendar_style:   CalendarStyle::default(),
            show_seconds:     true,
            show_date:        true,
            show_lunar:       true,
            show_festival:    true,
            show_weather:     false,
            show_countdown:   true,
            auto_brightness:  true,
            brightness:       5,
            refresh_interval: 60,
            image_index:      0,
            utc_offset:       REFERENCE_UTC_OFFSET,
            custom_text:      String::new(),
        }
    }
}

impl DisplayConfig {
    /// # Errors
    /// `InvalidConfig` for brightness, refresh interval or UTC offset out of
    /// range; `TextTooLong` for oversized custom text.
    pub fn validate(&self) -> Result<(), Error> {
        if !(MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&self.brightness) {
            return Err(Error::InvalidConfig(format!(
                "brightness {} outside {MIN_BRIGHTNESS}-{MAX_BRIGHTNESS}",
                self.brightness
            )));
        }
        if self.refresh_interval == 0 {
            return Err(Error::InvalidConfig("refresh interval must be at least 1s".to_string()));
        }
        if !(MIN_UTC_OFFSET..=MAX_UTC_OFFSET).contains(&self.utc_offset) {
            return Err(Error::InvalidConfig(format!(
                "UTC offset {:+} outside {MIN_UTC_OFFSET:+}..{MAX_UTC_OFFSET:+}",
                self.utc_offset
            )));
        }
        if self.custom_text.len() > MAX_CUSTOM_TEXT_LEN {
            return Err(Error::TextTooLong {
                field: "custom_text",
                len:   self.custom_text.len(),
                max:   MAX_CUSTOM_TEXT_LEN,
            });
        }
        Ok(())
    }

    pub const fn next_mode(&mut self) {
        self.mode = self.mode.next();
    }

    /// Cycles the style of the current mode; modes without styles are left
    /// alone
    pub const fn next_style(&mut self) {
        match self.mode {
            DisplayMode::Time => self.time_style = self.time_style.next(),
            DisplayMode::Calendar => self.calendar_style = self.calendar_style.next(),
            DisplayMode::Image | DisplayMode::Countdown | DisplayMode::Custom => {},
        }
    }

    /// Minutes to add to the clock's own time to get the displayed time
    fn shift_minutes(&self) -> i64 {
        (i64::from(self.utc_offset) - i64::from(REFERENCE_UTC_OFFSET)) * 60
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySnapshot {
    /// Clock time moved to the configured UTC offset
    pub now:         SolarDateTime,
    pub weekday:     Weekday,
    pub lunar:       LunarDate,
    pub zodiac:      Zodiac,
    pub festival:    Option<&'static str>,
    pub solar_term:  Option<&'static str>,
    /// Store index, a copy of the event and where it lands next
    pub next_event:  Option<(usize, CountdownEvent, CountdownOccurrence)>,
    pub mode:        DisplayMode,
    /// Expanded custom text, only in custom mode
    pub custom_text: Option<String>,
}

impl DisplaySnapshot {
    /// Assembles a frame for `clock` as seen at the configured UTC offset
    ///
    /// # Errors
    /// `YearOutOfRange` or `BeforeEpoch` when the offset moves the time off
    /// the supported calendar.
    pub fn build(clock: &ClockState, store: &CountdownStore, config: &DisplayConfig) -> Result<Self, Error> {
        let now = clock.now().add_minutes(config.shift_minutes())?;
        let date = now.date();
        let lunar = if date == clock.now().date() {
            clock.lunar()
        } else {
            solar_to_lunar(date)?
        };
        let observances = festival::resolve(&date, &lunar);
        let next_event =
            next_event(store, &now).map(|next| (next.index, next.event.clone(), next.occurrence));
        let custom_text = (config.mode == DisplayMode::Custom).then(|| expand_template(&config.custom_text, &now));

        Ok(Self {
            now,
            weekday: now.weekday(),
            lunar,
            zodiac: lunar.zodiac(),
            festival: observances.festival,
            solar_term: observances.solar_term,
            next_event,
            mode: config.mode,
            custom_text,
        })
    }
}

/// Month laid out in weeks starting on Sunday, as the grid calendar draws it
///
/// # Errors
/// `YearOutOfRange` or `InvalidMonth` for a month outside the calendar.
pub fn month_grid(year: u16, month: u8) -> Result<MonthGrid, Error> {
    let first = SolarDate::new(year, month, 1)?;
    let offset = usize::from(first.weekday().days_from_sunday());

    let mut grid: MonthGrid = [[None; GRID_COLUMNS]; GRID_ROWS];
    for day in 1..=first.days_in_month() {
        let cell = offset + usize::from(day) - 1;
        grid[cell / GRID_COLUMNS][cell % GRID_COLUMNS] = Some(day);
    }
    Ok(grid)
}
