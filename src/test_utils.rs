use crate::{CountdownEvent, EventTarget, Recurrence, SolarDate, SolarDateTime};

pub fn date(year: u16, month: u8, day: u8) -> SolarDate {
    SolarDate::new(year, month, day).unwrap()
}

pub fn datetime(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> SolarDateTime {
    SolarDateTime::from_components(year, month, day, hour, minute, second).unwrap()
}

/// Valid daily event at 08:00
pub fn event(name: &str) -> CountdownEvent {
    CountdownEvent::new(name, Recurrence::Daily, EventTarget::time(8, 0))
}
