//! The calendar core as the surrounding firmware drives it.
//!
//! Two triggers reach the [`Engine`]: the RTC tick, which the caller applies
//! to its [`ClockState`] before asking for a [`DisplaySnapshot`], and decoded
//! [`Command`]s from the control link. Every operation runs to completion on
//! the calling context. A caller that handles ticks and commands on
//! different threads must keep the engine and the clock state behind one
//! lock.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    clock::ClockState,
    countdown::{CountdownEvent, CountdownStore},
    datetime::SolarDateTime,
    display::{DisplayConfig, DisplayMode, DisplaySnapshot},
};

/// Non-volatile storage for the countdown list.
///
/// Writes are fire-and-forget: the implementation decides whether and when
/// an offered list actually reaches flash.
pub trait EventPersistence {
    /// Previously saved events, or `None` when nothing was saved
    fn load(&mut self) -> Option<Vec<CountdownEvent>>;

    /// Called with the full list after every successful change
    fn offer(&mut self, events: &[CountdownEvent]);
}

/// Persistence that never stores anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPersistence;

impl EventPersistence for NullPersistence {
    fn load(&mut self) -> Option<Vec<CountdownEvent>> {
        None
    }

    fn offer(&mut self, _events: &[CountdownEvent]) {}
}

/// A decoded request from the command channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Absolute time sync
    SetTime { now: SolarDateTime },
    AddEvent { event: CountdownEvent },
    UpdateEvent { index: usize, event: CountdownEvent },
    RemoveEvent { index: usize },
    SetConfig { config: DisplayConfig },
    NextMode,
    NextStyle,
}

impl Command {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetTime { .. } => "set_time",
            Self::AddEvent { .. } => "add_event",
            Self::UpdateEvent { .. } => "update_event",
            Self::RemoveEvent { .. } => "remove_event",
            Self::SetConfig { .. } => "set_config",
            Self::NextMode => "next_mode",
            Self::NextStyle => "next_style",
        }
    }
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    TimeSet,
    EventAdded(usize),
    EventUpdated(usize),
    EventRemoved(CountdownEvent),
    ConfigChanged,
    ModeChanged(DisplayMode),
    StyleChanged,
}

/// Owns the countdown store, the display configuration and the persistence
/// collaborator.
#[derive(Debug)]
pub struct Engine<P: EventPersistence = NullPersistence> {
    store:       CountdownStore,
    config:      DisplayConfig,
    persistence: P,
}

impl<P: EventPersistence> Engine<P> {
    /// Builds an engine and seeds the store from `persistence`.
    ///
    /// Saved events that fail validation or do not fit are dropped with a
    /// warning rather than failing startup.
    ///
    /// # Errors
    /// Returns the validation error of an invalid `config`.
    pub fn new(config: DisplayConfig, mut persistence: P) -> Result<Self, Error> {
        config.validate()?;

        let mut store = CountdownStore::new();
        let saved = persistence.load().unwrap_or_default();
        let total = saved.len();
        for event in saved {
            let enabled = event.enabled;
            let name = event.name.clone();
            match store.add(event).and_then(|index| store.set_enabled(index, enabled)) {
                Ok(()) => {},
                Err(err) => warn!("engine: dropping saved event \"{name}\": {err}"),
            }
        }
        info!("engine: loaded {} of {total} saved events", store.count());

        Ok(Self {
            store,
            config,
            persistence,
        })
    }

    /// Applies one command.
    ///
    /// Store changes are offered to persistence only when they succeed. A
    /// rejected command leaves the clock, the store and the configuration
    /// as they were.
    ///
    /// # Errors
    /// Whatever the underlying operation reports: invalid times, invalid
    /// events, a full store, a bad index or an invalid configuration.
    pub fn handle(&mut self, command: Command, clock: &mut ClockState) -> Result<Outcome, Error> {
        let name = command.name();
        let result = self.apply(command, clock);
        match &result {
            Ok(outcome) => info!("engine: {name} -> {outcome:?}"),
            Err(err) => warn!("engine: rejected {name}: {err}"),
        }
        result
    }

    fn apply(&mut self, command: Command, clock: &mut ClockState) -> Result<Outcome, Error> {
        let outcome = match command {
            Command::SetTime { now } => {
                clock.set(now)?;
                return Ok(Outcome::TimeSet);
            },
            Command::AddEvent { event } => Outcome::EventAdded(self.store.add(event)?),
            Command::UpdateEvent { index, event } => {
                self.store.update(index, event)?;
                Outcome::EventUpdated(index)
            },
            Command::RemoveEvent { index } => Outcome::EventRemoved(self.store.remove(index)?),
            Command::SetConfig { config } => {
                config.validate()?;
                self.config = config;
                return Ok(Outcome::ConfigChanged);
            },
            Command::NextMode => {
                self.config.next_mode();
                return Ok(Outcome::ModeChanged(self.config.mode));
            },
            Command::NextStyle => {
                self.config.next_style();
                return Ok(Outcome::StyleChanged);
            },
        };

        // Only store changes reach this point
        self.persistence.offer(&self.store.to_vec());
        Ok(outcome)
    }

    /// Frame for the renderer at the clock's current time
    ///
    /// # Errors
    /// See [`DisplaySnapshot::build`].
    pub fn snapshot(&self, clock: &ClockState) -> Result<DisplaySnapshot, Error> {
        DisplaySnapshot::build(clock, &self.store, &self.config)
    }

    pub const fn store(&self) -> &CountdownStore {
        &self.store
    }

    pub const fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub const fn persistence(&self) -> &P {
        &self.persistence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::{EventTarget, Recurrence};
    use crate::test_utils::{datetime, event};

    #[derive(Default)]
    struct MemoryPersistence {
        saved:  Option<Vec<CountdownEvent>>,
        offers: Vec<Vec<CountdownEvent>>,
    }

    impl EventPersistence for MemoryPersistence {
        fn load(&mut self) -> Option<Vec<CountdownEvent>> {
            self.saved.clone()
        }

        fn offer(&mut self, events: &[CountdownEvent]) {
            self.offers.push(events.to_vec());
        }
    }

    fn clock() -> ClockState {
        ClockState::new(datetime(2025, 5, 29, 12, 0, 0)).unwrap()
    }

    fn engine() -> Engine<MemoryPersistence> {
        Engine::new(DisplayConfig::default(), MemoryPersistence::default()).unwrap()
    }

    #[test]
    fn test_seeds_store_from_persistence() {
        let mut off = event("off");
        off.enabled = false;
        let saved = vec![event("a"), event("bad").with_priority(0), off];
        let persistence = MemoryPersistence {
            saved:  Some(saved),
            offers: Vec::new(),
        };

        let engine = Engine::new(DisplayConfig::default(), persistence).unwrap();
        assert_eq!(engine.store().count(), 2);
        assert_eq!(engine.store().get(0).unwrap().name, "a");
        assert!(!engine.store().get(1).unwrap().enabled);
        assert!(engine.persistence().offers.is_empty());
    }

    #[test]
    fn test_seeding_drops_overflow() {
        let saved: Vec<CountdownEvent> = (0..12).map(|i| event(&format!("e{i}"))).collect();
        let persistence = MemoryPersistence {
            saved:  Some(saved),
            offers: Vec::new(),
        };
        let engine = Engine::new(DisplayConfig::default(), persistence).unwrap();
        assert_eq!(engine.store().count(), 10);
        assert_eq!(engine.store().get(9).unwrap().name, "e9");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = DisplayConfig {
            brightness: 0,
            ..DisplayConfig::default()
        };
        assert!(matches!(
            Engine::new(config, NullPersistence),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_store_commands_offer_full_list() {
        let mut engine = engine();
        let mut clock = clock();

        let outcome = engine.handle(Command::AddEvent { event: event("a") }, &mut clock).unwrap();
        assert_eq!(outcome, Outcome::EventAdded(0));
        engine.handle(Command::AddEvent { event: event("b") }, &mut clock).unwrap();

        let outcome = engine
            .handle(
                Command::UpdateEvent {
                    index: 0,
                    event: event("a2"),
                },
                &mut clock,
            )
            .unwrap();
        assert_eq!(outcome, Outcome::EventUpdated(0));

        let outcome = engine.handle(Command::RemoveEvent { index: 1 }, &mut clock).unwrap();
        assert!(matches!(outcome, Outcome::EventRemoved(ref e) if e.name == "b"));

        let offers = &engine.persistence().offers;
        assert_eq!(offers.len(), 4);
        assert_eq!(offers[1].len(), 2);
        assert_eq!(offers[3].len(), 1);
        assert_eq!(offers[3][0].name, "a2");
    }

    #[test]
    fn test_failed_commands_change_nothing() {
        let mut engine = engine();
        let mut clock = clock();
        let before = clock;

        assert_eq!(
            engine.handle(Command::RemoveEvent { index: 0 }, &mut clock),
            Err(Error::IndexOutOfRange { index: 0, count: 0 })
        );
        assert!(
            engine
                .handle(
                    Command::SetTime {
                        now: datetime(1900, 1, 1, 0, 0, 0),
                    },
                    &mut clock,
                )
                .is_err()
        );
        assert!(
            engine
                .handle(
                    Command::SetConfig {
                        config: DisplayConfig {
                            utc_offset: 20,
                            ..DisplayConfig::default()
                        },
                    },
                    &mut clock,
                )
                .is_err()
        );

        assert_eq!(clock, before);
        assert_eq!(engine.config(), &DisplayConfig::default());
        assert!(engine.persistence().offers.is_empty());
    }

    #[test]
    fn test_set_time_and_snapshot() {
        let mut engine = engine();
        let mut clock = clock();
        engine
            .handle(
                Command::AddEvent {
                    event: CountdownEvent::new("春节", Recurrence::Once, EventTarget::once(2026, 2, 17, 0, 0)),
                },
                &mut clock,
            )
            .unwrap();

        let outcome = engine
            .handle(
                Command::SetTime {
                    now: datetime(2026, 2, 16, 20, 0, 0),
                },
                &mut clock,
            )
            .unwrap();
        assert_eq!(outcome, Outcome::TimeSet);

        let snapshot = engine.snapshot(&clock).unwrap();
        assert_eq!(snapshot.festival, Some("除夕"));
        let (index, event, occurrence) = snapshot.next_event.unwrap();
        assert_eq!((index, event.name.as_str()), (0, "春节"));
        assert_eq!(occurrence.remaining.headline(), "4小时");
    }

    #[test]
    fn test_mode_commands() {
        let mut engine = engine();
        let mut clock = clock();

        engine.handle(Command::NextStyle, &mut clock).unwrap();
        assert_eq!(
            engine.handle(Command::NextMode, &mut clock).unwrap(),
            Outcome::ModeChanged(DisplayMode::Calendar)
        );
        assert_eq!(engine.snapshot(&clock).unwrap().mode, DisplayMode::Calendar);
        assert_eq!(engine.config().time_style, crate::display::TimeStyle::Analog);
        assert!(engine.persistence().offers.is_empty());
    }

    #[test]
    fn test_command_serde() {
        let command: Command =
            serde_json::from_str(r#"{"command":"set_time","now":"2025-05-29 08:30:00"}"#).unwrap();
        assert_eq!(
            command,
            Command::SetTime {
                now: datetime(2025, 5, 29, 8, 30, 0),
            }
        );

        let command: Command = serde_json::from_str(r#"{"command":"remove_event","index":3}"#).unwrap();
        assert_eq!(command, Command::RemoveEvent { index: 3 });
        assert_eq!(command.name(), "remove_event");

        let json = serde_json::to_string(&Command::NextMode).unwrap();
        assert_eq!(json, r#"{"command":"next_mode"}"#);

        assert!(serde_json::from_str::<Command>(r#"{"command":"set_time","now":"2025-02-30 00:00"}"#).is_err());
    }
}
