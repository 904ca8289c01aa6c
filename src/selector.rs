use log::warn;

use crate::{
    countdown::{CountdownEvent, CountdownStore},
    datetime::SolarDateTime,
    recurrence::{CountdownOccurrence, next_occurrence},
};

/// The event the main screen should count down to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextEvent<'a> {
    /// Position in the store
    pub index:      usize,
    pub event:      &'a CountdownEvent,
    pub occurrence: CountdownOccurrence,
}

/// Soonest enabled event that has not passed.
///
/// Ties go to the lowest index. Events whose occurrence cannot be computed
/// are skipped.
pub fn next_event<'a>(store: &'a CountdownStore, now: &SolarDateTime) -> Option<NextEvent<'a>> {
    let mut best: Option<NextEvent<'a>> = None;

    for (index, event) in store.iter().enumerate().filter(|(_, event)| event.enabled) {
        let occurrence = match next_occurrence(event, now) {
            Ok(occurrence) => occurrence,
            Err(err) => {
                warn!("selector: skipping \"{}\" at {index}: {err}", event.name);
                continue;
            },
        };
        if occurrence.is_past {
            continue;
        }

        let minutes = occurrence.remaining.total_minutes();
        if best.is_none_or(|current| minutes < current.occurrence.remaining.total_minutes()) {
            best = Some(NextEvent {
                index,
                event,
                occurrence,
            });
        }
    }

    best
}
