use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::registry::ResidentRegistry;
use crate::core::types::{Hop, SensorEvent};
use crate::error::{TraceError, TraceResult};

/// Sensor messages that place a resident at the reporting sensor.
pub const TRIGGER_MESSAGES: [&str; 3] = ["ON", "OPEN", "ABSENT"];

#[must_use]
pub fn is_trigger_message(message: &str) -> bool {
    TRIGGER_MESSAGES.contains(&message)
}

/// Per-resident path slots for one day, index-aligned with the day's events.
///
/// A slot holds the sensor that placed the resident at that event, or `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentPath {
    event_count: usize,
    slots: IndexMap<String, Vec<Option<String>>>,
}

impl ResidentPath {
    /// Builds slots for every resident in `residents`, one per event.
    ///
    /// Residents absent from an event, or mentioned by a non-trigger message,
    /// get an empty slot so all sequences stay `events.len()` long.
    #[must_use]
    pub fn build(events: &[SensorEvent], residents: &ResidentRegistry) -> Self {
        let mut slots: IndexMap<String, Vec<Option<String>>> = residents
            .names()
            .map(|name| (name.to_owned(), Vec::with_capacity(events.len())))
            .collect();

        for event in events {
            for path in slots.values_mut() {
                path.push(None);
            }
            if !is_trigger_message(&event.sensor_message) {
                continue;
            }
            for id in &event.residents {
                let Some(resident) = residents.get(*id) else {
                    continue;
                };
                if let Some(slot) = slots
                    .get_mut(&resident.name)
                    .and_then(|path| path.last_mut())
                {
                    *slot = Some(event.sensor_id.clone());
                }
            }
        }

        Self {
            event_count: events.len(),
            slots,
        }
    }

    /// Wraps externally produced slots without validation.
    ///
    /// The event count is taken from the first sequence; [`compose_hops`]
    /// reports any sequence whose length disagrees.
    #[must_use]
    pub fn from_slots(slots: IndexMap<String, Vec<Option<String>>>) -> Self {
        let event_count = slots.values().next().map_or(0, Vec::len);
        Self { event_count, slots }
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    #[must_use]
    pub fn get(&self, resident: &str) -> Option<&[Option<String>]> {
        self.slots.get(resident).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<String>])> + '_ {
        self.slots
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Checks the alignment invariant: every sequence has `event_count` slots.
    pub fn validate(&self) -> TraceResult<()> {
        for (resident, path) in &self.slots {
            if path.len() != self.event_count {
                return Err(TraceError::PathLengthMismatch {
                    resident: resident.clone(),
                    expected: self.event_count,
                    actual: path.len(),
                });
            }
        }
        Ok(())
    }
}

/// Reconstructs recent movement hops per resident.
///
/// For each resident the slots from `selected` back to
/// `selected.saturating_sub(window)` are scanned newest-first. Every pair of
/// consecutive non-empty slots forms a hop `src -> dst`, including repeated
/// readings of the same sensor. A hop's opacity is `1 - d / window`, where `d`
/// is the distance from `selected` to the slot holding `dst`, so the newest
/// hop is the most opaque. Only each resident's newest hop carries
/// `show_name`.
pub fn compose_hops(
    path: &ResidentPath,
    selected: usize,
    window: usize,
) -> TraceResult<IndexMap<String, Vec<Hop>>> {
    path.validate()?;
    if selected >= path.event_count {
        return Err(TraceError::EventIndexOutOfRange {
            index: selected,
            len: path.event_count,
        });
    }
    if window == 0 {
        return Err(TraceError::InvalidSelection(
            "lookback window must be at least one event".to_owned(),
        ));
    }

    let oldest = selected.saturating_sub(window);
    let mut hops = IndexMap::with_capacity(path.slots.len());

    for (resident, slots) in &path.slots {
        let mut resident_hops = Vec::new();
        let mut dst: Option<&str> = None;
        let mut opacity = 0.0;

        for index in (oldest..=selected).rev() {
            let Some(sensor) = slots[index].as_deref() else {
                continue;
            };
            let distance_opacity = 1.0 - (selected - index) as f64 / window as f64;
            match dst {
                None => {
                    dst = Some(sensor);
                    opacity = distance_opacity;
                }
                Some(current) => {
                    resident_hops.push(Hop {
                        src: sensor.to_owned(),
                        dst: current.to_owned(),
                        opacity,
                        show_name: resident_hops.is_empty(),
                    });
                    dst = Some(sensor);
                    opacity = distance_opacity;
                }
            }
        }

        trace!(resident = %resident, hops = resident_hops.len(), "composed hops");
        hops.insert(resident.clone(), resident_hops);
    }

    Ok(hops)
}
