use crate::state::{Date, NationId, StateId, WorldState};
use serde::{Deserialize, Serialize};

/// Hard-coded event hooks the command layer can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixedEvent {
    OnColonyToState,
    OnColonyToStateFreeSlaves,
}

/// A fired event waiting for the event system to resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEvent {
    pub event: FixedEvent,
    pub nation: NationId,
    pub scope: StateId,
    pub fired: Date,
}

/// Records a fixed event for `nation` with `scope` in scope.
pub fn fire_fixed_event(state: &mut WorldState, event: FixedEvent, scope: StateId, nation: NationId) {
    log::debug!("Firing {:?} for {} on {}", event, nation, scope);
    let fired = state.date;
    state.pending_events.push(PendingEvent {
        event,
        nation,
        scope,
        fired,
    });
}
