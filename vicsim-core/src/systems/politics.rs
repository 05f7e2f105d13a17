use crate::state::{NationId, WorldState};

pub fn is_election_ongoing(state: &WorldState, nation: NationId) -> bool {
    state
        .nation(nation)
        .and_then(|n| n.election_ends)
        .is_some_and(|ends| ends > state.date)
}

/// Opens a campaign lasting `campaign_duration_days`.
pub fn start_election(state: &mut WorldState, nation: NationId) {
    let ends = state.date.add_days(state.defines.campaign_duration_days);
    if let Some(n) = state.nation_mut(nation) {
        n.election_ends = Some(ends);
        log::debug!("{} called an election ending {}", nation, ends);
    }
}
