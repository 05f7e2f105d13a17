//! Colonial races and colony integration.
//!
//! Colonization commands name a province; the race itself is tracked on the
//! region the province belongs to.

use super::submit;
use crate::colonization::{self, ColonizationPhase};
use crate::fixed::Fixed;
use crate::input::Command;
use crate::state::{NationId, ProvinceId, StateDefId, StateId, WorldState};
use crate::systems::events::{self, FixedEvent};
use crate::systems::{nations, provinces};

fn region_of(state: &WorldState, province: ProvinceId) -> Option<StateDefId> {
    state.province(province).map(|p| p.region)
}

// ---------------------------------------------------------------------------
// Colony to state

/// Submits an upgrade for `si`, identified on the wire by its capital.
pub fn upgrade_colony_to_state(state: &WorldState, source: NationId, si: StateId) -> bool {
    let Some(capital) = state.state_instance(si).map(|s| s.capital) else {
        return false;
    };
    submit(state, source, Command::UpgradeColonyToState { capital })
}

pub fn can_upgrade_colony_to_state(state: &WorldState, source: NationId, si: StateId) -> bool {
    state.state_instance(si).is_some_and(|s| s.owner == source)
        && provinces::can_integrate_colony(state, si)
}

pub fn execute_upgrade_colony_to_state(state: &mut WorldState, source: NationId, capital: ProvinceId) {
    let Some(si) = provinces::state_instance_of(state, capital) else {
        return;
    };
    if !can_upgrade_colony_to_state(state, source, si) {
        return;
    }
    apply_upgrade_colony_to_state(state, source, si);
}

fn apply_upgrade_colony_to_state(state: &mut WorldState, source: NationId, si: StateId) {
    for p in provinces::provinces_in_state(state, si) {
        if let Some(prov) = state.province_mut(p) {
            prov.is_colonial = false;
            prov.modifiers.retain(|m| m.expires.is_none());
        }
    }

    let modifier = state
        .nation(source)
        .map_or(Fixed::ZERO, |n| n.colonial_prestige_modifier);
    let gain = state.defines.colony_to_state_prestige_gain * (Fixed::ONE + modifier);
    nations::adjust_prestige(state, source, gain);

    events::fire_fixed_event(state, FixedEvent::OnColonyToState, si, source);
    events::fire_fixed_event(state, FixedEvent::OnColonyToStateFreeSlaves, si, source);

    nations::recompute_colonial_nation(state, source);
    log::info!("{} integrated colony {} as a state", source, si);
}

// ---------------------------------------------------------------------------
// Colonial races

pub fn invest_in_colony(state: &WorldState, source: NationId, province: ProvinceId) -> bool {
    submit(state, source, Command::InvestInColony { province })
}

/// Opening a claim and adding to an existing one are the same command.
pub fn can_invest_in_colony(state: &WorldState, source: NationId, province: ProvinceId) -> bool {
    let Some(region) = region_of(state, province) else {
        return false;
    };
    let colonizing = state
        .region(region)
        .is_some_and(|d| d.colonization.is_colonizing(source));
    if colonizing {
        colonization::can_invest_in_colony(state, source, region)
    } else {
        colonization::can_start_colony(state, source, region)
    }
}

pub fn execute_invest_in_colony(state: &mut WorldState, source: NationId, province: ProvinceId) {
    if !can_invest_in_colony(state, source, province) {
        return;
    }
    let Some(region) = region_of(state, province) else {
        return;
    };
    let today = state.date;
    let start_cost = colonization::start_cost(state, source, region);
    let defines = state.defines.clone();

    let Some(def) = state.region_mut(region) else {
        return;
    };
    if def.colonization.is_colonizing(source) {
        let phase = def.colonization.invest(source, &defines, today);
        if phase == ColonizationPhase::Settled {
            log::info!("{} won the colonial race for {}", source, def.name);
        }
    } else {
        def.colonization.start_claim(source, start_cost, today);
        log::debug!("{} opened a colonial claim on {}", source, def.name);
    }
}

pub fn abandon_colony(state: &WorldState, source: NationId, province: ProvinceId) -> bool {
    submit(state, source, Command::AbandonColony { province })
}

/// Always allowed; a nation without a claim has nothing to drop.
pub fn can_abandon_colony(_state: &WorldState, _source: NationId, _province: ProvinceId) -> bool {
    true
}

pub fn execute_abandon_colony(state: &mut WorldState, source: NationId, province: ProvinceId) {
    if !can_abandon_colony(state, source, province) {
        return;
    }
    let Some(region) = region_of(state, province) else {
        return;
    };
    if let Some(def) = state.region_mut(region) {
        def.colonization.abandon(source);
    }
}

pub fn finish_colonization(state: &WorldState, source: NationId, province: ProvinceId) -> bool {
    submit(state, source, Command::FinishColonization { province })
}

pub fn can_finish_colonization(state: &WorldState, source: NationId, province: ProvinceId) -> bool {
    let Some(def) = region_of(state, province).and_then(|r| state.region(r)) else {
        return false;
    };
    def.colonization.phase == ColonizationPhase::None
        && def.colonization.claims.first().is_some_and(|c| c.nation == source)
}

pub fn execute_finish_colonization(state: &mut WorldState, source: NationId, province: ProvinceId) {
    if !can_finish_colonization(state, source, province) {
        return;
    }
    let Some(region) = region_of(state, province) else {
        return;
    };
    let unowned: Vec<ProvinceId> = state
        .region(region)
        .map(|d| {
            d.provinces
                .iter()
                .copied()
                .filter(|&p| state.province(p).is_some_and(|p| p.owner.is_none()))
                .collect()
        })
        .unwrap_or_default();

    for &p in &unowned {
        provinces::change_province_owner(state, p, source);
        if let Some(prov) = state.province_mut(p) {
            prov.is_colonial = true;
        }
    }
    if let Some(def) = state.region_mut(region) {
        def.colonization.clear();
    }
    nations::recompute_colonial_nation(state, source);
    log::info!("{} colonized {} provinces", source, unowned.len());
}
