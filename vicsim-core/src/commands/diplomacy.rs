//! Bilateral diplomacy: relations, war subsidies and war intervention.

use super::submit;
use crate::diplomacy::MAX_RELATION;
use crate::fixed::Fixed;
use crate::input::Command;
use crate::state::{NationId, WarId, WorldState};
use crate::systems::{military, nations};

fn diplomatic_points(state: &WorldState, nation: NationId) -> Fixed {
    state
        .nation(nation)
        .map_or(Fixed::ZERO, |n| n.diplomatic_points)
}

fn debit_diplomatic_points(state: &mut WorldState, nation: NationId, cost: Fixed) {
    if let Some(n) = state.nation_mut(nation) {
        n.diplomatic_points -= cost;
    }
}

fn is_subsidizing(state: &WorldState, source: NationId, target: NationId) -> bool {
    state
        .diplomacy
        .unilateral(source, target)
        .is_some_and(|r| r.war_subsidies)
}

// ---------------------------------------------------------------------------
// War subsidies

pub fn give_war_subsidies(state: &WorldState, source: NationId, target: NationId) -> bool {
    submit(state, source, Command::GiveWarSubsidies { target })
}

pub fn can_give_war_subsidies(state: &WorldState, source: NationId, target: NationId) -> bool {
    if source == target || state.nation(target).is_none() {
        return false;
    }
    if military::are_at_war(state, source, target) {
        return false;
    }
    if is_subsidizing(state, source, target) {
        return false;
    }
    diplomatic_points(state, source) >= state.defines.warsubsidy_diplomatic_cost
}

pub fn execute_give_war_subsidies(state: &mut WorldState, source: NationId, target: NationId) {
    if !can_give_war_subsidies(state, source, target) {
        return;
    }
    let delta = state.defines.warsubsidy_relation_on_accept;
    let cost = state.defines.warsubsidy_diplomatic_cost;
    nations::adjust_relationship(state, source, target, delta);
    debit_diplomatic_points(state, source, cost);
    state.diplomacy.unilateral_mut(source, target).war_subsidies = true;
}

pub fn cancel_war_subsidies(state: &WorldState, source: NationId, target: NationId) -> bool {
    submit(state, source, Command::CancelWarSubsidies { target })
}

pub fn can_cancel_war_subsidies(state: &WorldState, source: NationId, target: NationId) -> bool {
    if source == target {
        return false;
    }
    if military::are_at_war(state, source, target) {
        return false;
    }
    if !is_subsidizing(state, source, target) {
        return false;
    }
    diplomatic_points(state, source) >= state.defines.cancelwarsubsidy_diplomatic_cost
}

pub fn execute_cancel_war_subsidies(state: &mut WorldState, source: NationId, target: NationId) {
    if !can_cancel_war_subsidies(state, source, target) {
        return;
    }
    let delta = state.defines.cancelwarsubsidy_relation_on_accept;
    let cost = state.defines.cancelwarsubsidy_diplomatic_cost;
    nations::adjust_relationship(state, source, target, delta);
    debit_diplomatic_points(state, source, cost);
    state.diplomacy.unilateral_mut(source, target).war_subsidies = false;
}

// ---------------------------------------------------------------------------
// Relations

pub fn increase_relations(state: &WorldState, source: NationId, target: NationId) -> bool {
    submit(state, source, Command::IncreaseRelations { target })
}

pub fn can_increase_relations(state: &WorldState, source: NationId, target: NationId) -> bool {
    if source == target || state.nation(target).is_none() {
        return false;
    }
    if military::are_at_war(state, source, target) {
        return false;
    }
    if nations::relation_value(state, source, target) >= MAX_RELATION {
        return false;
    }
    diplomatic_points(state, source) >= state.defines.increaserelation_diplomatic_cost
}

pub fn execute_increase_relations(state: &mut WorldState, source: NationId, target: NationId) {
    if !can_increase_relations(state, source, target) {
        return;
    }
    let delta = state.defines.increaserelation_relation_on_accept;
    let cost = state.defines.increaserelation_diplomatic_cost;
    nations::adjust_relationship(state, source, target, delta);
    debit_diplomatic_points(state, source, cost);
}

pub fn decrease_relations(state: &WorldState, source: NationId, target: NationId) -> bool {
    submit(state, source, Command::DecreaseRelations { target })
}

pub fn can_decrease_relations(state: &WorldState, source: NationId, target: NationId) -> bool {
    if source == target || state.nation(target).is_none() {
        return false;
    }
    if military::are_at_war(state, source, target) {
        return false;
    }
    if nations::relation_value(state, source, target) <= -MAX_RELATION {
        return false;
    }
    diplomatic_points(state, source) >= state.defines.decreaserelation_diplomatic_cost
}

pub fn execute_decrease_relations(state: &mut WorldState, source: NationId, target: NationId) {
    if !can_decrease_relations(state, source, target) {
        return;
    }
    let delta = state.defines.decreaserelation_relation_on_accept;
    let cost = state.defines.decreaserelation_diplomatic_cost;
    nations::adjust_relationship(state, source, target, delta);
    debit_diplomatic_points(state, source, cost);
}

// ---------------------------------------------------------------------------
// Intervention

pub fn intervene_in_war(state: &WorldState, source: NationId, war: WarId, for_attacker: bool) -> bool {
    submit(state, source, Command::InterveneInWar { war, for_attacker })
}

/// Great powers may join a running war once it is old enough.
///
/// Ordinary wars only admit defenders, and only while the defenders claim
/// nothing beyond the status quo and are not already winning. Great wars admit
/// either side, subject to relations, exhaustion and the source having no
/// stake on the opposing side.
pub fn can_intervene_in_war(state: &WorldState, source: NationId, war: WarId, for_attacker: bool) -> bool {
    let (Some(w), Some(src)) = (state.war(war), state.nation(source)) else {
        return false;
    };
    if !src.is_great_power || src.is_involved_in_crisis {
        return false;
    }
    let earliest = w
        .start_date
        .add_days(30 * state.defines.min_months_to_intervene);
    if state.date < earliest {
        return false;
    }
    if !military::joining_war_does_not_violate_constraints(state, source, war, for_attacker) {
        return false;
    }
    if w.is_crisis_war && !w.is_great {
        return false;
    }
    if for_attacker && military::joining_as_attacker_would_break_truce(state, source, war) {
        return false;
    }

    if !w.is_great {
        if for_attacker {
            return false;
        }
        if military::defenders_have_non_status_quo_wargoal(state, war) {
            return false;
        }
        if military::primary_warscore(state, war) < -state.defines.min_warscore_to_intervene {
            return false;
        }
        military::status_quo_cb(state).is_some()
    } else {
        if src.war_exhaustion >= state.defines.gw_intervene_max_exhaustion {
            return false;
        }
        let primary = if for_attacker {
            w.primary_attacker
        } else {
            w.primary_defender
        };
        if nations::relation_value(state, primary, source) < state.defines.gw_intervene_min_relations {
            return false;
        }

        !military::side(w, !for_attacker).any(|enemy| {
            let in_sphere = state
                .nation(enemy)
                .is_some_and(|e| e.in_sphere_of == Some(source));
            let allied = state.diplomacy.are_allied(enemy, source);
            let troops_inside = state.armies.iter().any(|a| {
                a.controller == source
                    && state
                        .province(a.location)
                        .is_some_and(|p| p.owner == Some(enemy))
            });
            in_sphere || allied || troops_inside
        })
    }
}

pub fn execute_intervene_in_war(state: &mut WorldState, source: NationId, war: WarId, for_attacker: bool) {
    if !can_intervene_in_war(state, source, war, for_attacker) {
        return;
    }
    let Some((is_great, primary_attacker)) = state.war(war).map(|w| (w.is_great, w.primary_attacker))
    else {
        return;
    };

    if !is_great && !military::defenders_have_status_quo_wargoal(state, war) {
        if let Some(cb) = military::status_quo_cb(state) {
            military::add_wargoal(state, war, source, primary_attacker, cb);
        }
    }
    military::add_participant(state, war, source, for_attacker);
    log::debug!(
        "{} intervened in {} on the {} side",
        source,
        war,
        if for_attacker { "attacking" } else { "defending" }
    );
}
