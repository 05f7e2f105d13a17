//! Great-power influence actions against minor nations.
//!
//! Every opinion-shifting action shares one gate (see [`spends_influence`]):
//! the source is a great power acting on a non-great-power, holds enough
//! influence with it, is not banned there and is not at war with it. Actions
//! naming a second great power additionally require the source to stand at
//! least as well with the minor as that rival does.

use super::submit;
use crate::fixed::Fixed;
use crate::influence::{GpRelationship, InfluenceLevel, InfluencePriority};
use crate::input::Command;
use crate::state::{NationId, WorldState};
use crate::systems::{military, nations};

/// Opinion of `minor` towards `gp`; no record reads as neutral.
fn level_of(state: &WorldState, gp: NationId, minor: NationId) -> InfluenceLevel {
    state
        .diplomacy
        .gp_relationship(minor, gp)
        .map_or(InfluenceLevel::Neutral, |r| r.level)
}

fn is_banned_with(state: &WorldState, gp: NationId, minor: NationId) -> bool {
    state
        .diplomacy
        .gp_relationship(minor, gp)
        .is_some_and(|r| r.is_banned())
}

/// The shared gate. Returns the source's relationship with `target` when the
/// source may spend `cost` influence on it.
fn spends_influence(
    state: &WorldState,
    source: NationId,
    target: NationId,
    cost: Fixed,
) -> Option<&GpRelationship> {
    if !nations::is_great_power(state, source) || nations::is_great_power(state, target) {
        return None;
    }
    let rel = state.diplomacy.gp_relationship(target, source)?;
    if rel.influence < cost || rel.is_banned() {
        return None;
    }
    if military::are_at_war(state, source, target) {
        return None;
    }
    Some(rel)
}

fn is_rival_gp(state: &WorldState, source: NationId, affected_gp: NationId) -> bool {
    source != affected_gp && nations::is_great_power(state, affected_gp)
}

fn debit_influence(state: &mut WorldState, source: NationId, target: NationId, cost: Fixed) {
    if let Some(rel) = state.diplomacy.gp_relationship_mut(target, source) {
        rel.influence -= cost;
    }
}

// ---------------------------------------------------------------------------
// Priority

pub fn change_influence_priority(state: &WorldState, source: NationId, target: NationId, priority: u8) -> bool {
    submit(state, source, Command::ChangeInfluencePriority { target, priority })
}

pub fn can_change_influence_priority(state: &WorldState, source: NationId, target: NationId, priority: u8) -> bool {
    nations::is_great_power(state, source)
        && state.nation(target).is_some()
        && !nations::is_great_power(state, target)
        && InfluencePriority::new(priority).is_some()
}

pub fn execute_change_influence_priority(state: &mut WorldState, source: NationId, target: NationId, priority: u8) {
    if !can_change_influence_priority(state, source, target, priority) {
        return;
    }
    let Some(priority) = InfluencePriority::new(priority) else {
        return;
    };
    state.diplomacy.force_gp_relationship(target, source).priority = priority;
}

// ---------------------------------------------------------------------------
// Discredit advisors

pub fn discredit_advisors(state: &WorldState, source: NationId, target: NationId, affected_gp: NationId) -> bool {
    submit(state, source, Command::DiscreditAdvisors { target, affected_gp })
}

pub fn can_discredit_advisors(state: &WorldState, source: NationId, target: NationId, affected_gp: NationId) -> bool {
    if !is_rival_gp(state, source, affected_gp) {
        return false;
    }
    let Some(rel) = spends_influence(state, source, target, state.defines.discredit_influence_cost) else {
        return false;
    };
    if rel.level == InfluenceLevel::Hostile || is_banned_with(state, affected_gp, target) {
        return false;
    }
    rel.level >= level_of(state, affected_gp, target)
}

pub fn execute_discredit_advisors(state: &mut WorldState, source: NationId, target: NationId, affected_gp: NationId) {
    if !can_discredit_advisors(state, source, target, affected_gp) {
        return;
    }
    let cost = state.defines.discredit_influence_cost;
    let delta = state.defines.discredit_relation_on_accept;
    let until = state.date.add_days(state.defines.discredit_days);

    debit_influence(state, source, target, cost);
    nations::adjust_relationship(state, source, affected_gp, delta);
    state
        .diplomacy
        .force_gp_relationship(target, affected_gp)
        .discredit(until);
}

// ---------------------------------------------------------------------------
// Expel advisors

pub fn expel_advisors(state: &WorldState, source: NationId, target: NationId, affected_gp: NationId) -> bool {
    submit(state, source, Command::ExpelAdvisors { target, affected_gp })
}

pub fn can_expel_advisors(state: &WorldState, source: NationId, target: NationId, affected_gp: NationId) -> bool {
    if !is_rival_gp(state, source, affected_gp) {
        return false;
    }
    let Some(rel) = spends_influence(state, source, target, state.defines.expeladvisors_influence_cost) else {
        return false;
    };
    if rel.level < InfluenceLevel::Neutral {
        return false;
    }
    rel.level >= level_of(state, affected_gp, target)
}

pub fn execute_expel_advisors(state: &mut WorldState, source: NationId, target: NationId, affected_gp: NationId) {
    if !can_expel_advisors(state, source, target, affected_gp) {
        return;
    }
    let cost = state.defines.expeladvisors_influence_cost;
    let delta = state.defines.expeladvisors_relation_on_accept;

    debit_influence(state, source, target, cost);
    nations::adjust_relationship(state, source, affected_gp, delta);
    if let Some(other) = state.diplomacy.gp_relationship_mut(target, affected_gp) {
        other.influence = Fixed::ZERO;
        other.clear_discredit();
    }
}

// ---------------------------------------------------------------------------
// Ban embassy

pub fn ban_embassy(state: &WorldState, source: NationId, target: NationId, affected_gp: NationId) -> bool {
    submit(state, source, Command::BanEmbassy { target, affected_gp })
}

/// Never true in practice: the level gate demands the source be friendly
/// and in-sphere at the same time, which no level satisfies.
pub fn can_ban_embassy(state: &WorldState, source: NationId, target: NationId, affected_gp: NationId) -> bool {
    if !is_rival_gp(state, source, affected_gp) {
        return false;
    }
    let Some(rel) = spends_influence(state, source, target, state.defines.banembassy_influence_cost) else {
        return false;
    };
    if rel.level != InfluenceLevel::Friendly || rel.level != InfluenceLevel::InSphere {
        return false;
    }
    rel.level >= level_of(state, affected_gp, target)
}

pub fn execute_ban_embassy(state: &mut WorldState, source: NationId, target: NationId, affected_gp: NationId) {
    if !can_ban_embassy(state, source, target, affected_gp) {
        return;
    }
    apply_ban_embassy(state, source, target, affected_gp);
}

fn apply_ban_embassy(state: &mut WorldState, source: NationId, target: NationId, affected_gp: NationId) {
    let cost = state.defines.banembassy_influence_cost;
    let delta = state.defines.banembassy_relation_on_accept;
    let until = state.date.add_days(state.defines.banembassy_days);

    debit_influence(state, source, target, cost);
    nations::adjust_relationship(state, source, affected_gp, delta);
    state
        .diplomacy
        .force_gp_relationship(target, affected_gp)
        .ban(until);
}

// ---------------------------------------------------------------------------
// Opinion

pub fn increase_opinion(state: &WorldState, source: NationId, target: NationId) -> bool {
    submit(state, source, Command::IncreaseOpinion { target })
}

pub fn can_increase_opinion(state: &WorldState, source: NationId, target: NationId) -> bool {
    spends_influence(state, source, target, state.defines.increaseopinion_influence_cost)
        .is_some_and(|rel| rel.level != InfluenceLevel::Friendly)
}

pub fn execute_increase_opinion(state: &mut WorldState, source: NationId, target: NationId) {
    if !can_increase_opinion(state, source, target) {
        return;
    }
    let cost = state.defines.increaseopinion_influence_cost;
    if let Some(rel) = state.diplomacy.gp_relationship_mut(target, source) {
        rel.influence -= cost;
        rel.level = rel.level.increase_level();
    }
}

pub fn decrease_opinion(state: &WorldState, source: NationId, target: NationId, affected_gp: NationId) -> bool {
    submit(state, source, Command::DecreaseOpinion { target, affected_gp })
}

pub fn can_decrease_opinion(state: &WorldState, source: NationId, target: NationId, affected_gp: NationId) -> bool {
    if !is_rival_gp(state, source, affected_gp) {
        return false;
    }
    if state
        .nation(target)
        .is_some_and(|t| t.in_sphere_of == Some(affected_gp))
    {
        return false;
    }
    let Some(rel) = spends_influence(state, source, target, state.defines.decreaseopinion_influence_cost) else {
        return false;
    };
    let theirs = level_of(state, affected_gp, target);
    if rel.level == InfluenceLevel::Hostile || theirs == InfluenceLevel::Hostile {
        return false;
    }
    rel.level >= theirs
}

pub fn execute_decrease_opinion(state: &mut WorldState, source: NationId, target: NationId, affected_gp: NationId) {
    if !can_decrease_opinion(state, source, target, affected_gp) {
        return;
    }
    let cost = state.defines.decreaseopinion_influence_cost;
    let delta = state.defines.decreaseopinion_relation_on_accept;

    debit_influence(state, source, target, cost);
    nations::adjust_relationship(state, source, affected_gp, delta);
    let other = state.diplomacy.force_gp_relationship(target, affected_gp);
    other.level = other.level.decrease_level();
}

// ---------------------------------------------------------------------------
// Spheres

pub fn add_to_sphere(state: &WorldState, source: NationId, target: NationId) -> bool {
    submit(state, source, Command::AddToSphere { target })
}

pub fn can_add_to_sphere(state: &WorldState, source: NationId, target: NationId) -> bool {
    let Some(rel) = spends_influence(state, source, target, state.defines.addtosphere_influence_cost) else {
        return false;
    };
    rel.level == InfluenceLevel::Friendly
        && state.nation(target).is_some_and(|t| t.in_sphere_of.is_none())
}

pub fn execute_add_to_sphere(state: &mut WorldState, source: NationId, target: NationId) {
    if !can_add_to_sphere(state, source, target) {
        return;
    }
    let cost = state.defines.addtosphere_influence_cost;
    if let Some(rel) = state.diplomacy.gp_relationship_mut(target, source) {
        rel.influence -= cost;
        rel.level = rel.level.increase_level();
    }
    if let Some(t) = state.nation_mut(target) {
        t.in_sphere_of = Some(source);
    }
    log::debug!("{} added {} to its sphere", source, target);
}

pub fn remove_from_sphere(state: &WorldState, source: NationId, target: NationId, affected_gp: NationId) -> bool {
    submit(state, source, Command::RemoveFromSphere { target, affected_gp })
}

/// Shares the unsatisfiable level gate of [`can_ban_embassy`].
pub fn can_remove_from_sphere(state: &WorldState, source: NationId, target: NationId, affected_gp: NationId) -> bool {
    if !nations::is_great_power(state, affected_gp) {
        return false;
    }
    if !state
        .nation(target)
        .is_some_and(|t| t.in_sphere_of == Some(affected_gp))
    {
        return false;
    }
    let Some(rel) = spends_influence(state, source, target, state.defines.removefromsphere_influence_cost) else {
        return false;
    };
    !(rel.level != InfluenceLevel::Friendly || rel.level != InfluenceLevel::InSphere)
}

pub fn execute_remove_from_sphere(state: &mut WorldState, source: NationId, target: NationId, affected_gp: NationId) {
    if !can_remove_from_sphere(state, source, target, affected_gp) {
        return;
    }
    apply_remove_from_sphere(state, source, target, affected_gp);
}

fn apply_remove_from_sphere(state: &mut WorldState, source: NationId, target: NationId, affected_gp: NationId) {
    let cost = state.defines.removefromsphere_influence_cost;
    debit_influence(state, source, target, cost);

    if let Some(t) = state.nation_mut(target) {
        t.in_sphere_of = None;
    }
    if let Some(other) = state.diplomacy.gp_relationship_mut(target, affected_gp) {
        other.level = other.level.decrease_level();
    }

    if source != affected_gp {
        let delta = state.defines.removefromsphere_relation_on_accept;
        nations::adjust_relationship(state, source, affected_gp, delta);
    } else {
        let infamy = state.defines.removefromsphere_infamy_cost;
        let prestige = state.defines.removefromsphere_prestige_cost;
        if let Some(n) = state.nation_mut(source) {
            n.infamy += infamy;
        }
        nations::adjust_prestige(state, source, -prestige);
    }
}
