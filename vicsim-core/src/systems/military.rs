use crate::fixed::Fixed;
use crate::state::{
    CbTypeId, Leader, NationId, ProvinceId, War, WarId, Wargoal, WarParticipant, WorldState,
};

fn side_of(war: &War, nation: NationId) -> Option<bool> {
    war.participants
        .iter()
        .find(|p| p.nation == nation)
        .map(|p| p.is_attacker)
}

pub fn is_participant(war: &War, nation: NationId) -> bool {
    side_of(war, nation).is_some()
}

/// Participants on the given side.
pub fn side(war: &War, attackers: bool) -> impl Iterator<Item = NationId> + '_ {
    war.participants
        .iter()
        .filter(move |p| p.is_attacker == attackers)
        .map(|p| p.nation)
}

/// True if the two nations fight on opposite sides of any war.
pub fn are_at_war(state: &WorldState, a: NationId, b: NationId) -> bool {
    state.wars.iter().any(|w| match (side_of(w, a), side_of(w, b)) {
        (Some(sa), Some(sb)) => sa != sb,
        _ => false,
    })
}

pub fn make_new_leader(state: &mut WorldState, nation: NationId, is_general: bool) {
    let recruited = state.date;
    state.leaders.push(Leader {
        nation,
        is_general,
        recruited,
    });
    log::trace!(
        "{} recruited a new {}",
        nation,
        if is_general { "general" } else { "admiral" }
    );
}

fn owner_accepts(state: &WorldState, province: ProvinceId, culture: crate::state::CultureId) -> bool {
    state
        .province(province)
        .and_then(|p| p.owner)
        .is_some_and(|owner| super::nations::accepts_culture(state, owner, culture))
}

pub fn regiments_created_from_province(state: &WorldState, province: ProvinceId) -> u32 {
    state
        .regiments
        .iter()
        .filter(|r| r.home_province == province)
        .count() as u32
}

pub fn main_culture_regiments_created_from_province(state: &WorldState, province: ProvinceId) -> u32 {
    state
        .regiments
        .iter()
        .filter(|r| r.home_province == province && owner_accepts(state, province, r.culture))
        .count() as u32
}

pub fn regiments_under_construction_in_province(state: &WorldState, province: ProvinceId) -> u32 {
    state
        .land_constructions
        .iter()
        .filter(|c| c.province == province)
        .count() as u32
}

pub fn main_culture_regiments_under_construction_in_province(
    state: &WorldState,
    province: ProvinceId,
) -> u32 {
    state
        .land_constructions
        .iter()
        .filter(|c| {
            c.province == province
                && state
                    .definitions
                    .unit_types
                    .get(c.unit_type.index())
                    .is_some_and(|u| u.primary_culture)
        })
        .count() as u32
}

pub fn regiments_max_possible_from_province(state: &WorldState, province: ProvinceId) -> u32 {
    let per_regiment = state.defines.pop_size_per_regiment.max(1);
    state.province(province).map_or(0, |p| {
        p.soldier_pops.iter().map(|s| s.size / per_regiment).sum()
    })
}

pub fn main_culture_regiments_max_possible_from_province(
    state: &WorldState,
    province: ProvinceId,
) -> u32 {
    let per_regiment = state.defines.pop_size_per_regiment.max(1);
    state.province(province).map_or(0, |p| {
        p.soldier_pops
            .iter()
            .filter(|s| owner_accepts(state, province, s.culture))
            .map(|s| s.size / per_regiment)
            .sum()
    })
}

/// Standard war-joining rules: not already in the war, not at war with anyone
/// on the side being joined, and not fighting one's own overlord or sphere leader.
pub fn joining_war_does_not_violate_constraints(
    state: &WorldState,
    nation: NationId,
    war: WarId,
    as_attacker: bool,
) -> bool {
    let Some(w) = state.war(war) else {
        return false;
    };
    if is_participant(w, nation) {
        return false;
    }
    if side(w, as_attacker).any(|ally| are_at_war(state, nation, ally)) {
        return false;
    }
    let Some(n) = state.nation(nation) else {
        return false;
    };
    let protectors = [n.overlord, n.in_sphere_of];
    !side(w, !as_attacker).any(|enemy| protectors.contains(&Some(enemy)))
}

pub fn joining_as_attacker_would_break_truce(state: &WorldState, nation: NationId, war: WarId) -> bool {
    state.war(war).is_some_and(|w| {
        side(w, false).any(|defender| state.diplomacy.has_truce(nation, defender, state.date))
    })
}

fn is_status_quo(state: &WorldState, cb: CbTypeId) -> bool {
    state
        .definitions
        .cb_types
        .get(cb.index())
        .is_some_and(|c| c.is_status_quo)
}

pub fn defenders_have_non_status_quo_wargoal(state: &WorldState, war: WarId) -> bool {
    state.war(war).is_some_and(|w| {
        w.wargoals
            .iter()
            .any(|g| side_of(w, g.added_by) == Some(false) && !is_status_quo(state, g.cb))
    })
}

pub fn defenders_have_status_quo_wargoal(state: &WorldState, war: WarId) -> bool {
    state.war(war).is_some_and(|w| {
        w.wargoals
            .iter()
            .any(|g| side_of(w, g.added_by) == Some(false) && is_status_quo(state, g.cb))
    })
}

/// War score from the primary attacker's point of view.
pub fn primary_warscore(state: &WorldState, war: WarId) -> Fixed {
    state.war(war).map_or(Fixed::ZERO, |w| w.war_score)
}

/// First casus belli type with the status-quo flag.
pub fn status_quo_cb(state: &WorldState) -> Option<CbTypeId> {
    state
        .definitions
        .cb_types
        .iter()
        .position(|c| c.is_status_quo)
        .map(|i| CbTypeId(i as u8))
}

pub fn add_wargoal(state: &mut WorldState, war: WarId, added_by: NationId, target: NationId, cb: CbTypeId) {
    if let Some(w) = state.wars.get_mut(war.index()) {
        w.wargoals.push(Wargoal {
            added_by,
            target,
            cb,
        });
    }
}

pub fn add_participant(state: &mut WorldState, war: WarId, nation: NationId, is_attacker: bool) {
    if let Some(w) = state.wars.get_mut(war.index()) {
        w.participants.push(WarParticipant { nation, is_attacker });
    }
    if let Some(n) = state.nation_mut(nation) {
        n.is_at_war = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CultureId, Date, Regiment, SoldierPop};
    use crate::testing::WorldStateBuilder;

    #[test]
    fn test_are_at_war_requires_opposite_sides() {
        let state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .with_nation("CCC")
            .with_war(NationId(0), NationId(1), Date::new(1836, 1, 1))
            .build();
        assert!(are_at_war(&state, NationId(0), NationId(1)));
        assert!(are_at_war(&state, NationId(1), NationId(0)));
        assert!(!are_at_war(&state, NationId(0), NationId(2)));
    }

    #[test]
    fn test_regiment_capacity_counts_cultures() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_province(0, Some(NationId(0)))
            .build();
        state.provinces[0].soldier_pops = vec![
            SoldierPop {
                culture: CultureId(0),
                size: 2500,
            },
            SoldierPop {
                culture: CultureId(9),
                size: 1000,
            },
        ];
        state.regiments.push(Regiment {
            owner: NationId(0),
            home_province: ProvinceId(0),
            culture: CultureId(9),
        });

        assert_eq!(regiments_max_possible_from_province(&state, ProvinceId(0)), 3);
        assert_eq!(main_culture_regiments_max_possible_from_province(&state, ProvinceId(0)), 2);
        assert_eq!(regiments_created_from_province(&state, ProvinceId(0)), 1);
        assert_eq!(main_culture_regiments_created_from_province(&state, ProvinceId(0)), 0);
    }

    #[test]
    fn test_cannot_join_against_overlord() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .with_nation("CCC")
            .with_war(NationId(0), NationId(1), Date::new(1836, 1, 1))
            .build();
        state.nations[2].overlord = Some(NationId(0));

        assert!(!joining_war_does_not_violate_constraints(&state, NationId(2), WarId(0), false));
        assert!(joining_war_does_not_violate_constraints(&state, NationId(2), WarId(0), true));
        assert!(!joining_war_does_not_violate_constraints(&state, NationId(0), WarId(0), true));
    }
}
