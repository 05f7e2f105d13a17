//! Actions a nation takes on itself: focus, research, leaders, releases,
//! budget, elections and movements.

use super::submit;
use crate::fixed::Fixed;
use crate::influence::InfluenceLevel;
use crate::input::{BudgetSettings, Command};
use crate::state::{
    FocusId, IdentityId, IssueOptionId, MovementId, NationId, StateId, TechId, WorldState,
};
use crate::systems::{military, nations, politics, provinces, rebels};

// ---------------------------------------------------------------------------
// National focus

pub fn set_national_focus(
    state: &WorldState,
    source: NationId,
    target_state: StateId,
    focus: Option<FocusId>,
) -> bool {
    submit(
        state,
        source,
        Command::ChangeNationalFocus {
            state: target_state,
            focus,
        },
    )
}

fn is_flashpoint_target(state: &WorldState, si: StateId) -> bool {
    state.nations.iter().any(|n| n.flashpoint_focus == Some(si))
}

/// Clearing a focus is always allowed. Owners may focus their own states
/// within their slot budget; a foreign nation may only place the flashpoint
/// focus on a state holding its cores.
pub fn can_set_national_focus(
    state: &WorldState,
    source: NationId,
    target_state: StateId,
    focus: Option<FocusId>,
) -> bool {
    let Some(focus) = focus else {
        return true;
    };
    let (Some(inst), Some(src)) = (state.state_instance(target_state), state.nation(source)) else {
        return false;
    };
    let Some(def) = state.definitions.focuses.get(focus.index()) else {
        return false;
    };
    let in_use = nations::focuses_in_use(state, source);
    let total = src.max_national_focuses as u32;
    let is_flashpoint = state.definitions.flashpoint_focus == Some(focus);

    if inst.owner == source {
        if is_flashpoint {
            return false;
        }
        if let Some(ideology) = def.ideology {
            let Some(i) = state.definitions.ideologies.get(ideology.index()) else {
                return false;
            };
            if !i.enabled || (i.civilized_only && !src.is_civilized) {
                return false;
            }
        }
        in_use < total || inst.owner_focus.is_some()
    } else {
        if nations::accepts_culture(state, inst.owner, src.primary_culture) {
            return false;
        }
        let releasable = state
            .identities
            .get(src.identity.index())
            .is_some_and(|i| !i.is_not_releasable);
        if !releasable {
            return false;
        }
        let holds_core = provinces::provinces_in_state(state, target_state)
            .into_iter()
            .any(|p| state.province(p).is_some_and(|p| p.cores.contains(&src.identity)));

        holds_core
            && src.rank > state.defines.colonial_rank
            && is_flashpoint
            && (in_use < total || src.flashpoint_focus.is_some())
            && !is_flashpoint_target(state, target_state)
    }
}

pub fn execute_set_national_focus(
    state: &mut WorldState,
    source: NationId,
    target_state: StateId,
    focus: Option<FocusId>,
) {
    if !can_set_national_focus(state, source, target_state, focus) {
        return;
    }
    apply_set_national_focus(state, source, target_state, focus);
}

fn apply_set_national_focus(
    state: &mut WorldState,
    source: NationId,
    target_state: StateId,
    focus: Option<FocusId>,
) {
    let Some(inst) = state.state_instances.get_mut(target_state.index()) else {
        return;
    };
    if inst.owner == source {
        inst.owner_focus = focus;
        return;
    }
    let Some(n) = state.nation_mut(source) else {
        return;
    };
    match focus {
        Some(_) => n.flashpoint_focus = Some(target_state),
        None if n.flashpoint_focus == Some(target_state) => n.flashpoint_focus = None,
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Research

pub fn start_research(state: &WorldState, source: NationId, tech: TechId) -> bool {
    submit(state, source, Command::StartResearch { tech })
}

/// Civilized nations may research a tech once its year has come, provided the
/// previous tech in the same folder is already known.
pub fn can_start_research(state: &WorldState, source: NationId, tech: TechId) -> bool {
    let (Some(n), Some(t)) = (
        state.nation(source),
        state.definitions.technologies.get(tech.index()),
    ) else {
        return false;
    };
    if n.researched.contains(&tech) || n.current_research == Some(tech) {
        return false;
    }
    if !n.is_civilized {
        return false;
    }
    if state.date.year < t.year {
        return false;
    }
    if tech.0 > 0 {
        let prev = TechId(tech.0 - 1);
        let same_folder = state
            .definitions
            .technologies
            .get(prev.index())
            .is_some_and(|p| p.folder == t.folder);
        if same_folder {
            return n.researched.contains(&prev);
        }
    }
    true
}

pub fn execute_start_research(state: &mut WorldState, source: NationId, tech: TechId) {
    if !can_start_research(state, source, tech) {
        return;
    }
    if let Some(n) = state.nation_mut(source) {
        n.current_research = Some(tech);
    }
}

// ---------------------------------------------------------------------------
// Leaders

pub fn make_leader(state: &WorldState, source: NationId, is_general: bool) -> bool {
    submit(state, source, Command::MakeLeader { is_general })
}

pub fn can_make_leader(state: &WorldState, source: NationId, _is_general: bool) -> bool {
    state
        .nation(source)
        .is_some_and(|n| n.leadership_points >= state.defines.leader_recruit_cost)
}

pub fn execute_make_leader(state: &mut WorldState, source: NationId, is_general: bool) {
    if !can_make_leader(state, source, is_general) {
        return;
    }
    let cost = state.defines.leader_recruit_cost;
    if let Some(n) = state.nation_mut(source) {
        n.leadership_points -= cost;
    }
    military::make_new_leader(state, source, is_general);
}

// ---------------------------------------------------------------------------
// Releasing nations

pub fn make_vassal(state: &WorldState, source: NationId, identity: IdentityId) -> bool {
    submit(state, source, Command::MakeVassal { identity })
}

pub fn can_make_vassal(state: &WorldState, source: NationId, identity: IdentityId) -> bool {
    nations::can_release_as_vassal(state, source, identity)
}

pub fn execute_make_vassal(state: &mut WorldState, source: NationId, identity: IdentityId) {
    if !can_make_vassal(state, source, identity) {
        return;
    }
    apply_make_vassal(state, source, identity);
}

fn apply_make_vassal(state: &mut WorldState, source: NationId, identity: IdentityId) {
    let Some(holder) = nations::liberate_nation_from(state, identity, source) else {
        return;
    };
    let source_is_gp = nations::is_great_power(state, source);
    if let Some(h) = state.nation_mut(holder) {
        h.overlord = Some(source);
        if source_is_gp {
            h.in_sphere_of = Some(source);
        }
    }
    if source_is_gp {
        state.diplomacy.force_gp_relationship(holder, source).level = InfluenceLevel::InSphere;
    }

    if let Some(source_identity) = state.nation(source).map(|n| n.identity) {
        nations::remove_cores_from_owned(state, holder, source_identity);
    }

    let infamy_delta = state.defines.release_nation_infamy;
    let prestige_delta = state.defines.release_nation_prestige;
    if let Some(n) = state.nation_mut(source) {
        n.infamy = (n.infamy + infamy_delta).max(Fixed::ZERO);
    }
    nations::adjust_prestige(state, source, prestige_delta);
}

pub fn release_and_play_as(state: &WorldState, source: NationId, identity: IdentityId) -> bool {
    submit(state, source, Command::ReleaseAndPlayNation { identity })
}

pub fn can_release_and_play_as(state: &WorldState, source: NationId, identity: IdentityId) -> bool {
    nations::can_release_as_vassal(state, source, identity)
}

pub fn execute_release_and_play_as(state: &mut WorldState, source: NationId, identity: IdentityId) {
    if !can_release_and_play_as(state, source, identity) {
        return;
    }
    let Some(holder) = nations::liberate_nation_from(state, identity, source) else {
        return;
    };
    if let Some(source_identity) = state.nation(source).map(|n| n.identity) {
        nations::remove_cores_from_owned(state, holder, source_identity);
    }

    let source_player = state.nation(source).is_some_and(|n| n.is_player_controlled);
    let holder_player = state.nation(holder).is_some_and(|n| n.is_player_controlled);
    if let Some(h) = state.nation_mut(holder) {
        h.is_player_controlled = source_player;
    }
    if let Some(s) = state.nation_mut(source) {
        s.is_player_controlled = holder_player;
    }

    if state.local_player == Some(source) {
        state.local_player = Some(holder);
    } else if state.local_player == Some(holder) {
        state.local_player = Some(source);
    }
}

// ---------------------------------------------------------------------------
// Budget

pub fn change_budget_settings(state: &WorldState, source: NationId, settings: BudgetSettings) -> bool {
    submit(state, source, Command::ChangeBudget { settings })
}

/// Any living nation may move its sliders; values are clamped on apply.
pub fn can_change_budget_settings(state: &WorldState, source: NationId, _settings: &BudgetSettings) -> bool {
    state.nation(source).is_some()
}

pub fn execute_change_budget_settings(state: &mut WorldState, source: NationId, settings: &BudgetSettings) {
    if !can_change_budget_settings(state, source, settings) {
        return;
    }
    let Some(n) = state.nation_mut(source) else {
        return;
    };
    let b = &mut n.budget;
    let pct = |v: i8| v.clamp(0, 100);

    if let Some(v) = settings.administrative_spending {
        b.administrative_spending = pct(v);
    }
    if let Some(v) = settings.construction_spending {
        b.construction_spending = pct(v);
    }
    if let Some(v) = settings.education_spending {
        b.education_spending = pct(v);
    }
    if let Some(v) = settings.land_spending {
        b.land_spending = pct(v);
    }
    if let Some(v) = settings.naval_spending {
        b.naval_spending = pct(v);
    }
    if let Some(v) = settings.military_spending {
        b.military_spending = pct(v);
    }
    if let Some(v) = settings.social_spending {
        b.social_spending = pct(v);
    }
    if let Some(v) = settings.poor_tax {
        b.poor_tax = pct(v);
    }
    if let Some(v) = settings.middle_tax {
        b.middle_tax = pct(v);
    }
    if let Some(v) = settings.rich_tax {
        b.rich_tax = pct(v);
    }
    if let Some(v) = settings.tariffs {
        b.tariffs = v.clamp(-100, 100);
    }

    crate::systems::economy::bound_budget_settings(state, source);
}

// ---------------------------------------------------------------------------
// Elections

pub fn start_election(state: &WorldState, source: NationId) -> bool {
    submit(state, source, Command::StartElection)
}

pub fn can_start_election(state: &WorldState, source: NationId) -> bool {
    let has_elections = state
        .nation(source)
        .and_then(|n| n.government)
        .and_then(|g| state.definitions.governments.get(g.index()))
        .is_some_and(|g| g.has_elections);
    has_elections && !politics::is_election_ongoing(state, source)
}

pub fn execute_start_election(state: &mut WorldState, source: NationId) {
    if !can_start_election(state, source) {
        return;
    }
    politics::start_election(state, source);
}

// ---------------------------------------------------------------------------
// Movements

/// Submits by the movement's cause rather than its id.
pub fn suppress_movement(state: &WorldState, source: NationId, movement: MovementId) -> bool {
    let (issue_option, independence) = state
        .movements
        .get(movement.index())
        .map_or((None, None), |m| (m.issue_option, m.independence));
    submit(
        state,
        source,
        Command::SuppressMovement {
            issue_option,
            independence,
        },
    )
}

pub fn can_suppress_movement(state: &WorldState, source: NationId, movement: MovementId) -> bool {
    let Some(m) = state.movements.get(movement.index()) else {
        return false;
    };
    if m.nation != source || !m.active {
        return false;
    }
    state
        .nation(source)
        .is_some_and(|n| n.suppression_points >= rebels::suppression_point_cost(state, movement))
}

pub fn execute_suppress_movement(
    state: &mut WorldState,
    source: NationId,
    issue_option: Option<IssueOptionId>,
    independence: Option<IdentityId>,
) {
    let Some(movement) = rebels::resolve_movement(state, source, issue_option, independence) else {
        return;
    };
    if !can_suppress_movement(state, source, movement) {
        return;
    }
    let cost = rebels::suppression_point_cost(state, movement);
    if let Some(n) = state.nation_mut(source) {
        n.suppression_points -= cost;
    }
    rebels::suppress_movement(state, source, movement);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        CultureId, Government, GovernmentId, Ideology, IdeologyId, Movement, NationalFocus,
        ProvinceId, Technology,
    };
    use crate::testing::WorldStateBuilder;

    fn with_focuses(mut state: WorldState) -> WorldState {
        state.definitions.focuses = vec![
            NationalFocus {
                name: "promote_factories".into(),
                ideology: None,
            },
            NationalFocus {
                name: "flashpoint".into(),
                ideology: None,
            },
            NationalFocus {
                name: "party_loyalty".into(),
                ideology: Some(IdeologyId(0)),
            },
        ];
        state.definitions.ideologies = vec![Ideology {
            name: "fascist".into(),
            enabled: false,
            civilized_only: false,
        }];
        state.definitions.flashpoint_focus = Some(FocusId(1));
        state
    }

    fn focus_world() -> WorldState {
        let state = WorldStateBuilder::new()
            .with_nation("OWN")
            .with_nation("FOR")
            .with_region("Bohemia", &[0, 1])
            .with_province(0, Some(NationId(0)))
            .with_province(1, Some(NationId(0)))
            .with_state(0, NationId(0), 0)
            .with_core(1, IdentityId(1))
            .build();
        let mut state = with_focuses(state);
        state.nations[1].rank = 40;
        state.nations[1].primary_culture = CultureId(7);
        state
    }

    #[test]
    fn test_domestic_focus_respects_slots() {
        let mut state = focus_world();
        state.nations[0].max_national_focuses = 0;
        assert!(!can_set_national_focus(&state, NationId(0), StateId(0), Some(FocusId(0))));

        state.nations[0].max_national_focuses = 1;
        execute_set_national_focus(&mut state, NationId(0), StateId(0), Some(FocusId(0)));
        assert_eq!(state.state_instances[0].owner_focus, Some(FocusId(0)));

        // Replacing an existing focus does not need a free slot.
        state.nations[0].max_national_focuses = 1;
        assert!(can_set_national_focus(&state, NationId(0), StateId(0), Some(FocusId(0))));
    }

    #[test]
    fn test_domestic_focus_rejects_flashpoint_and_disabled_ideology() {
        let state = focus_world();
        assert!(!can_set_national_focus(&state, NationId(0), StateId(0), Some(FocusId(1))));
        assert!(!can_set_national_focus(&state, NationId(0), StateId(0), Some(FocusId(2))));
    }

    #[test]
    fn test_clearing_focus_always_allowed() {
        let mut state = focus_world();
        state.state_instances[0].owner_focus = Some(FocusId(0));
        assert!(can_set_national_focus(&state, NationId(1), StateId(0), None));
        execute_set_national_focus(&mut state, NationId(0), StateId(0), None);
        assert_eq!(state.state_instances[0].owner_focus, None);
    }

    #[test]
    fn test_foreign_flashpoint_focus() {
        let mut state = focus_world();
        assert!(can_set_national_focus(&state, NationId(1), StateId(0), Some(FocusId(1))));
        assert!(!can_set_national_focus(&state, NationId(1), StateId(0), Some(FocusId(0))));

        execute_set_national_focus(&mut state, NationId(1), StateId(0), Some(FocusId(1)));
        assert_eq!(state.nations[1].flashpoint_focus, Some(StateId(0)));
        // Already a flashpoint target.
        assert!(!can_set_national_focus(&state, NationId(1), StateId(0), Some(FocusId(1))));

        execute_set_national_focus(&mut state, NationId(1), StateId(0), None);
        assert_eq!(state.nations[1].flashpoint_focus, None);
    }

    #[test]
    fn test_flashpoint_blocked_when_owner_accepts_culture() {
        let mut state = focus_world();
        state.nations[0].accepted_cultures.push(CultureId(7));
        assert!(!can_set_national_focus(&state, NationId(1), StateId(0), Some(FocusId(1))));
    }

    fn tech_world() -> WorldState {
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();
        state.definitions.technologies = vec![
            Technology {
                name: "post_napoleonic_thought".into(),
                year: 1836,
                folder: 0,
            },
            Technology {
                name: "strategic_mobility".into(),
                year: 1836,
                folder: 0,
            },
            Technology {
                name: "water_wheel_power".into(),
                year: 1836,
                folder: 1,
            },
            Technology {
                name: "flying_shuttle".into(),
                year: 1850,
                folder: 1,
            },
        ];
        state
    }

    #[test]
    fn test_first_tech_of_folder_starts() {
        let mut state = tech_world();
        assert!(can_start_research(&state, NationId(0), TechId(2)));
        execute_start_research(&mut state, NationId(0), TechId(2));
        assert_eq!(state.nations[0].current_research, Some(TechId(2)));
        assert!(!can_start_research(&state, NationId(0), TechId(2)));
    }

    #[test]
    fn test_research_needs_previous_in_folder() {
        let mut state = tech_world();
        assert!(!can_start_research(&state, NationId(0), TechId(1)));
        state.nations[0].researched.insert(TechId(0));
        assert!(can_start_research(&state, NationId(0), TechId(1)));
    }

    #[test]
    fn test_research_year_and_civilization() {
        let mut state = tech_world();
        state.nations[0].researched.insert(TechId(2));
        assert!(!can_start_research(&state, NationId(0), TechId(3)));
        state.nations[0].is_civilized = false;
        assert!(!can_start_research(&state, NationId(0), TechId(0)));
    }

    #[test]
    fn test_make_leader_debits_points() {
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();
        state.nations[0].leadership_points = Fixed::from_int(25);

        execute_make_leader(&mut state, NationId(0), true);
        assert_eq!(state.leaders.len(), 1);
        assert!(state.leaders[0].is_general);
        assert_eq!(state.nations[0].leadership_points, Fixed::from_int(5));

        execute_make_leader(&mut state, NationId(0), false);
        assert_eq!(state.leaders.len(), 1);
    }

    fn release_world() -> WorldState {
        let mut state = WorldStateBuilder::new()
            .with_great_power("GPW")
            .with_identity("REL")
            .with_province(0, Some(NationId(0)))
            .with_province(1, Some(NationId(0)))
            .with_core(1, IdentityId(1))
            .with_core(1, IdentityId(0))
            .build();
        state.nations[0].capital = Some(ProvinceId(0));
        state.nations[0].infamy = Fixed::from_int(2);
        state
    }

    #[test]
    fn test_make_vassal_by_great_power() {
        let mut state = release_world();
        execute_make_vassal(&mut state, NationId(0), IdentityId(1));

        let holder = NationId(1);
        assert_eq!(state.provinces[1].owner, Some(holder));
        assert_eq!(state.nations[1].overlord, Some(NationId(0)));
        assert_eq!(state.nations[1].in_sphere_of, Some(NationId(0)));
        assert_eq!(
            state.diplomacy.gp_relationship(holder, NationId(0)).map(|r| r.level),
            Some(InfluenceLevel::InSphere)
        );
        assert!(!state.provinces[1].cores.contains(&IdentityId(0)));
        // 2 - 5 floors at zero.
        assert_eq!(state.nations[0].infamy, Fixed::ZERO);
        assert_eq!(state.nations[0].prestige, Fixed::from_int(5));
    }

    #[test]
    fn test_release_and_play_swaps_player() {
        let mut state = release_world();
        state.nations[0].is_player_controlled = true;
        state.local_player = Some(NationId(0));

        execute_release_and_play_as(&mut state, NationId(0), IdentityId(1));

        assert!(state.nations[1].is_player_controlled);
        assert!(!state.nations[0].is_player_controlled);
        assert_eq!(state.local_player, Some(NationId(1)));
        assert_eq!(state.nations[1].overlord, None);
    }

    #[test]
    fn test_budget_clamps_and_skips_unchanged() {
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();
        let settings = BudgetSettings {
            poor_tax: Some(120),
            tariffs: Some(-128),
            ..BudgetSettings::UNCHANGED
        };
        execute_change_budget_settings(&mut state, NationId(0), &settings);

        let b = state.nations[0].budget;
        assert_eq!(b.poor_tax, 100);
        assert_eq!(b.tariffs, -100);
        assert_eq!(b.rich_tax, 50);
    }

    #[test]
    fn test_election_requires_elective_government() {
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();
        state.definitions.governments = vec![
            Government {
                name: "absolute_monarchy".into(),
                has_elections: false,
            },
            Government {
                name: "democracy".into(),
                has_elections: true,
            },
        ];
        state.nations[0].government = Some(GovernmentId(0));
        assert!(!can_start_election(&state, NationId(0)));

        state.nations[0].government = Some(GovernmentId(1));
        execute_start_election(&mut state, NationId(0));
        assert!(politics::is_election_ongoing(&state, NationId(0)));
        assert!(!can_start_election(&state, NationId(0)));
    }

    #[test]
    fn test_suppression_with_exact_points() {
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();
        state.movements.push(Movement {
            nation: NationId(0),
            issue_option: None,
            independence: Some(IdentityId(3)),
            support: Fixed::from_int(200),
            radicalism: Fixed::ZERO,
            active: true,
        });
        let cost = rebels::suppression_point_cost(&state, MovementId(0));
        state.nations[0].suppression_points = cost;

        execute_suppress_movement(&mut state, NationId(0), None, Some(IdentityId(3)));

        assert_eq!(state.nations[0].suppression_points, Fixed::ZERO);
        assert!(!state.movements[0].active);
    }

    #[test]
    fn test_suppress_submits_its_own_kind() {
        let mut state = WorldStateBuilder::new().with_nation("AAA").build();
        state.movements.push(Movement {
            nation: NationId(0),
            issue_option: Some(IssueOptionId(2)),
            independence: None,
            support: Fixed::ZERO,
            radicalism: Fixed::ZERO,
            active: true,
        });
        assert!(suppress_movement(&state, NationId(0), MovementId(0)));
        let payload = state.incoming_commands.pop().unwrap();
        assert_eq!(
            payload.command,
            Command::SuppressMovement {
                issue_option: Some(IssueOptionId(2)),
                independence: None
            }
        );
    }
}
