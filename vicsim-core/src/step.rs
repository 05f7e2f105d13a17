use crate::commands::{colonial, diplomacy, domestic, economy, influence, military};
use crate::input::{Command, Payload};
use crate::state::WorldState;
use crate::systems::{provinces, rebels};
use std::sync::atomic::Ordering;
use tracing::instrument;

/// Runs every queued command against the world, oldest first.
///
/// Each command is re-validated as it runs, so one that became illegal since
/// submission (or was never legal) leaves the world untouched. Commands
/// enqueued while draining wait for the next call. Returns how many payloads
/// were taken off the queue; when any were, the state-changed flag is raised
/// for the presentation side.
#[instrument(skip_all, name = "commands")]
pub fn process_pending_commands(state: &mut WorldState) -> usize {
    // Own handle so draining does not hold a borrow of `state`.
    let queue = state.incoming_commands.clone();
    let mut processed = 0;
    for payload in queue.drain() {
        execute_payload(state, &payload);
        processed += 1;
    }

    if processed > 0 {
        state.game_state_updated.store(true, Ordering::Release);
        log::trace!("Processed {} commands", processed);
    }
    processed
}

/// Dispatches one payload to the executor for its kind.
pub fn execute_payload(state: &mut WorldState, payload: &Payload) {
    let source = payload.source;
    log::trace!("{} -> {:?}", source, payload.command.kind());

    match payload.command {
        Command::ChangeNationalFocus {
            state: target,
            focus,
        } => domestic::execute_set_national_focus(state, source, target, focus),
        Command::StartResearch { tech } => domestic::execute_start_research(state, source, tech),
        Command::MakeLeader { is_general } => domestic::execute_make_leader(state, source, is_general),
        Command::MakeVassal { identity } => domestic::execute_make_vassal(state, source, identity),
        Command::ReleaseAndPlayNation { identity } => {
            domestic::execute_release_and_play_as(state, source, identity)
        }
        Command::ChangeBudget { settings } => {
            domestic::execute_change_budget_settings(state, source, &settings)
        }
        Command::StartElection => domestic::execute_start_election(state, source),
        Command::SuppressMovement {
            issue_option,
            independence,
        } => domestic::execute_suppress_movement(state, source, issue_option, independence),

        Command::GiveWarSubsidies { target } => {
            diplomacy::execute_give_war_subsidies(state, source, target)
        }
        Command::CancelWarSubsidies { target } => {
            diplomacy::execute_cancel_war_subsidies(state, source, target)
        }
        Command::IncreaseRelations { target } => {
            diplomacy::execute_increase_relations(state, source, target)
        }
        Command::DecreaseRelations { target } => {
            diplomacy::execute_decrease_relations(state, source, target)
        }
        Command::InterveneInWar { war, for_attacker } => {
            diplomacy::execute_intervene_in_war(state, source, war, for_attacker)
        }

        Command::ChangeInfluencePriority { target, priority } => {
            influence::execute_change_influence_priority(state, source, target, priority)
        }
        Command::DiscreditAdvisors {
            target,
            affected_gp,
        } => influence::execute_discredit_advisors(state, source, target, affected_gp),
        Command::ExpelAdvisors {
            target,
            affected_gp,
        } => influence::execute_expel_advisors(state, source, target, affected_gp),
        Command::BanEmbassy {
            target,
            affected_gp,
        } => influence::execute_ban_embassy(state, source, target, affected_gp),
        Command::IncreaseOpinion { target } => {
            influence::execute_increase_opinion(state, source, target)
        }
        Command::DecreaseOpinion {
            target,
            affected_gp,
        } => influence::execute_decrease_opinion(state, source, target, affected_gp),
        Command::AddToSphere { target } => influence::execute_add_to_sphere(state, source, target),
        Command::RemoveFromSphere {
            target,
            affected_gp,
        } => influence::execute_remove_from_sphere(state, source, target, affected_gp),

        Command::BeginProvinceBuildingConstruction { province, building } => {
            economy::execute_begin_province_building_construction(state, source, province, building)
        }
        Command::BeginFactoryBuildingConstruction {
            state: location,
            factory_type,
            is_upgrade,
        } => economy::execute_begin_factory_building_construction(
            state,
            source,
            location,
            factory_type,
            is_upgrade,
        ),
        Command::DeleteFactory {
            province,
            factory_type,
        } => economy::execute_delete_factory(state, source, province, factory_type),
        Command::ChangeFactorySettings {
            province,
            factory_type,
            priority,
            subsidized,
        } => economy::execute_change_factory_settings(
            state,
            source,
            province,
            factory_type,
            priority,
            subsidized,
        ),

        Command::BeginUnitConstruction {
            province,
            unit_type,
        } => military::execute_start_unit_construction(state, source, province, unit_type),
        Command::CancelUnitConstruction {
            province,
            unit_type,
        } => military::execute_cancel_unit_construction(state, source, province, unit_type),

        Command::UpgradeColonyToState { capital } => {
            colonial::execute_upgrade_colony_to_state(state, source, capital)
        }
        Command::InvestInColony { province } => {
            colonial::execute_invest_in_colony(state, source, province)
        }
        Command::AbandonColony { province } => colonial::execute_abandon_colony(state, source, province),
        Command::FinishColonization { province } => {
            colonial::execute_finish_colonization(state, source, province)
        }
    }
}

/// Whether `payload` would have any effect if it ran now.
///
/// The same predicate each executor checks first, reachable by payload so a
/// front end can grey out actions before submitting them.
pub fn can_execute(state: &WorldState, payload: &Payload) -> bool {
    let source = payload.source;
    match payload.command {
        Command::ChangeNationalFocus {
            state: target,
            focus,
        } => domestic::can_set_national_focus(state, source, target, focus),
        Command::StartResearch { tech } => domestic::can_start_research(state, source, tech),
        Command::MakeLeader { is_general } => domestic::can_make_leader(state, source, is_general),
        Command::MakeVassal { identity } => domestic::can_make_vassal(state, source, identity),
        Command::ReleaseAndPlayNation { identity } => {
            domestic::can_release_and_play_as(state, source, identity)
        }
        Command::ChangeBudget { settings } => {
            domestic::can_change_budget_settings(state, source, &settings)
        }
        Command::StartElection => domestic::can_start_election(state, source),
        Command::SuppressMovement {
            issue_option,
            independence,
        } => rebels::resolve_movement(state, source, issue_option, independence)
            .is_some_and(|m| domestic::can_suppress_movement(state, source, m)),

        Command::GiveWarSubsidies { target } => diplomacy::can_give_war_subsidies(state, source, target),
        Command::CancelWarSubsidies { target } => {
            diplomacy::can_cancel_war_subsidies(state, source, target)
        }
        Command::IncreaseRelations { target } => diplomacy::can_increase_relations(state, source, target),
        Command::DecreaseRelations { target } => diplomacy::can_decrease_relations(state, source, target),
        Command::InterveneInWar { war, for_attacker } => {
            diplomacy::can_intervene_in_war(state, source, war, for_attacker)
        }

        Command::ChangeInfluencePriority { target, priority } => {
            influence::can_change_influence_priority(state, source, target, priority)
        }
        Command::DiscreditAdvisors {
            target,
            affected_gp,
        } => influence::can_discredit_advisors(state, source, target, affected_gp),
        Command::ExpelAdvisors {
            target,
            affected_gp,
        } => influence::can_expel_advisors(state, source, target, affected_gp),
        Command::BanEmbassy {
            target,
            affected_gp,
        } => influence::can_ban_embassy(state, source, target, affected_gp),
        Command::IncreaseOpinion { target } => influence::can_increase_opinion(state, source, target),
        Command::DecreaseOpinion {
            target,
            affected_gp,
        } => influence::can_decrease_opinion(state, source, target, affected_gp),
        Command::AddToSphere { target } => influence::can_add_to_sphere(state, source, target),
        Command::RemoveFromSphere {
            target,
            affected_gp,
        } => influence::can_remove_from_sphere(state, source, target, affected_gp),

        Command::BeginProvinceBuildingConstruction { province, building } => {
            economy::can_begin_province_building_construction(state, source, province, building)
        }
        Command::BeginFactoryBuildingConstruction {
            state: location,
            factory_type,
            is_upgrade,
        } => economy::can_begin_factory_building_construction(
            state,
            source,
            location,
            factory_type,
            is_upgrade,
        ),
        Command::DeleteFactory {
            province,
            factory_type,
        } => economy::can_delete_factory(state, source, province, factory_type),
        Command::ChangeFactorySettings {
            province,
            factory_type,
            priority,
            subsidized,
        } => economy::can_change_factory_settings(
            state,
            source,
            province,
            factory_type,
            priority,
            subsidized,
        ),

        Command::BeginUnitConstruction {
            province,
            unit_type,
        } => military::can_start_unit_construction(state, source, province, unit_type),
        Command::CancelUnitConstruction {
            province,
            unit_type,
        } => military::can_cancel_unit_construction(state, source, province, unit_type),

        Command::UpgradeColonyToState { capital } => provinces::state_instance_of(state, capital)
            .is_some_and(|si| colonial::can_upgrade_colony_to_state(state, source, si)),
        Command::InvestInColony { province } => colonial::can_invest_in_colony(state, source, province),
        Command::AbandonColony { province } => colonial::can_abandon_colony(state, source, province),
        Command::FinishColonization { province } => {
            colonial::can_finish_colonization(state, source, province)
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
