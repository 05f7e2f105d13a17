//! Construction and factory management.

use super::submit;
use crate::input::{Command, ProvinceBuildingType};
use crate::state::{
    Factory, FactoryConstruction, FactoryTypeId, IssueRules, NationId, ProvinceBuildingConstruction,
    ProvinceId, StateId, WorldState,
};
use crate::systems::{economy, military, nations, provinces};

/// Highest level a factory can be expanded to.
const MAX_FACTORY_LEVEL: u8 = u8::MAX;

/// Factory priorities run 0..=3.
const FACTORY_PRIORITY_LEVELS: u8 = 4;

fn rules_of(state: &WorldState, nation: NationId) -> IssueRules {
    state
        .nation(nation)
        .map_or(IssueRules::empty(), |n| n.issue_rules)
}

fn owner_of(state: &WorldState, province: ProvinceId) -> Option<NationId> {
    state.province(province).and_then(|p| p.owner)
}

// ---------------------------------------------------------------------------
// Province buildings

pub fn begin_province_building_construction(
    state: &WorldState,
    source: NationId,
    province: ProvinceId,
    building: ProvinceBuildingType,
) -> bool {
    submit(
        state,
        source,
        Command::BeginProvinceBuildingConstruction { province, building },
    )
}

pub fn can_begin_province_building_construction(
    state: &WorldState,
    source: NationId,
    province: ProvinceId,
    building: ProvinceBuildingType,
) -> bool {
    match building {
        ProvinceBuildingType::Railroad => provinces::can_build_railroad(state, province, source),
        ProvinceBuildingType::Fort => provinces::can_build_fort(state, province, source),
        ProvinceBuildingType::NavalBase => provinces::can_build_naval_base(state, province, source),
    }
}

pub fn execute_begin_province_building_construction(
    state: &mut WorldState,
    source: NationId,
    province: ProvinceId,
    building: ProvinceBuildingType,
) {
    if !can_begin_province_building_construction(state, source, province, building) {
        return;
    }

    if building == ProvinceBuildingType::Railroad {
        if let Some(owner) = owner_of(state, province).filter(|&o| o != source) {
            let amount = economy::construction_cost_value(state, &state.definitions.railroad_cost);
            nations::adjust_foreign_investment(state, source, owner, amount);
        }
    }

    state
        .province_building_constructions
        .push(ProvinceBuildingConstruction {
            province,
            nation: source,
            kind: building,
            is_pop_project: false,
        });
}

// ---------------------------------------------------------------------------
// Factories

fn factories_in_state(state: &WorldState, si: StateId) -> impl Iterator<Item = &Factory> + '_ {
    provinces::provinces_in_state(state, si)
        .into_iter()
        .filter_map(move |p| state.province(p))
        .flat_map(|p| p.factories.iter())
}

fn queued_in_state(state: &WorldState, si: StateId) -> impl Iterator<Item = &FactoryConstruction> + '_ {
    state.factory_constructions.iter().filter(move |c| c.state == si)
}

pub fn begin_factory_building_construction(
    state: &WorldState,
    source: NationId,
    location: StateId,
    factory_type: FactoryTypeId,
    is_upgrade: bool,
) -> bool {
    submit(
        state,
        source,
        Command::BeginFactoryBuildingConstruction {
            state: location,
            factory_type,
            is_upgrade,
        },
    )
}

pub fn can_begin_factory_building_construction(
    state: &WorldState,
    source: NationId,
    location: StateId,
    factory_type: FactoryTypeId,
    is_upgrade: bool,
) -> bool {
    let Some(inst) = state.state_instance(location) else {
        return false;
    };
    let Some(kind) = state.definitions.factory_types.get(factory_type.index()) else {
        return false;
    };
    let Some(src) = state.nation(source) else {
        return false;
    };
    let owner = inst.owner;

    if !src.unlocked_factories.contains(&factory_type) && !kind.available_from_start {
        return false;
    }
    if state.province(inst.capital).is_some_and(|c| c.is_colonial) {
        return false;
    }

    if !is_upgrade {
        let queued_dup = queued_in_state(state, location)
            .any(|c| !c.is_upgrade && c.kind == factory_type);
        let built_dup = factories_in_state(state, location).any(|f| f.kind == factory_type);
        if queued_dup || built_dup {
            return false;
        }
    }

    if owner != source {
        let Some(own) = state.nation(owner) else {
            return false;
        };
        if !src.is_great_power || own.is_great_power || !own.is_civilized {
            return false;
        }
        if !own.issue_rules.contains(IssueRules::ALLOW_FOREIGN_INVESTMENT) {
            return false;
        }
        if military::are_at_war(state, source, owner) {
            return false;
        }
    } else {
        let needed = if is_upgrade {
            IssueRules::EXPAND_FACTORY
        } else {
            IssueRules::BUILD_FACTORY
        };
        if !src.is_civilized || !src.issue_rules.contains(needed) {
            return false;
        }
    }

    if is_upgrade {
        if queued_in_state(state, location).any(|c| c.kind == factory_type) {
            return false;
        }
        factories_in_state(state, location)
            .any(|f| f.kind == factory_type && f.level < MAX_FACTORY_LEVEL)
    } else {
        if kind.is_coastal && !provinces::state_is_coastal(state, location) {
            return false;
        }
        let built = factories_in_state(state, location).count();
        let queued = queued_in_state(state, location)
            .filter(|c| !c.is_upgrade)
            .count();
        ((built + queued) as u32) <= state.defines.factories_per_state
    }
}

pub fn execute_begin_factory_building_construction(
    state: &mut WorldState,
    source: NationId,
    location: StateId,
    factory_type: FactoryTypeId,
    is_upgrade: bool,
) {
    if !can_begin_factory_building_construction(state, source, location, factory_type, is_upgrade) {
        return;
    }

    state.factory_constructions.push(FactoryConstruction {
        state: location,
        nation: source,
        kind: factory_type,
        is_upgrade,
        is_pop_project: false,
    });

    let Some(owner) = state.state_instance(location).map(|s| s.owner) else {
        return;
    };
    if owner != source {
        let view: &WorldState = state;
        let amount = view
            .definitions
            .factory_types
            .get(factory_type.index())
            .map(|k| economy::construction_cost_value(view, &k.construction_costs))
            .unwrap_or_default();
        nations::adjust_foreign_investment(state, source, owner, amount);
    }
}

fn factory_at(state: &WorldState, province: ProvinceId, factory_type: FactoryTypeId) -> Option<&Factory> {
    state
        .province(province)?
        .factories
        .iter()
        .find(|f| f.kind == factory_type)
}

pub fn delete_factory(
    state: &WorldState,
    source: NationId,
    province: ProvinceId,
    factory_type: FactoryTypeId,
) -> bool {
    submit(
        state,
        source,
        Command::DeleteFactory {
            province,
            factory_type,
        },
    )
}

pub fn can_delete_factory(
    state: &WorldState,
    source: NationId,
    province: ProvinceId,
    factory_type: FactoryTypeId,
) -> bool {
    owner_of(state, province) == Some(source)
        && rules_of(state, source).contains(IssueRules::DESTROY_FACTORY)
        && factory_at(state, province, factory_type).is_some()
}

pub fn execute_delete_factory(
    state: &mut WorldState,
    source: NationId,
    province: ProvinceId,
    factory_type: FactoryTypeId,
) {
    if !can_delete_factory(state, source, province, factory_type) {
        return;
    }
    if let Some(p) = state.province_mut(province) {
        if let Some(idx) = p.factories.iter().position(|f| f.kind == factory_type) {
            p.factories.remove(idx);
        }
    }
}

pub fn change_factory_settings(
    state: &WorldState,
    source: NationId,
    province: ProvinceId,
    factory_type: FactoryTypeId,
    priority: u8,
    subsidized: bool,
) -> bool {
    submit(
        state,
        source,
        Command::ChangeFactorySettings {
            province,
            factory_type,
            priority,
            subsidized,
        },
    )
}

pub fn can_change_factory_settings(
    state: &WorldState,
    source: NationId,
    province: ProvinceId,
    factory_type: FactoryTypeId,
    priority: u8,
    subsidized: bool,
) -> bool {
    if owner_of(state, province) != Some(source) || priority >= FACTORY_PRIORITY_LEVELS {
        return false;
    }
    let Some(factory) = factory_at(state, province, factory_type) else {
        return false;
    };
    let rules = rules_of(state, source);
    if factory.priority != priority && !rules.contains(IssueRules::FACTORY_PRIORITY) {
        return false;
    }
    !subsidized || rules.contains(IssueRules::CAN_SUBSIDISE)
}

pub fn execute_change_factory_settings(
    state: &mut WorldState,
    source: NationId,
    province: ProvinceId,
    factory_type: FactoryTypeId,
    priority: u8,
    subsidized: bool,
) {
    if !can_change_factory_settings(state, source, province, factory_type, priority, subsidized) {
        return;
    }
    let factory = state
        .province_mut(province)
        .and_then(|p| p.factories.iter_mut().find(|f| f.kind == factory_type));
    if let Some(f) = factory {
        f.priority = priority;
        f.subsidized = subsidized;
    }
}
