//! Regiment and ship construction orders.

use super::submit;
use crate::input::Command;
use crate::state::{NationId, ProvinceId, UnitConstruction, UnitTypeId, WorldState};
use crate::systems::{military, provinces};

pub fn start_unit_construction(
    state: &WorldState,
    source: NationId,
    province: ProvinceId,
    unit_type: UnitTypeId,
) -> bool {
    submit(
        state,
        source,
        Command::BeginUnitConstruction {
            province,
            unit_type,
        },
    )
}

/// Land units draw on the province's soldier pops; ships need a port.
pub fn can_start_unit_construction(
    state: &WorldState,
    source: NationId,
    province: ProvinceId,
    unit_type: UnitTypeId,
) -> bool {
    let Some(p) = state.province(province) else {
        return false;
    };
    let Some(kind) = state.definitions.unit_types.get(unit_type.index()) else {
        return false;
    };
    let Some(src) = state.nation(source) else {
        return false;
    };
    if p.owner != Some(source) || p.controller != Some(source) || p.under_siege {
        return false;
    }
    if !src.unlocked_units.contains(&unit_type) && !kind.active {
        return false;
    }

    if kind.is_land {
        let (built, queued, possible) = if kind.primary_culture {
            (
                military::main_culture_regiments_created_from_province(state, province),
                military::main_culture_regiments_under_construction_in_province(state, province),
                military::main_culture_regiments_max_possible_from_province(state, province),
            )
        } else {
            (
                military::regiments_created_from_province(state, province),
                military::regiments_under_construction_in_province(state, province),
                military::regiments_max_possible_from_province(state, province),
            )
        };
        return possible > built + queued;
    }

    if !p.is_coast || p.naval_base_level < kind.min_port_level {
        return false;
    }
    if !kind.can_build_overseas && provinces::is_overseas(state, province) {
        return false;
    }
    match kind.max_per_port {
        Some(cap) => {
            let in_port = state
                .naval_constructions
                .iter()
                .filter(|c| c.province == province && c.unit_type == unit_type)
                .count();
            in_port < cap as usize
        }
        None => true,
    }
}

pub fn execute_start_unit_construction(
    state: &mut WorldState,
    source: NationId,
    province: ProvinceId,
    unit_type: UnitTypeId,
) {
    if !can_start_unit_construction(state, source, province, unit_type) {
        return;
    }
    let is_land = state
        .definitions
        .unit_types
        .get(unit_type.index())
        .is_some_and(|k| k.is_land);
    let order = UnitConstruction {
        province,
        nation: source,
        unit_type,
    };
    if is_land {
        state.land_constructions.push(order);
    } else {
        state.naval_constructions.push(order);
    }
}

pub fn cancel_unit_construction(
    state: &WorldState,
    source: NationId,
    province: ProvinceId,
    unit_type: UnitTypeId,
) -> bool {
    submit(
        state,
        source,
        Command::CancelUnitConstruction {
            province,
            unit_type,
        },
    )
}

fn construction_list(state: &WorldState, unit_type: UnitTypeId) -> Option<&[UnitConstruction]> {
    let kind = state.definitions.unit_types.get(unit_type.index())?;
    Some(if kind.is_land {
        state.land_constructions.as_slice()
    } else {
        state.naval_constructions.as_slice()
    })
}

fn last_matching(orders: &[UnitConstruction], province: ProvinceId, unit_type: UnitTypeId) -> Option<usize> {
    orders
        .iter()
        .rposition(|c| c.province == province && c.unit_type == unit_type)
}

pub fn can_cancel_unit_construction(
    state: &WorldState,
    source: NationId,
    province: ProvinceId,
    unit_type: UnitTypeId,
) -> bool {
    if state.province(province).and_then(|p| p.owner) != Some(source) {
        return false;
    }
    construction_list(state, unit_type)
        .and_then(|orders| last_matching(orders, province, unit_type))
        .is_some()
}

pub fn execute_cancel_unit_construction(
    state: &mut WorldState,
    source: NationId,
    province: ProvinceId,
    unit_type: UnitTypeId,
) {
    if !can_cancel_unit_construction(state, source, province, unit_type) {
        return;
    }
    let is_land = state
        .definitions
        .unit_types
        .get(unit_type.index())
        .is_some_and(|k| k.is_land);
    let orders = if is_land {
        &mut state.land_constructions
    } else {
        &mut state.naval_constructions
    };
    if let Some(idx) = last_matching(orders, province, unit_type) {
        orders.remove(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ContinentId, CultureId, Regiment, SoldierPop, UnitType};
    use crate::testing::WorldStateBuilder;

    const INFANTRY: UnitTypeId = UnitTypeId(0);
    const GUARD: UnitTypeId = UnitTypeId(1);
    const FRIGATE: UnitTypeId = UnitTypeId(2);
    const MONITOR: UnitTypeId = UnitTypeId(3);

    fn barracks_world() -> WorldState {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .with_province(0, Some(NationId(0)))
            .build();
        state.nations[0].capital = Some(ProvinceId(0));
        state.definitions.unit_types = vec![
            UnitType {
                name: "infantry".into(),
                is_land: true,
                active: true,
                ..UnitType::default()
            },
            UnitType {
                name: "guard".into(),
                is_land: true,
                active: true,
                primary_culture: true,
                ..UnitType::default()
            },
            UnitType {
                name: "frigate".into(),
                active: true,
                can_build_overseas: true,
                min_port_level: 1,
                ..UnitType::default()
            },
            UnitType {
                name: "monitor".into(),
                active: false,
                can_build_overseas: false,
                min_port_level: 1,
                max_per_port: Some(1),
                ..UnitType::default()
            },
        ];
        state.provinces[0].soldier_pops = vec![
            SoldierPop {
                culture: CultureId(0),
                size: 1000,
            },
            SoldierPop {
                culture: CultureId(7),
                size: 1000,
            },
        ];
        state
    }

    #[test]
    fn test_land_capacity() {
        let mut state = barracks_world();
        assert!(can_start_unit_construction(&state, NationId(0), ProvinceId(0), INFANTRY));
        execute_start_unit_construction(&mut state, NationId(0), ProvinceId(0), INFANTRY);
        execute_start_unit_construction(&mut state, NationId(0), ProvinceId(0), INFANTRY);
        assert_eq!(state.land_constructions.len(), 2);
        assert!(!can_start_unit_construction(&state, NationId(0), ProvinceId(0), INFANTRY));
    }

    #[test]
    fn test_culture_restricted_units_use_accepted_pops() {
        let mut state = barracks_world();
        state.regiments.push(Regiment {
            owner: NationId(0),
            home_province: ProvinceId(0),
            culture: CultureId(0),
        });
        // One accepted-culture pop, already backing a regiment.
        assert!(!can_start_unit_construction(&state, NationId(0), ProvinceId(0), GUARD));
        assert!(can_start_unit_construction(&state, NationId(0), ProvinceId(0), INFANTRY));
    }

    #[test]
    fn test_ownership_and_siege() {
        let mut state = barracks_world();
        assert!(!can_start_unit_construction(&state, NationId(1), ProvinceId(0), INFANTRY));
        state.provinces[0].controller = Some(NationId(1));
        assert!(!can_start_unit_construction(&state, NationId(0), ProvinceId(0), INFANTRY));
        state.provinces[0].controller = Some(NationId(0));
        state.provinces[0].under_siege = true;
        assert!(!can_start_unit_construction(&state, NationId(0), ProvinceId(0), INFANTRY));
    }

    #[test]
    fn test_ships_need_a_port() {
        let mut state = barracks_world();
        assert!(!can_start_unit_construction(&state, NationId(0), ProvinceId(0), FRIGATE));
        state.provinces[0].is_coast = true;
        assert!(!can_start_unit_construction(&state, NationId(0), ProvinceId(0), FRIGATE));
        state.provinces[0].naval_base_level = 1;
        assert!(can_start_unit_construction(&state, NationId(0), ProvinceId(0), FRIGATE));

        execute_start_unit_construction(&mut state, NationId(0), ProvinceId(0), FRIGATE);
        assert_eq!(state.naval_constructions.len(), 1);
        assert!(state.land_constructions.is_empty());
    }

    #[test]
    fn test_locked_overseas_and_capped_ships() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_province(0, Some(NationId(0)))
            .with_province(1, Some(NationId(0)))
            .build();
        state.definitions = barracks_world().definitions;
        state.nations[0].capital = Some(ProvinceId(0));
        for p in &mut state.provinces {
            p.is_coast = true;
            p.naval_base_level = 1;
        }
        state.provinces[1].continent = ContinentId(2);

        // Not active and not unlocked.
        assert!(!can_start_unit_construction(&state, NationId(0), ProvinceId(0), MONITOR));
        state.nations[0].unlocked_units.insert(MONITOR);
        assert!(can_start_unit_construction(&state, NationId(0), ProvinceId(0), MONITOR));
        assert!(!can_start_unit_construction(&state, NationId(0), ProvinceId(1), MONITOR));

        execute_start_unit_construction(&mut state, NationId(0), ProvinceId(0), MONITOR);
        assert!(!can_start_unit_construction(&state, NationId(0), ProvinceId(0), MONITOR));
    }

    #[test]
    fn test_cancel_removes_latest_match() {
        let mut state = barracks_world();
        state.land_constructions = vec![
            UnitConstruction {
                province: ProvinceId(0),
                nation: NationId(0),
                unit_type: INFANTRY,
            },
            UnitConstruction {
                province: ProvinceId(0),
                nation: NationId(0),
                unit_type: GUARD,
            },
            UnitConstruction {
                province: ProvinceId(0),
                nation: NationId(0),
                unit_type: INFANTRY,
            },
        ];

        execute_cancel_unit_construction(&mut state, NationId(0), ProvinceId(0), INFANTRY);
        assert_eq!(state.land_constructions.len(), 2);
        assert_eq!(state.land_constructions[1].unit_type, GUARD);

        assert!(!can_cancel_unit_construction(&state, NationId(1), ProvinceId(0), INFANTRY));
        assert!(!can_cancel_unit_construction(&state, NationId(0), ProvinceId(0), FRIGATE));
    }
}
