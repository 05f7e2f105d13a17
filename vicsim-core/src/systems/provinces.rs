use crate::input::ProvinceBuildingType;
use crate::state::{IssueRules, NationId, ProvinceId, StateId, StateInstance, WorldState};

/// The state instance a province currently belongs to.
pub fn state_instance_of(state: &WorldState, province: ProvinceId) -> Option<StateId> {
    let p = state.province(province)?;
    let owner = p.owner?;
    state
        .state_instances
        .iter()
        .position(|s| s.definition == p.region && s.owner == owner)
        .map(|i| StateId(i as u32))
}

pub fn provinces_in_state(state: &WorldState, si: StateId) -> Vec<ProvinceId> {
    let Some(inst) = state.state_instance(si) else {
        return Vec::new();
    };
    let Some(def) = state.region(inst.definition) else {
        return Vec::new();
    };
    def.provinces
        .iter()
        .copied()
        .filter(|&p| state.province(p).is_some_and(|p| p.owner == Some(inst.owner)))
        .collect()
}

pub fn state_is_coastal(state: &WorldState, si: StateId) -> bool {
    provinces_in_state(state, si)
        .into_iter()
        .any(|p| state.province(p).is_some_and(|p| p.is_coast))
}

/// A province is overseas when it lies on another continent than its owner's capital.
pub fn is_overseas(state: &WorldState, province: ProvinceId) -> bool {
    let Some(p) = state.province(province) else {
        return false;
    };
    let capital_continent = p
        .owner
        .and_then(|o| state.nation(o))
        .and_then(|n| n.capital)
        .and_then(|c| state.province(c))
        .map(|c| c.continent);
    capital_continent.is_some_and(|c| c != p.continent)
}

fn has_pending_building(state: &WorldState, province: ProvinceId, kind: ProvinceBuildingType) -> bool {
    state
        .province_building_constructions
        .iter()
        .any(|c| c.province == province && c.kind == kind)
}

/// Railroads may be built at home with the railway rule, or abroad as foreign
/// investment by a great power into a civilized minor that allows it.
pub fn can_build_railroad(state: &WorldState, province: ProvinceId, source: NationId) -> bool {
    let Some(p) = state.province(province) else {
        return false;
    };
    let Some(owner) = p.owner else {
        return false;
    };
    let (Some(src), Some(own)) = (state.nation(source), state.nation(owner)) else {
        return false;
    };

    if owner != source {
        if !src.is_great_power || own.is_great_power || !own.is_civilized {
            return false;
        }
        if !own.issue_rules.contains(IssueRules::ALLOW_FOREIGN_INVESTMENT) {
            return false;
        }
        if super::military::are_at_war(state, source, owner) {
            return false;
        }
    } else if !src.issue_rules.contains(IssueRules::BUILD_RAILWAY) {
        return false;
    }

    !has_pending_building(state, province, ProvinceBuildingType::Railroad)
        && p.railroad_level < src.max_railroad_level
}

pub fn can_build_fort(state: &WorldState, province: ProvinceId, source: NationId) -> bool {
    let Some(p) = state.province(province) else {
        return false;
    };
    let Some(src) = state.nation(source) else {
        return false;
    };
    p.owner == Some(source)
        && !has_pending_building(state, province, ProvinceBuildingType::Fort)
        && p.fort_level < src.max_fort_level
}

/// Naval bases need a coast, and a state holds at most one.
pub fn can_build_naval_base(state: &WorldState, province: ProvinceId, source: NationId) -> bool {
    let Some(p) = state.province(province) else {
        return false;
    };
    let Some(src) = state.nation(source) else {
        return false;
    };
    if p.owner != Some(source) || !p.is_coast {
        return false;
    }
    if has_pending_building(state, province, ProvinceBuildingType::NavalBase) {
        return false;
    }
    if p.naval_base_level >= src.max_naval_base_level {
        return false;
    }
    if p.naval_base_level == 0 {
        if let Some(si) = state_instance_of(state, province) {
            let other_base = provinces_in_state(state, si).into_iter().any(|o| {
                o != province
                    && (state.province(o).is_some_and(|o| o.naval_base_level > 0)
                        || has_pending_building(state, o, ProvinceBuildingType::NavalBase))
            });
            if other_base {
                return false;
            }
        }
    }
    true
}

/// A colonial state may become a full state once enough of it are bureaucrats.
pub fn can_integrate_colony(state: &WorldState, si: StateId) -> bool {
    let Some(inst) = state.state_instance(si) else {
        return false;
    };
    state.province(inst.capital).is_some_and(|c| c.is_colonial)
        && inst.bureaucrat_share >= state.defines.state_creation_admin_limit
}

/// Transfers ownership and control, keeping state instances unique per
/// (region, owner).
pub fn change_province_owner(state: &mut WorldState, province: ProvinceId, new_owner: NationId) {
    let Some(p) = state.province_mut(province) else {
        return;
    };
    let old_owner = p.owner;
    let region = p.region;
    p.owner = Some(new_owner);
    p.controller = Some(new_owner);

    let existing = state
        .state_instances
        .iter()
        .position(|s| s.definition == region && s.owner == new_owner);
    if existing.is_none() {
        state.state_instances.push(StateInstance {
            definition: region,
            owner: new_owner,
            capital: province,
            owner_focus: None,
            bureaucrat_share: Default::default(),
        });
    }

    // The old owner's instance may have lost its capital.
    if let Some(old) = old_owner {
        if let Some(idx) = state
            .state_instances
            .iter()
            .position(|s| s.definition == region && s.owner == old)
        {
            if state.state_instances[idx].capital == province {
                let remaining = provinces_in_state(state, StateId(idx as u32));
                if let Some(&next) = remaining.first() {
                    state.state_instances[idx].capital = next;
                }
            }
        }
    }

    log::trace!("{} now owned by {}", province, new_owner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::WorldStateBuilder;

    #[test]
    fn test_change_owner_creates_instance() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_region("Wilds", &[0, 1])
            .with_province(0, None)
            .with_province(1, None)
            .build();

        change_province_owner(&mut state, ProvinceId(0), NationId(0));
        change_province_owner(&mut state, ProvinceId(1), NationId(0));

        assert_eq!(state.state_instances.len(), 1);
        let si = state_instance_of(&state, ProvinceId(1)).unwrap();
        assert_eq!(state.state_instances[si.index()].capital, ProvinceId(0));
        assert_eq!(provinces_in_state(&state, si), vec![ProvinceId(0), ProvinceId(1)]);
    }

    #[test]
    fn test_change_owner_moves_old_capital() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_nation("BBB")
            .with_region("Home", &[0, 1])
            .with_province(0, Some(NationId(0)))
            .with_province(1, Some(NationId(0)))
            .with_state(0, NationId(0), 0)
            .build();

        change_province_owner(&mut state, ProvinceId(0), NationId(1));

        assert_eq!(state.state_instances[0].capital, ProvinceId(1));
        assert_eq!(state_instance_of(&state, ProvinceId(0)), Some(StateId(1)));
    }

    #[test]
    fn test_only_one_naval_base_per_state() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_region("Coast", &[0, 1])
            .with_province(0, Some(NationId(0)))
            .with_province(1, Some(NationId(0)))
            .with_state(0, NationId(0), 0)
            .build();
        state.nations[0].max_naval_base_level = 2;
        for p in &mut state.provinces {
            p.is_coast = true;
        }
        state.provinces[0].naval_base_level = 1;

        assert!(can_build_naval_base(&state, ProvinceId(0), NationId(0)));
        assert!(!can_build_naval_base(&state, ProvinceId(1), NationId(0)));
    }

    #[test]
    fn test_overseas_by_capital_continent() {
        let mut state = WorldStateBuilder::new()
            .with_nation("AAA")
            .with_province(0, Some(NationId(0)))
            .with_province(1, Some(NationId(0)))
            .build();
        state.nations[0].capital = Some(ProvinceId(0));
        state.provinces[1].continent = crate::state::ContinentId(3);
        assert!(!is_overseas(&state, ProvinceId(0)));
        assert!(is_overseas(&state, ProvinceId(1)));
    }
}
